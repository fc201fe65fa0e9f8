//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based selection and confirmation.

use blueprint_capture::CapturedMutation;
use dialoguer::{Confirm, MultiSelect};

use crate::error::Result;

/// Longest statement preview shown in a selection list
const PREVIEW_CHARS: usize = 100;

/// Let the user pick captured mutations to replay.
///
/// Returns the chosen sequence numbers.
pub fn select_mutations(mutations: &[CapturedMutation]) -> Result<Vec<u64>> {
    if mutations.is_empty() {
        eprintln!("No captured mutations to select.");
        return Ok(Vec::new());
    }

    let items: Vec<String> = mutations
        .iter()
        .map(|m| format!("#{} {}", m.sequence, preview(&m.statement)))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Select mutations to replay (space to toggle, enter to confirm)")
        .items(&items)
        .interact()?;

    Ok(chosen.into_iter().map(|i| mutations[i].sequence).collect())
}

/// Ask before deleting captured mutations.
pub fn confirm_clear(count: usize) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("Delete all {count} captured mutations?"))
        .default(false)
        .interact()?)
}

/// First line of a statement, shortened for display.
pub fn preview(statement: &str) -> String {
    let line = statement.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= PREVIEW_CHARS && !statement.trim().contains('\n') {
        return line.to_string();
    }
    let short: String = line.chars().take(PREVIEW_CHARS).collect();
    format!("{short}...")
}
