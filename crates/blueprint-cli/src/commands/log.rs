//! Log command implementation

use std::io::IsTerminal;

use blueprint_capture::ClearOutcome;
use colored::Colorize;

use crate::context::RecorderContext;
use crate::error::{CliError, Result};
use crate::interactive;

/// Run `log list`
pub fn run_log_list(ctx: &RecorderContext, json: bool) -> Result<()> {
    let log = ctx.open_log()?;
    let mutations = log.mutations()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&mutations)?);
        return Ok(());
    }

    if mutations.is_empty() {
        println!("{}", "No captured mutations".dimmed());
        return Ok(());
    }

    for mutation in &mutations {
        println!(
            "{:>5}  {}  {}",
            format!("#{}", mutation.sequence).cyan(),
            mutation
                .captured_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed(),
            interactive::preview(&mutation.statement)
        );
    }
    Ok(())
}

/// Run `log clear`
///
/// Clearing is authorized by `--yes` or by confirming at a terminal.
pub fn run_log_clear(ctx: &RecorderContext, yes: bool) -> Result<()> {
    let log = ctx.open_log()?;

    let authorized = if yes {
        true
    } else if std::io::stdin().is_terminal() {
        interactive::confirm_clear(log.mutations()?.len())?
    } else {
        false
    };

    match log.clear(authorized)? {
        ClearOutcome::Cleared { removed } => {
            println!("{} Removed {} captured mutations", "OK".green(), removed);
            Ok(())
        }
        ClearOutcome::Denied => Err(CliError::user(
            "refusing to clear captured mutations without confirmation (pass --yes)",
        )),
    }
}
