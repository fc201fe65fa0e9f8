//! Captured mutation records and replay-script assembly

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Appended after every statement in a replay script
pub const STATEMENT_TERMINATOR: &str = ";\n";

/// One captured statement. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedMutation {
    /// Position in capture order, strictly increasing
    pub sequence: u64,
    /// Wall-clock time of capture
    pub captured_at: DateTime<Utc>,
    /// The statement exactly as observed
    pub statement: String,
}

impl CapturedMutation {
    pub fn new(sequence: u64, captured_at: DateTime<Utc>, statement: impl Into<String>) -> Self {
        Self {
            sequence,
            captured_at,
            statement: statement.into(),
        }
    }
}

/// Concatenate the selected mutations into one script.
///
/// Statements are emitted in ascending sequence order whatever order
/// `selected` is in, each followed by [`STATEMENT_TERMINATOR`]. Unknown and
/// repeated sequence numbers are ignored. The text is not re-validated.
pub fn replay_script(mutations: &[CapturedMutation], selected: &[u64]) -> String {
    let wanted: BTreeSet<u64> = selected.iter().copied().collect();

    let mut chosen: Vec<&CapturedMutation> = mutations
        .iter()
        .filter(|m| wanted.contains(&m.sequence))
        .collect();
    chosen.sort_by_key(|m| m.sequence);
    chosen.dedup_by_key(|m| m.sequence);

    chosen
        .iter()
        .map(|m| format!("{}{}", m.statement, STATEMENT_TERMINATOR))
        .collect()
}
