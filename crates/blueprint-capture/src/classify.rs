//! Statement classification
//!
//! Classification works on raw statement text with textual heuristics. It
//! does not parse SQL: the host's notion of "a mutation worth replaying" is
//! defined by these same substring tests, so matching them exactly matters
//! more than statement semantics.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MUTATING_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(INSERT|UPDATE)\s").unwrap());

/// Kind of statement, judged by its leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    Update,
    Other,
}

/// Classify a statement by its leading keyword, case-insensitively.
pub fn classify(statement: &str) -> StatementKind {
    match MUTATING_STATEMENT.captures(statement) {
        Some(caps) if caps[1].eq_ignore_ascii_case("insert") => StatementKind::Insert,
        Some(_) => StatementKind::Update,
        None => StatementKind::Other,
    }
}

/// Why an observed statement was not captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Recording is paused
    Disabled,
    /// The log is persisting another statement
    Reentrant,
    /// Scheduled job or installer run
    Unattended,
    /// Not an insert or update
    NotMutating,
    /// Writes to the configuration-value store
    ConfigurationStore,
    /// Transient or session bookkeeping
    Housekeeping,
    /// Unpublished draft placeholder
    Draft,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "recording disabled"),
            Self::Reentrant => write!(f, "reentrant observation"),
            Self::Unattended => write!(f, "unattended execution"),
            Self::NotMutating => write!(f, "not an insert or update"),
            Self::ConfigurationStore => write!(f, "configuration store write"),
            Self::Housekeeping => write!(f, "housekeeping write"),
            Self::Draft => write!(f, "draft placeholder"),
        }
    }
}

/// Noise rules applied to mutating statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureFilter {
    /// Host table prefix; the configuration store is `<prefix>options`
    pub table_prefix: String,
    /// Substrings marking transient and session bookkeeping
    pub housekeeping_markers: Vec<String>,
    /// Substrings marking draft placeholders
    pub draft_markers: Vec<String>,
}

impl Default for CaptureFilter {
    fn default() -> Self {
        Self {
            table_prefix: "wp_".to_string(),
            housekeeping_markers: vec![
                "_transient_".to_string(),
                "_site_transient_".to_string(),
                "session_tokens".to_string(),
            ],
            draft_markers: vec!["auto-draft".to_string()],
        }
    }
}

impl CaptureFilter {
    /// Name of the configuration-value table.
    pub fn config_table(&self) -> String {
        format!("{}options", self.table_prefix)
    }

    /// Decide whether `statement` is worth capturing.
    pub fn check(&self, statement: &str) -> Result<StatementKind, SkipReason> {
        let kind = classify(statement);
        if kind == StatementKind::Other {
            return Err(SkipReason::NotMutating);
        }
        if statement.contains(&self.config_table()) {
            return Err(SkipReason::ConfigurationStore);
        }
        if contains_any(statement, &self.housekeeping_markers) {
            return Err(SkipReason::Housekeeping);
        }
        if contains_any(statement, &self.draft_markers) {
            return Err(SkipReason::Draft);
        }
        Ok(kind)
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(n.as_str()))
}
