//! Mutation record stores

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::CapturedMutation;

/// Durable storage for captured mutations, keyed by sequence.
pub trait MutationStore {
    /// Persist one record, returning the sequence it was stored under.
    ///
    /// A sequence at or below [`Self::last_sequence`] was taken by another
    /// writer since the caller last looked; the record is then stored under
    /// the next free number instead.
    fn append(&mut self, mutation: &CapturedMutation) -> Result<u64>;

    /// Every record in ascending sequence order.
    fn list_all(&self) -> Result<Vec<CapturedMutation>>;

    /// Remove every record, returning how many were removed.
    fn delete_all(&mut self) -> Result<usize>;

    /// Highest sequence ever appended, including deleted records.
    fn last_sequence(&self) -> Result<u64>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<CapturedMutation>,
    last_sequence: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `records`.
    pub fn with_records(records: Vec<CapturedMutation>) -> Self {
        let last_sequence = records.iter().map(|m| m.sequence).max().unwrap_or(0);
        Self {
            records,
            last_sequence,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MutationStore for MemoryStore {
    fn append(&mut self, mutation: &CapturedMutation) -> Result<u64> {
        let stored = claim_sequence(self.last_sequence, mutation);
        self.last_sequence = stored.sequence;
        self.records.push(stored);
        Ok(self.last_sequence)
    }

    fn list_all(&self) -> Result<Vec<CapturedMutation>> {
        let mut records = self.records.clone();
        records.sort_by_key(|m| m.sequence);
        Ok(records)
    }

    fn delete_all(&mut self) -> Result<usize> {
        let removed = self.records.len();
        self.records.clear();
        Ok(removed)
    }

    fn last_sequence(&self) -> Result<u64> {
        Ok(self.last_sequence)
    }
}

fn claim_sequence(last_sequence: u64, mutation: &CapturedMutation) -> CapturedMutation {
    let mut stored = mutation.clone();
    if stored.sequence <= last_sequence {
        tracing::debug!(
            requested = stored.sequence,
            assigned = last_sequence + 1,
            "sequence already taken; renumbering"
        );
        stored.sequence = last_sequence + 1;
    }
    stored
}

/// On-disk journal document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Journal {
    /// Journal format version for forward compatibility
    version: String,
    /// Survives clearing so sequence numbers are never reused
    #[serde(default)]
    last_sequence: u64,
    #[serde(default)]
    mutations: Vec<CapturedMutation>,
}

impl Default for Journal {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            last_sequence: 0,
            mutations: Vec::new(),
        }
    }
}

/// A store persisted as a TOML journal.
///
/// Reads take a shared lock. Changes hold an exclusive journal lock across
/// the whole load-modify-save cycle, so several processes can append to the
/// same journal without losing records or sharing sequence numbers.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the journal at `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Journal> {
        match blueprint_fs::read_locked(&self.path)? {
            Some(content) => toml::from_str(&content).map_err(|source| Error::JournalParse {
                path: self.path.clone(),
                source,
            }),
            None => Ok(Journal::default()),
        }
    }

    fn save(&self, journal: &Journal) -> Result<()> {
        let content = toml::to_string_pretty(journal)?;
        blueprint_fs::write_text(&self.path, &content)?;
        Ok(())
    }
}

impl MutationStore for FileStore {
    fn append(&mut self, mutation: &CapturedMutation) -> Result<u64> {
        blueprint_fs::with_exclusive_lock(&self.path, || -> Result<u64> {
            let mut journal = self.load()?;
            let highest = journal.mutations.iter().map(|m| m.sequence).max();
            let stored = claim_sequence(journal.last_sequence.max(highest.unwrap_or(0)), mutation);
            let sequence = stored.sequence;
            journal.last_sequence = sequence;
            journal.mutations.push(stored);
            self.save(&journal)?;
            Ok(sequence)
        })
    }

    fn list_all(&self) -> Result<Vec<CapturedMutation>> {
        let mut mutations = self.load()?.mutations;
        mutations.sort_by_key(|m| m.sequence);
        Ok(mutations)
    }

    fn delete_all(&mut self) -> Result<usize> {
        blueprint_fs::with_exclusive_lock(&self.path, || -> Result<usize> {
            let mut journal = self.load()?;
            let removed = journal.mutations.len();
            if let Some(highest) = journal.mutations.iter().map(|m| m.sequence).max() {
                journal.last_sequence = journal.last_sequence.max(highest);
            }
            journal.mutations.clear();
            self.save(&journal)?;
            Ok(removed)
        })
    }

    fn last_sequence(&self) -> Result<u64> {
        let journal = self.load()?;
        let listed = journal.mutations.iter().map(|m| m.sequence).max().unwrap_or(0);
        Ok(journal.last_sequence.max(listed))
    }
}
