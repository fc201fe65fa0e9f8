//! The capture log state machine

use std::cell::{Cell, RefCell};

use chrono::Utc;

use crate::classify::{CaptureFilter, SkipReason};
use crate::error::Result;
use crate::record::{CapturedMutation, replay_script};
use crate::store::MutationStore;

/// Capture state.
///
/// ```text
/// Disabled <--pause/resume--> Idle --observe--> Recording --persisted--> Idle
/// ```
///
/// `Recording` lasts only while one statement is being persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Disabled,
    Idle,
    Recording,
}

/// Who is running the statement being observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    /// A person using the site
    #[default]
    Interactive,
    /// Scheduled job
    Background,
    /// Host installer
    Installing,
}

/// What happened to an observed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Persisted under this sequence number
    Captured(u64),
    /// Filtered out
    Skipped(SkipReason),
    /// Qualified, but the store rejected it
    Failed,
}

/// Result of a clear request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { removed: usize },
    Denied,
}

/// Restores the pre-persist state when dropped, unless someone paused the
/// log in the meantime.
struct RecordingGuard<'a> {
    state: &'a Cell<CaptureState>,
    previous: CaptureState,
}

impl<'a> RecordingGuard<'a> {
    fn enter(state: &'a Cell<CaptureState>) -> Self {
        let previous = state.replace(CaptureState::Recording);
        Self { state, previous }
    }
}

impl Drop for RecordingGuard<'_> {
    fn drop(&mut self) {
        if self.state.get() == CaptureState::Recording {
            self.state.set(self.previous);
        }
    }
}

/// Intercepts statements and records the ones worth replaying.
///
/// All methods take `&self`: the host's write hook may call back into the
/// log while a record is being persisted, and those nested calls must see
/// the `Recording` state instead of a borrow conflict.
pub struct CaptureLog<S> {
    store: RefCell<S>,
    filter: CaptureFilter,
    state: Cell<CaptureState>,
    next_sequence: Cell<u64>,
}

impl<S: MutationStore> CaptureLog<S> {
    /// Open a log over `store`.
    ///
    /// Sequence numbers continue after the highest one the store has seen.
    /// `enabled` comes from the host's recording setting.
    pub fn open(store: S, filter: CaptureFilter, enabled: bool) -> Result<Self> {
        let last = store.last_sequence()?;
        let state = if enabled {
            CaptureState::Idle
        } else {
            CaptureState::Disabled
        };

        Ok(Self {
            store: RefCell::new(store),
            filter,
            state: Cell::new(state),
            next_sequence: Cell::new(last + 1),
        })
    }

    pub fn state(&self) -> CaptureState {
        self.state.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.get() != CaptureState::Disabled
    }

    pub fn filter(&self) -> &CaptureFilter {
        &self.filter
    }

    /// Stop capturing.
    pub fn pause(&self) {
        self.state.set(CaptureState::Disabled);
    }

    /// Resume capturing after [`Self::pause`].
    pub fn resume(&self) {
        if self.state.get() == CaptureState::Disabled {
            self.state.set(CaptureState::Idle);
        }
    }

    /// Write-hook entry point: record `statement` if it qualifies and hand
    /// it back unchanged.
    pub fn observe<'a>(&self, statement: &'a str, context: ExecutionContext) -> &'a str {
        self.record(statement, context);
        statement
    }

    /// Record `statement` if it qualifies, reporting what happened.
    pub fn record(&self, statement: &str, context: ExecutionContext) -> Observation {
        match self.state.get() {
            CaptureState::Disabled => return Observation::Skipped(SkipReason::Disabled),
            CaptureState::Recording => return Observation::Skipped(SkipReason::Reentrant),
            CaptureState::Idle => {}
        }

        if context != ExecutionContext::Interactive {
            return Observation::Skipped(SkipReason::Unattended);
        }

        if let Err(reason) = self.filter.check(statement) {
            tracing::trace!(%reason, "statement not captured");
            return Observation::Skipped(reason);
        }

        let sequence = self.next_sequence.get();
        let mutation = CapturedMutation::new(sequence, Utc::now(), statement);

        let guard = RecordingGuard::enter(&self.state);
        let result = match self.store.try_borrow_mut() {
            Ok(mut store) => store.append(&mutation),
            Err(_) => return Observation::Skipped(SkipReason::Reentrant),
        };
        drop(guard);

        match result {
            Ok(stored) => {
                self.next_sequence.set(stored + 1);
                tracing::info!(sequence = stored, "captured mutation");
                Observation::Captured(stored)
            }
            Err(e) => {
                tracing::warn!(sequence, error = %e, "failed to persist captured mutation");
                Observation::Failed
            }
        }
    }

    /// Every captured mutation in sequence order.
    pub fn mutations(&self) -> Result<Vec<CapturedMutation>> {
        self.store.borrow().list_all()
    }

    /// One script holding the selected mutations in capture order.
    pub fn export_replay_script(&self, selected: &[u64]) -> Result<String> {
        Ok(replay_script(&self.mutations()?, selected))
    }

    /// Delete every captured mutation if the caller is authorized.
    ///
    /// The sequence counter keeps counting, so numbers are never reused.
    pub fn clear(&self, authorized: bool) -> Result<ClearOutcome> {
        if !authorized {
            tracing::warn!("refused to clear captured mutations for unauthorized caller");
            return Ok(ClearOutcome::Denied);
        }

        let _guard = RecordingGuard::enter(&self.state);
        let removed = self.store.borrow_mut().delete_all()?;
        tracing::info!(removed, "cleared captured mutations");
        Ok(ClearOutcome::Cleared { removed })
    }

    /// Consume the log, returning its store.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }
}
