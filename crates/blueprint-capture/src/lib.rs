//! Mutation capture for the blueprint recorder
//!
//! The host hands every database statement to [`CaptureLog::observe`] while
//! recording is on. Inserts and updates that are not noise are appended to a
//! [`MutationStore`] with a monotonically increasing sequence number. Later,
//! a selection of captured statements is exported as one replay script.
//!
//! Persisting a record is itself a write on the host, which would re-enter
//! the observe hook. The log carries an explicit [`CaptureState`]; while a
//! record is being persisted the log is `Recording` and every nested
//! observation is skipped.

pub mod classify;
pub mod error;
pub mod log;
pub mod record;
pub mod store;

pub use classify::{CaptureFilter, SkipReason, StatementKind, classify};
pub use error::{Error, Result};
pub use log::{CaptureLog, CaptureState, ClearOutcome, ExecutionContext, Observation};
pub use record::{CapturedMutation, replay_script};
pub use store::{FileStore, MemoryStore, MutationStore};
