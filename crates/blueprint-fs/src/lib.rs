//! File persistence for the blueprint recorder
//!
//! Journals, caches and settings are small documents rewritten as a whole.
//! Writes go through a temp file in the same directory and an atomic rename;
//! reads take a shared advisory lock so a reader never observes a torn file.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{read_locked, with_exclusive_lock, write_atomic, write_text};
