//! Error types for blueprint-capture

use std::path::PathBuf;

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by mutation stores
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The journal file could not be parsed
    #[error("failed to parse capture journal at {path}: {source}")]
    JournalParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The journal could not be encoded
    #[error("failed to encode capture journal: {0}")]
    JournalEncode(#[from] toml::ser::Error),

    /// A store-specific failure
    #[error("mutation store error: {message}")]
    Store { message: String },

    /// Filesystem error from blueprint-fs
    #[error(transparent)]
    Fs(#[from] blueprint_fs::Error),
}
