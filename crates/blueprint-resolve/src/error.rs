//! Error types for blueprint-resolve
//!
//! Resolution itself never fails; these errors come from loading or
//! persisting the collaborators (file-backed caches, static catalogs).

use std::path::PathBuf;

/// Result type for blueprint-resolve operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or saving resolver collaborators
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A catalog or cache document could not be parsed
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A catalog document does not exist
    #[error("catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// A cache document could not be encoded
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Filesystem error from blueprint-fs
    #[error(transparent)]
    Fs(#[from] blueprint_fs::Error),
}
