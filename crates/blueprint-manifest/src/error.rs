//! Error types for blueprint-manifest

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding a manifest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest could not be encoded or decoded as JSON
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
