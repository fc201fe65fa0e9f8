//! Error types for blueprint-core

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] blueprint_fs::Error),

    #[error(transparent)]
    Manifest(#[from] blueprint_manifest::Error),

    #[error(transparent)]
    Resolve(#[from] blueprint_resolve::Error),

    #[error(transparent)]
    Capture(#[from] blueprint_capture::Error),

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Site snapshot not found at {path}")]
    SiteNotFound { path: PathBuf },

    #[error("Invalid site snapshot at {path}: {message}")]
    InvalidSite { path: PathBuf, message: String },

    #[error("Failed to encode settings: {0}")]
    SettingsEncode(#[from] toml::ser::Error),
}
