//! Recorder state directory
//!
//! Every command works on one state directory holding the capture journal,
//! the resolver cache, runtime settings and an optional config file.

use std::path::Path;

use blueprint_capture::{CaptureLog, FileStore};
use blueprint_core::{RecorderConfig, RecorderSettings, StatePaths};
use blueprint_resolve::FileCache;

use crate::error::Result;

/// Loaded configuration plus the paths of the recorder's files
#[derive(Debug, Clone)]
pub struct RecorderContext {
    pub paths: StatePaths,
    pub config: RecorderConfig,
}

impl RecorderContext {
    /// Load the context for `dir`.
    ///
    /// An explicit `config` path must exist; the default `<dir>/config.toml`
    /// may be absent.
    pub fn load(dir: &Path, config: Option<&Path>) -> Result<Self> {
        let paths = StatePaths::new(dir);
        let config = match config {
            Some(path) => RecorderConfig::load(path)?,
            None => RecorderConfig::load_or_default(&paths.config())?,
        };
        tracing::debug!(dir = %dir.display(), "loaded recorder context");
        Ok(Self { paths, config })
    }

    pub fn settings(&self) -> Result<RecorderSettings> {
        Ok(RecorderSettings::load(&self.paths.settings())?)
    }

    pub fn save_settings(&self, settings: &RecorderSettings) -> Result<()> {
        settings.save(&self.paths.settings())?;
        Ok(())
    }

    /// Open the capture log over the journal, honoring the paused setting.
    pub fn open_log(&self) -> Result<CaptureLog<FileStore>> {
        let enabled = self.settings()?.recording_enabled();
        let store = FileStore::new(self.paths.journal());
        Ok(CaptureLog::open(
            store,
            self.config.capture.clone(),
            enabled,
        )?)
    }

    pub fn open_cache(&self) -> Result<FileCache> {
        Ok(FileCache::open(self.paths.cache())?)
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }
}
