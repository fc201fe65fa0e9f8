//! Recorder configuration and settings
//!
//! `config.toml` holds operator configuration; every section is optional.
//! `settings.toml` holds state the recorder itself toggles, currently only
//! whether recording is paused.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use blueprint_capture::CaptureFilter;
use blueprint_manifest::{Manifest, PreferredVersions};
use blueprint_resolve::ResolverConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options embedded in every blueprint unless configured otherwise
pub const DEFAULT_OPTION_NAMES: [&str; 8] = [
    "blogname",
    "blogdescription",
    "start_of_week",
    "timezone_string",
    "date_format",
    "time_format",
    "permalink_structure",
    "rss_use_excerpt",
];

/// Top-level recorder configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecorderConfig {
    pub resolver: ResolverConfig,
    pub capture: CaptureFilter,
    pub manifest: ManifestDefaults,
}

impl RecorderConfig {
    /// Parse a configuration document.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a configuration file that must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = blueprint_fs::read_locked(path)?.ok_or_else(|| Error::ConfigNotFound {
            path: path.to_path_buf(),
        })?;
        Self::from_toml(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a configuration file, falling back to defaults when it is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound { .. }) => {
                tracing::debug!(path = %path.display(), "no configuration file; using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// Manifest metadata and the option names to embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestDefaults {
    pub landing_page: String,
    pub php_extension_bundles: Vec<String>,
    pub login: bool,
    pub option_names: Vec<String>,
    pub features: BTreeMap<String, bool>,
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        let base = Manifest::new(PreferredVersions::new("", ""));
        Self {
            landing_page: base.landing_page,
            php_extension_bundles: base.php_extension_bundles,
            login: base.login,
            option_names: DEFAULT_OPTION_NAMES.iter().map(|s| s.to_string()).collect(),
            features: base.features,
        }
    }
}

impl ManifestDefaults {
    /// An empty manifest carrying this metadata.
    pub fn manifest(&self, versions: PreferredVersions) -> Manifest {
        Manifest {
            landing_page: self.landing_page.clone(),
            preferred_versions: versions,
            php_extension_bundles: self.php_extension_bundles.clone(),
            features: self.features.clone(),
            login: self.login,
            steps: Vec::new(),
        }
    }
}

/// Settings the recorder toggles at runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderSettings {
    #[serde(default)]
    pub recording_disabled: bool,
}

impl RecorderSettings {
    /// Load settings; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match blueprint_fs::read_locked(path)? {
            Some(content) => toml::from_str(&content).map_err(|e| Error::InvalidConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        blueprint_fs::write_text(path, &content)?;
        Ok(())
    }

    pub fn recording_enabled(&self) -> bool {
        !self.recording_disabled
    }
}

/// Default locations of the recorder's files inside a state directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn journal(&self) -> PathBuf {
        self.root.join("journal.toml")
    }

    pub fn cache(&self) -> PathBuf {
        self.root.join("cache.json")
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join("settings.toml")
    }

    pub fn config(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}
