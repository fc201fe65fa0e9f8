//! The top-level blueprint document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::step::Step;

/// Default base URL of the browser-based provisioning runtime
pub const DEFAULT_PLAYGROUND_URL: &str = "https://playground.wordpress.net/";

/// Runtime versions the blueprint asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferredVersions {
    pub php: String,
    pub wp: String,
}

impl PreferredVersions {
    /// Build from the host's reported versions.
    ///
    /// The runtime only understands `major.minor` PHP versions, so a full
    /// version such as `8.2.10` is reduced to `8.2`.
    pub fn new(php: &str, wp: impl Into<String>) -> Self {
        let php = php.trim().split('.').take(2).collect::<Vec<_>>().join(".");
        Self { php, wp: wp.into() }
    }
}

/// A complete blueprint.
///
/// Built fresh for every generation request and never persisted by the
/// recorder itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Path the runtime opens once provisioning finishes
    pub landing_page: String,
    /// Requested runtime versions
    pub preferred_versions: PreferredVersions,
    /// Capability bundles to enable in the runtime
    pub php_extension_bundles: Vec<String>,
    /// Runtime feature flags
    pub features: BTreeMap<String, bool>,
    /// Whether the runtime logs the visitor in
    pub login: bool,
    /// Ordered steps
    pub steps: Vec<Step>,
}

impl Manifest {
    /// A manifest with the recorder's default metadata and no steps.
    pub fn new(preferred_versions: PreferredVersions) -> Self {
        Self {
            landing_page: "/wp-admin/".to_string(),
            preferred_versions,
            php_extension_bundles: vec!["kitchen-sink".to_string()],
            features: BTreeMap::from([("networking".to_string(), true)]),
            login: true,
            steps: Vec::new(),
        }
    }

    /// Compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON for display.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A link that boots the runtime at `base` with this manifest.
    ///
    /// The manifest travels in the URL fragment; `%` is escaped so the
    /// runtime's fragment decoding yields the original JSON.
    pub fn playground_url(&self, base: &str) -> Result<String> {
        let json = self.to_json()?;
        Ok(format!("{}#{}", base, json.replace('%', "%25")))
    }

    /// Number of steps with the given discriminator.
    pub fn count_steps(&self, kind: &str) -> usize {
        self.steps.iter().filter(|s| s.kind() == kind).count()
    }
}
