//! Extension catalog collaborator

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::Error;

/// Catalog metadata for a plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Where the catalog says the archive can be downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
}

impl PluginInfo {
    /// Plugin metadata with only a download link.
    pub fn with_download_link(link: impl Into<String>) -> Self {
        Self {
            name: None,
            download_link: Some(link.into()),
        }
    }
}

/// Catalog metadata for a theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A failed catalog request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The request could not be completed
    #[error("catalog request failed: {0}")]
    Request(String),

    /// The catalog answered with something unusable
    #[error("malformed catalog response: {0}")]
    Malformed(String),
}

/// Looks up extension metadata in an external catalog.
///
/// `Ok(None)` means "not found". The resolver treats errors exactly like
/// "not found"; timeouts and retries are the implementation's business.
pub trait Catalog {
    fn lookup_plugin(&self, slug: &str) -> std::result::Result<Option<PluginInfo>, CatalogError>;

    fn lookup_theme(&self, slug: &str) -> std::result::Result<Option<ThemeInfo>, CatalogError>;
}

/// A catalog held in memory, typically loaded from a JSON export.
///
/// ```json
/// {
///   "plugins": {"akismet": {"download_link": "https://downloads.wordpress.org/plugin/akismet.zip"}},
///   "themes": {"twentytwentyfour": {}}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticCatalog {
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginInfo>,
    #[serde(default)]
    pub themes: BTreeMap<String, ThemeInfo>,
}

impl StaticCatalog {
    /// An empty catalog: every lookup is "not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog document.
    pub fn load(path: &Path) -> Result<Self> {
        let content = blueprint_fs::read_locked(path)?.ok_or_else(|| Error::CatalogNotFound {
            path: path.to_path_buf(),
        })?;
        serde_json::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add a plugin entry.
    pub fn with_plugin(mut self, slug: impl Into<String>, info: PluginInfo) -> Self {
        self.plugins.insert(slug.into(), info);
        self
    }

    /// Add a theme entry.
    pub fn with_theme(mut self, slug: impl Into<String>) -> Self {
        self.themes.insert(slug.into(), ThemeInfo::default());
        self
    }
}

impl Catalog for StaticCatalog {
    fn lookup_plugin(&self, slug: &str) -> std::result::Result<Option<PluginInfo>, CatalogError> {
        Ok(self.plugins.get(slug).cloned())
    }

    fn lookup_theme(&self, slug: &str) -> std::result::Result<Option<ThemeInfo>, CatalogError> {
        Ok(self.themes.get(slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_catalog_parses_export() {
        let catalog: StaticCatalog = serde_json::from_str(
            r#"{
                "plugins": {"akismet": {"download_link": "https://downloads.wordpress.org/plugin/akismet.zip"}},
                "themes": {"twentytwentyfour": {}}
            }"#,
        )
        .unwrap();

        let akismet = catalog.lookup_plugin("akismet").unwrap().unwrap();
        assert_eq!(
            akismet.download_link.as_deref(),
            Some("https://downloads.wordpress.org/plugin/akismet.zip")
        );
        assert!(catalog.lookup_theme("twentytwentyfour").unwrap().is_some());
        assert!(catalog.lookup_plugin("missing").unwrap().is_none());
    }

    #[test]
    fn static_catalog_rejects_unknown_sections() {
        let result: std::result::Result<StaticCatalog, _> =
            serde_json::from_str(r#"{"plugins": {}, "widgets": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn load_missing_catalog_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticCatalog::load(&dir.path().join("catalog.json")).unwrap_err();
        assert!(matches!(err, Error::CatalogNotFound { .. }));
    }
}
