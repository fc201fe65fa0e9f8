//! Site state
//!
//! The host owns plugin, theme and option storage. [`SiteState`] is the
//! narrow view the assembler needs; [`SiteSnapshot`] is a TOML document
//! holding the same facts for offline generation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::unit::{InstallableUnit, parse_requires_header, slug_from_plugin_file};

/// Read-only view of a running site.
pub trait SiteState {
    /// Active plugins in the host's enumeration order.
    fn active_units(&self) -> Vec<InstallableUnit>;

    /// Slug of the active theme, if any.
    fn theme(&self) -> Option<&str>;

    /// Current value of a named option.
    fn option(&self, name: &str) -> Option<Value>;

    fn php_version(&self) -> &str;

    fn wp_version(&self) -> &str;
}

/// Plugin header fields the recorder reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginHeaders {
    #[serde(default)]
    pub name: Option<String>,
    /// Raw "Requires Plugins" header
    #[serde(default)]
    pub requires_plugins: Option<String>,
}

/// A recorded site loaded from TOML.
///
/// ```toml
/// theme = "twentytwentyfour"
/// php_version = "8.2.12"
/// wp_version = "6.5.3"
/// active_plugins = ["woocommerce/woocommerce.php"]
///
/// [plugins.woocommerce]
/// name = "WooCommerce"
///
/// [options]
/// blogname = "My Site"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSnapshot {
    #[serde(default)]
    pub theme: Option<String>,
    pub php_version: String,
    pub wp_version: String,
    /// Active-plugin entries as the host stores them (`dir/file.php`)
    #[serde(default)]
    pub active_plugins: Vec<String>,
    /// Headers per plugin slug
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginHeaders>,
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl SiteSnapshot {
    /// Parse a snapshot document.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = blueprint_fs::read_locked(path)?.ok_or_else(|| Error::SiteNotFound {
            path: path.to_path_buf(),
        })?;
        Self::from_toml(&content).map_err(|e| Error::InvalidSite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl SiteState for SiteSnapshot {
    fn active_units(&self) -> Vec<InstallableUnit> {
        self.active_plugins
            .iter()
            .map(|entry| {
                let slug = slug_from_plugin_file(entry);
                let headers = self.plugins.get(slug);
                let name = headers
                    .and_then(|h| h.name.as_deref())
                    .unwrap_or(slug);
                let requires = headers
                    .and_then(|h| h.requires_plugins.as_deref())
                    .map(parse_requires_header)
                    .unwrap_or_default();
                InstallableUnit::new(slug, name).with_requires(requires)
            })
            .collect()
    }

    fn theme(&self) -> Option<&str> {
        self.theme.as_deref().filter(|t| !t.is_empty())
    }

    fn option(&self, name: &str) -> Option<Value> {
        self.options.get(name).cloned()
    }

    fn php_version(&self) -> &str {
        &self.php_version
    }

    fn wp_version(&self) -> &str {
        &self.wp_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SITE: &str = r#"
theme = "twentytwentyfour"
php_version = "8.1.2"
wp_version = "6.4"
active_plugins = ["payments/payments.php", "shop/shop.php", "hello.php"]

[plugins.payments]
name = "Payments"
requires_plugins = "shop, shop"

[options]
blogname = "Demo"
start_of_week = 1
"#;

    #[test]
    fn enumerates_units_with_headers() {
        let site = SiteSnapshot::from_toml(SITE).unwrap();
        let units = site.active_units();

        assert_eq!(
            units,
            vec![
                InstallableUnit::new("payments", "Payments").with_requires(["shop"]),
                InstallableUnit::new("shop", "shop"),
                InstallableUnit::new("hello", "hello"),
            ]
        );
    }

    #[test]
    fn options_keep_their_types() {
        let site = SiteSnapshot::from_toml(SITE).unwrap();
        assert_eq!(site.option("blogname"), Some(Value::from("Demo")));
        assert_eq!(site.option("start_of_week"), Some(Value::from(1)));
        assert_eq!(site.option("missing"), None);
    }

    #[test]
    fn empty_theme_counts_as_none() {
        let site = SiteSnapshot::from_toml(
            "theme = \"\"\nphp_version = \"8.2\"\nwp_version = \"6.5\"\n",
        )
        .unwrap();
        assert_eq!(site.theme(), None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = SiteSnapshot::from_toml(
            "php_version = \"8.2\"\nwp_version = \"6.5\"\nplugin = []\n",
        );
        assert!(result.is_err());
    }
}
