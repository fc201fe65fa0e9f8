//! Site and catalog fixtures

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::catalog::FakeCatalog;

/// A recorded site: a dependent plugin listed before its dependency, one
/// upstream-hosted plugin, one private plugin and the recorder itself.
pub const SITE_TOML: &str = r#"
theme = "twentytwentyfour"
php_version = "8.2.12"
wp_version = "6.5.3"
active_plugins = [
    "woocommerce-payments/woocommerce-payments.php",
    "woocommerce/woocommerce.php",
    "acme-widget/acme-widget.php",
    "private-tool/private-tool.php",
    "blueprint-recorder/blueprint-recorder.php",
]

[plugins.woocommerce]
name = "WooCommerce"

[plugins.woocommerce-payments]
name = "WooPayments"
requires_plugins = "woocommerce"

[plugins.acme-widget]
name = "Acme Widget"

[plugins.private-tool]
name = "Private Tool"

[plugins.blueprint-recorder]
name = "Blueprint Recorder"

[options]
blogname = "Recorded Site"
blogdescription = "Just another site"
start_of_week = "1"
timezone_string = "Europe/Vienna"
date_format = "F j, Y"
time_format = "g:i a"
permalink_structure = "/%postname%/"
"#;

/// The catalog matching [`SITE_TOML`].
pub fn fixture_catalog() -> FakeCatalog {
    FakeCatalog::new()
        .with_registry_plugin("woocommerce")
        .with_registry_plugin("woocommerce-payments")
        .with_plugin_link(
            "acme-widget",
            "https://github.com/acme/widget/archive/refs/tags/v2.1.0.zip",
        )
        .with_theme("twentytwentyfour")
}

/// JSON export of [`fixture_catalog`] for file-based consumers.
pub const CATALOG_JSON: &str = r#"{
  "plugins": {
    "woocommerce": {"download_link": "https://downloads.wordpress.org/plugin/woocommerce.zip"},
    "woocommerce-payments": {"download_link": "https://downloads.wordpress.org/plugin/woocommerce-payments.zip"},
    "acme-widget": {"download_link": "https://github.com/acme/widget/archive/refs/tags/v2.1.0.zip"}
  },
  "themes": {"twentytwentyfour": {}}
}"#;

/// A temporary recorder state directory with fixture files on demand.
pub struct StateDir {
    temp: TempDir,
}

impl StateDir {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write [`SITE_TOML`] and return its path.
    pub fn write_site(&self) -> PathBuf {
        self.write("site.toml", SITE_TOML)
    }

    /// Write [`CATALOG_JSON`] and return its path.
    pub fn write_catalog(&self) -> PathBuf {
        self.write("catalog.json", CATALOG_JSON)
    }

    /// Write an arbitrary file relative to the root.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        std::fs::write(&path, content).expect("failed to write fixture");
        path
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}
