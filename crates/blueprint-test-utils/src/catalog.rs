//! A catalog double with query accounting

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use blueprint_resolve::{Catalog, CatalogError, PluginInfo, ThemeInfo};

/// Catalog that records how often it was asked.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    plugins: BTreeMap<String, PluginInfo>,
    themes: BTreeSet<String>,
    failing: BTreeSet<String>,
    plugin_queries: Cell<usize>,
    theme_queries: Cell<usize>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plugin hosted on the registry mirror.
    pub fn with_registry_plugin(self, slug: &str) -> Self {
        let link = format!("https://downloads.wordpress.org/plugin/{slug}.zip");
        self.with_plugin_link(slug, &link)
    }

    /// A plugin whose catalog entry points at `link`.
    pub fn with_plugin_link(mut self, slug: &str, link: &str) -> Self {
        self.plugins
            .insert(slug.to_string(), PluginInfo::with_download_link(link));
        self
    }

    /// A theme the catalog knows.
    pub fn with_theme(mut self, slug: &str) -> Self {
        self.themes.insert(slug.to_string());
        self
    }

    /// Every lookup of `slug` fails with a request error.
    pub fn failing_on(mut self, slug: &str) -> Self {
        self.failing.insert(slug.to_string());
        self
    }

    /// Plugin lookups served so far.
    pub fn plugin_queries(&self) -> usize {
        self.plugin_queries.get()
    }

    /// Theme lookups served so far.
    pub fn theme_queries(&self) -> usize {
        self.theme_queries.get()
    }

    fn check_failure(&self, slug: &str) -> Result<(), CatalogError> {
        if self.failing.contains(slug) {
            return Err(CatalogError::Request(format!("connection reset while fetching {slug}")));
        }
        Ok(())
    }
}

impl Catalog for FakeCatalog {
    fn lookup_plugin(&self, slug: &str) -> Result<Option<PluginInfo>, CatalogError> {
        self.plugin_queries.set(self.plugin_queries.get() + 1);
        self.check_failure(slug)?;
        Ok(self.plugins.get(slug).cloned())
    }

    fn lookup_theme(&self, slug: &str) -> Result<Option<ThemeInfo>, CatalogError> {
        self.theme_queries.set(self.theme_queries.get() + 1);
        self.check_failure(slug)?;
        Ok(self.themes.contains(slug).then(ThemeInfo::default))
    }
}
