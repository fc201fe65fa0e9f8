//! The resource resolver

use blueprint_manifest::ResourceDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::TtlCache;
use crate::catalog::Catalog;
use crate::rewrite::classify_download_link;

/// One calendar day
pub const DAY_IN_SECONDS: u64 = 86_400;

/// Resolver constants and cache layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// The recorder's own plugin slug
    pub self_slug: String,
    /// Fixed archive served for [`Self::self_slug`]
    pub self_archive_url: String,
    /// Download links under this prefix are hosted by the registry
    pub registry_prefix: String,
    /// Re-hosting endpoint for upstream archives
    pub mirror_endpoint: String,
    /// Cache entry lifetime in seconds
    pub cache_ttl_secs: u64,
    /// Cache key namespace for plugin descriptors
    pub plugin_namespace: String,
    /// Cache key namespace for theme existence checks
    pub theme_namespace: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            self_slug: "blueprint-recorder".to_string(),
            self_archive_url:
                "https://github-proxy.com/proxy/?repo=akirk/blueprint-recorder&branch=main"
                    .to_string(),
            registry_prefix: "https://downloads.wordpress.org/plugin/".to_string(),
            mirror_endpoint: "https://github-proxy.com/proxy/".to_string(),
            cache_ttl_secs: DAY_IN_SECONDS,
            plugin_namespace: "blueprint_recorder_plugin_zip".to_string(),
            theme_namespace: "blueprint_recorder_theme_exists".to_string(),
        }
    }
}

/// Resolves extension slugs to installable resources.
///
/// Owns its catalog and cache. Resolution never fails: every problem
/// degrades to [`ResourceDescriptor::Unavailable`].
#[derive(Debug)]
pub struct Resolver<C, K> {
    catalog: C,
    cache: K,
    config: ResolverConfig,
}

impl<C: Catalog, K: TtlCache> Resolver<C, K> {
    /// Create a resolver with the default configuration.
    pub fn new(catalog: C, cache: K) -> Self {
        Self::with_config(catalog, cache, ResolverConfig::default())
    }

    /// Create a resolver with an explicit configuration.
    pub fn with_config(catalog: C, cache: K, config: ResolverConfig) -> Self {
        Self {
            catalog,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn cache(&self) -> &K {
        &self.cache
    }

    /// Consume the resolver, returning its cache.
    pub fn into_cache(self) -> K {
        self.cache
    }

    /// Resolve a plugin slug.
    pub fn resolve(&mut self, slug: &str) -> ResourceDescriptor {
        if slug == self.config.self_slug {
            tracing::debug!(slug, "resolved self-reference");
            return ResourceDescriptor::MirroredUrl {
                url: self.config.self_archive_url.clone(),
            };
        }

        let key = self.plugin_key(slug);
        if let Some(value) = self.cache.get(&key) {
            match serde_json::from_value::<ResourceDescriptor>(value) {
                Ok(descriptor) => {
                    tracing::debug!(slug, ?descriptor, "resolver cache hit");
                    return descriptor;
                }
                Err(e) => tracing::debug!(slug, error = %e, "ignoring undecodable cache entry"),
            }
        }

        let descriptor = match self.catalog.lookup_plugin(slug) {
            Ok(Some(info)) => match info.download_link {
                Some(link) => classify_download_link(slug, &link, &self.config),
                None => ResourceDescriptor::Unavailable,
            },
            Ok(None) => ResourceDescriptor::Unavailable,
            Err(e) => {
                tracing::warn!(slug, error = %e, "catalog lookup failed; treating as unavailable");
                ResourceDescriptor::Unavailable
            }
        };
        tracing::debug!(slug, ?descriptor, "resolved from catalog");

        match serde_json::to_value(&descriptor) {
            Ok(value) => self.cache.set(&key, value, self.config.cache_ttl_secs),
            Err(e) => tracing::warn!(slug, error = %e, "failed to encode descriptor for cache"),
        }

        descriptor
    }

    /// Whether the theme directory knows `slug`.
    pub fn theme_exists(&mut self, slug: &str) -> bool {
        let key = self.theme_key(slug);
        if let Some(Value::Bool(exists)) = self.cache.get(&key) {
            tracing::debug!(slug, exists, "theme cache hit");
            return exists;
        }

        let exists = match self.catalog.lookup_theme(slug) {
            Ok(found) => found.is_some(),
            Err(e) => {
                tracing::warn!(slug, error = %e, "theme lookup failed; treating as missing");
                false
            }
        };

        self.cache
            .set(&key, Value::Bool(exists), self.config.cache_ttl_secs);
        exists
    }

    /// Forget the cached descriptor for a plugin slug.
    pub fn invalidate(&mut self, slug: &str) {
        let key = self.plugin_key(slug);
        self.cache.delete(&key);
    }

    /// Forget the cached existence check for a theme slug.
    pub fn invalidate_theme(&mut self, slug: &str) {
        let key = self.theme_key(slug);
        self.cache.delete(&key);
    }

    fn plugin_key(&self, slug: &str) -> String {
        format!("{}:{}", self.config.plugin_namespace, slug)
    }

    fn theme_key(&self, slug: &str) -> String {
        format!("{}:{}", self.config.theme_namespace, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::catalog::{PluginInfo, StaticCatalog};

    #[test]
    fn config_defaults_to_one_day_ttl() {
        assert_eq!(ResolverConfig::default().cache_ttl_secs, 86_400);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"cache_ttl_secs": 60}"#).unwrap();
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.self_slug, "blueprint-recorder");
    }

    #[test]
    fn cache_keys_are_namespaced() {
        let catalog = StaticCatalog::new().with_plugin(
            "akismet",
            PluginInfo::with_download_link("https://downloads.wordpress.org/plugin/akismet.zip"),
        );
        let mut resolver = Resolver::new(catalog, MemoryCache::new());

        resolver.resolve("akismet");
        resolver.theme_exists("akismet");

        assert!(
            resolver
                .cache()
                .entry("blueprint_recorder_plugin_zip:akismet")
                .is_some()
        );
        assert_eq!(
            resolver
                .cache()
                .entry("blueprint_recorder_theme_exists:akismet")
                .map(|e| e.value.clone()),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn plugin_without_download_link_is_unavailable() {
        let catalog = StaticCatalog::new().with_plugin("closed", PluginInfo::default());
        let mut resolver = Resolver::new(catalog, MemoryCache::new());
        assert_eq!(resolver.resolve("closed"), ResourceDescriptor::Unavailable);
    }
}
