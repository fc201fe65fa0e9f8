//! Download-link classification
//!
//! The catalog's download link decides where a plugin is fetched from. Only
//! two shapes are accepted: the registry's own mirror, and a source-host
//! branch or tag archive, which is rewritten to go through the re-hosting
//! endpoint. Any other link is treated as if the plugin were unknown.

use std::sync::LazyLock;

use blueprint_manifest::ResourceDescriptor;
use regex::Regex;

use crate::resolver::ResolverConfig;

/// `https://github.com/<owner>/<repo>/archive/refs/(heads|tags)/<ref>.zip`
static UPSTREAM_ARCHIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([^/]+/[^/]+)/archive/refs/(heads|tags)/([^/]+)\.zip$")
        .unwrap()
});

/// Classify a catalog download link for `slug`.
pub fn classify_download_link(
    slug: &str,
    link: &str,
    config: &ResolverConfig,
) -> ResourceDescriptor {
    if link.starts_with(&config.registry_prefix) {
        return ResourceDescriptor::Registry {
            slug: slug.to_string(),
        };
    }

    if let Some(caps) = UPSTREAM_ARCHIVE.captures(link) {
        let repo = &caps[1];
        let reference = &caps[3];
        return ResourceDescriptor::MirroredUrl {
            url: format!(
                "{}?repo={}&release={}",
                config.mirror_endpoint, repo, reference
            ),
        };
    }

    ResourceDescriptor::Unavailable
}
