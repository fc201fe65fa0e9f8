//! File resources and resolver descriptors

use serde::{Deserialize, Serialize};

/// A reference to a file the provisioning runtime fetches or materialises.
///
/// Serialised with a `resource` discriminator, e.g.
/// `{"resource": "wordpress.org/plugins", "slug": "akismet"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource")]
pub enum FileResource {
    /// A plugin from the canonical plugin directory
    #[serde(rename = "wordpress.org/plugins")]
    WordPressPlugin { slug: String },

    /// A theme from the canonical theme directory
    #[serde(rename = "wordpress.org/themes")]
    WordPressTheme { slug: String },

    /// An arbitrary URL
    #[serde(rename = "url")]
    Url { url: String },

    /// Inline file contents
    #[serde(rename = "literal")]
    Literal { name: String, contents: String },
}

impl FileResource {
    /// Plugin directory reference for `slug`.
    pub fn plugin(slug: impl Into<String>) -> Self {
        Self::WordPressPlugin { slug: slug.into() }
    }

    /// Theme directory reference for `slug`.
    pub fn theme(slug: impl Into<String>) -> Self {
        Self::WordPressTheme { slug: slug.into() }
    }

    /// Inline file named `name`.
    pub fn literal(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::Literal {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Where an installable unit's distributable archive can be fetched from.
///
/// Produced by the resource resolver. A `MirroredUrl` is only ever built from
/// an upstream archive URL that matched the resolver's strict owner/repo/ref
/// pattern; the resolver is the sole constructor in this workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResourceDescriptor {
    /// Hosted on the canonical registry under `slug`
    Registry { slug: String },
    /// Proxied through the re-hosting endpoint
    MirroredUrl { url: String },
    /// No known source
    Unavailable,
}

impl ResourceDescriptor {
    /// Whether the unit can be installed at all.
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// The plugin file reference for this descriptor, if any.
    pub fn to_plugin_resource(&self) -> Option<FileResource> {
        match self {
            Self::Registry { slug } => Some(FileResource::plugin(slug.clone())),
            Self::MirroredUrl { url } => Some(FileResource::Url { url: url.clone() }),
            Self::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plugin_resource_uses_directory_discriminator() {
        let value = serde_json::to_value(FileResource::plugin("akismet")).unwrap();
        assert_eq!(
            value,
            json!({"resource": "wordpress.org/plugins", "slug": "akismet"})
        );
    }

    #[test]
    fn literal_resource_carries_name_and_contents() {
        let value = serde_json::to_value(FileResource::literal("replay.sql", "SELECT 1;\n")).unwrap();
        assert_eq!(
            value,
            json!({"resource": "literal", "name": "replay.sql", "contents": "SELECT 1;\n"})
        );
    }

    #[test]
    fn registry_descriptor_maps_to_plugin_directory() {
        let descriptor = ResourceDescriptor::Registry {
            slug: "jetpack".to_string(),
        };
        assert_eq!(
            descriptor.to_plugin_resource(),
            Some(FileResource::plugin("jetpack"))
        );
    }

    #[test]
    fn mirrored_descriptor_maps_to_url() {
        let descriptor = ResourceDescriptor::MirroredUrl {
            url: "https://github-proxy.com/proxy/?repo=a/b&release=v1".to_string(),
        };
        assert_eq!(
            descriptor.to_plugin_resource(),
            Some(FileResource::Url {
                url: "https://github-proxy.com/proxy/?repo=a/b&release=v1".to_string()
            })
        );
    }

    #[test]
    fn unavailable_has_no_resource() {
        assert!(!ResourceDescriptor::Unavailable.is_available());
        assert_eq!(ResourceDescriptor::Unavailable.to_plugin_resource(), None);
    }

    #[test]
    fn descriptor_serializes_with_kind_tag() {
        let value = serde_json::to_value(ResourceDescriptor::Unavailable).unwrap();
        assert_eq!(value, json!({"kind": "unavailable"}));

        let value = serde_json::to_value(ResourceDescriptor::MirroredUrl {
            url: "u".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"kind": "mirroredUrl", "url": "u"}));
    }
}
