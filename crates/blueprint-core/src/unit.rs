//! Installable units

use serde::{Deserialize, Serialize};

/// An independently installable extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallableUnit {
    /// Directory slug, unique per site
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// Slugs this unit depends on, without duplicates
    pub requires: Vec<String>,
}

impl InstallableUnit {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            requires: Vec::new(),
        }
    }

    /// Declare requirements. Blank entries, repeats and self-references
    /// are dropped; first-mention order is kept.
    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for required in requires {
            let required = required.into();
            if required.is_empty() || required == self.id || self.requires.contains(&required) {
                continue;
            }
            self.requires.push(required);
        }
        self
    }
}

/// Slug of an active-plugin entry.
///
/// Entries are `dir/main-file.php` for directory plugins and `file.php`
/// for single-file plugins.
pub fn slug_from_plugin_file(entry: &str) -> &str {
    match entry.split_once('/') {
        Some((dir, _)) => dir,
        None => entry.strip_suffix(".php").unwrap_or(entry),
    }
}

/// Parse a comma-separated "Requires Plugins" header.
pub fn parse_requires_header(header: &str) -> Vec<String> {
    let mut requires: Vec<String> = Vec::new();
    for slug in header.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !requires.iter().any(|r| r == slug) {
            requires.push(slug.to_string());
        }
    }
    requires
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("akismet/akismet.php", "akismet")]
    #[case("woocommerce/woocommerce.php", "woocommerce")]
    #[case("hello.php", "hello")]
    #[case("odd-entry", "odd-entry")]
    fn derives_slug(#[case] entry: &str, #[case] slug: &str) {
        assert_eq!(slug_from_plugin_file(entry), slug);
    }

    #[test]
    fn parses_requires_header() {
        assert_eq!(
            parse_requires_header(" woocommerce, jetpack ,,woocommerce"),
            vec!["woocommerce".to_string(), "jetpack".to_string()]
        );
        assert!(parse_requires_header("").is_empty());
    }

    #[test]
    fn requires_are_deduplicated_and_exclude_self() {
        let unit = InstallableUnit::new("a", "A").with_requires(["b", "a", "b", "", "c"]);
        assert_eq!(unit.requires, vec!["b".to_string(), "c".to_string()]);
    }
}
