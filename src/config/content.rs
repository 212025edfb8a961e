//! `[content]` section configuration.
//!
//! Where the Markdown files live, which URL path exposes them, and an
//! optional catalog file replacing the built-in one.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[content]` section in docsite.toml.
///
/// # Example
/// ```toml
/// [content]
/// root = "content"
/// url_base = "/content/"
/// catalog = "catalog.toml"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory holding the Markdown files, relative to the project root.
    #[serde(default = "defaults::content::root")]
    #[educe(Default = defaults::content::root())]
    pub root: PathBuf,

    /// HTTP path prefix the raw files are served under. Must start and end with `/`.
    #[serde(default = "defaults::content::url_base")]
    #[educe(Default = defaults::content::url_base())]
    pub url_base: String,

    /// Catalog TOML replacing the built-in catalog.
    #[serde(default = "defaults::content::catalog")]
    #[educe(Default = defaults::content::catalog())]
    pub catalog: Option<PathBuf>,
}

impl ContentConfig {
    /// URL under which `file` is retrievable, e.g. `/content/creational/singleton.md`.
    pub fn url_for(&self, file: &str) -> String {
        format!("{}{}", self.url_base, file.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_content_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.content.root, PathBuf::from("content"));
        assert_eq!(config.content.url_base, "/content/");
        assert!(config.content.catalog.is_none());
    }

    #[test]
    fn test_content_config_override() {
        let config = r#"
            [content]
            root = "docs"
            url_base = "/raw/"
            catalog = "handbook.toml"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.content.root, PathBuf::from("docs"));
        assert_eq!(config.content.url_base, "/raw/");
        assert_eq!(config.content.catalog, Some(PathBuf::from("handbook.toml")));
    }

    #[test]
    fn test_url_for_joins_base() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(
            config.content.url_for("creational/singleton.md"),
            "/content/creational/singleton.md"
        );
        assert_eq!(config.content.url_for("/README.md"), "/content/README.md");
    }
}
