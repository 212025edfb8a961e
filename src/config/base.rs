//! `[base]` section configuration.
//!
//! Site metadata shown in the page header and `<title>`.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in docsite.toml - site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "JS Handbook"
/// description = "Patterns, fundamentals and interview prep"
/// language = "en"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title displayed in the header and browser tab.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Short description shown on the home page.
    #[serde(default = "defaults::base::description")]
    #[educe(Default = defaults::base::description())]
    pub description: String,

    /// BCP 47 language code for the `<html lang>` attribute.
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Pattern Notes"
            description = "GoF patterns in JavaScript"
            language = "en-GB"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Pattern Notes");
        assert_eq!(config.base.description, "GoF patterns in JavaScript");
        assert_eq!(config.base.language, "en-GB");
    }

    #[test]
    fn test_base_config_defaults() {
        let config: SiteConfig = toml::from_str("[base]").unwrap();

        assert_eq!(config.base.title, "JS Handbook");
        assert_eq!(config.base.language, "en");
    }
}
