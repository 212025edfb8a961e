//! Site configuration management for `docsite.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Site metadata (title, description, language)     |
//! | `[content]` | Content root, raw file URL base, catalog file    |
//! | `[serve]`   | HTTP server (interface, port)                    |
//! | `[view]`    | Header offset, copy reset delay, open sections   |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "JS Handbook"
//!
//! [content]
//! root = "content"
//!
//! [serve]
//! port = 5277
//!
//! [view]
//! expanded = ["js-fundamentals", "design-patterns"]
//! ```

mod base;
mod content;
pub mod defaults;
mod error;
mod serve;
mod view;

pub use base::BaseConfig;
pub use content::ContentConfig;
pub use error::ConfigError;
pub use serve::ServeConfig;
pub use view::ViewConfig;

use crate::cli::{Cli, Commands};
use crate::log;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing docsite.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (set after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Content location settings
    #[serde(default)]
    pub content: ContentConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Page chrome behavior
    #[serde(default)]
    pub view: ViewConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load config for the given CLI invocation.
    ///
    /// A missing config file is not an error: every field has a default.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = Self::normalize_path(cli.root.as_deref().unwrap_or(Path::new("./")));

        Self::update_option(&mut self.content.root, cli.content.as_ref());

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.content.root = Self::normalize_path(&root.join(&self.content.root));
        if let Some(catalog) = self.content.catalog.as_ref() {
            self.content.catalog = Some(Self::normalize_path(&root.join(catalog)));
        }
        self.root = root;

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values.
    ///
    /// A missing content directory only warns: every page then shows a fetch
    /// error panel, which is how dangling catalog entries surface anyway.
    pub fn validate(&self) -> Result<()> {
        self.serve.validate()?;

        let url_base = &self.content.url_base;
        if !url_base.starts_with('/') || !url_base.ends_with('/') {
            bail!(ConfigError::Validation(
                "[content.url_base] must start and end with `/`".into()
            ));
        }

        if matches!(url_base.as_str(), "/" | "/section/" | "/pattern/" | "/assets/") {
            bail!(ConfigError::Validation(format!(
                "[content.url_base] `{url_base}` collides with a page route"
            )));
        }

        if self.view.copy_reset_ms == 0 {
            bail!(ConfigError::Validation(
                "[view.copy_reset_ms] must be greater than 0".into()
            ));
        }

        if let Some(path) = &self.content.catalog
            && !path.is_file()
        {
            bail!(ConfigError::Validation(format!(
                "[content.catalog] `{}` not found",
                path.display()
            )));
        }

        if !self.content.root.is_dir() {
            log!("config"; "content directory `{}` not found", self.content.root.display());
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
