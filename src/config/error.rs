//! Errors raised while loading `docsite.toml`.
//!
//! Anything reported here stops the CLI before a command runs; problems the
//! site can still be served with (a missing content directory) are logged
//! instead.

use std::{net::AddrParseError, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    /// `[serve].interface` is not an IP address.
    #[error("[serve.interface] `{0}` is not an IP address")]
    Interface(String, #[source] AddrParseError),

    /// A value parsed but is unusable (`[section.key]` named in the message).
    #[error("Config validation error: {0}")]
    Validation(String),
}
