//! `[serve]` section configuration.
//!
//! Where `docsite serve` listens. Pages, raw content files and assets are
//! all served from this one address; `--interface` and `--port` override it.

use super::{ConfigError, defaults};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// `[serve]` section in docsite.toml.
///
/// # Example
/// ```toml
/// [serve]
/// interface = "0.0.0.0"  # reachable from the LAN
/// port = 3000            # next free port is tried when taken
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    #[serde(default = "defaults::serve::interface")]
    #[educe(Default = defaults::serve::interface())]
    pub interface: String,

    /// First port tried (default: 5277).
    #[serde(default = "defaults::serve::port")]
    #[educe(Default = defaults::serve::port())]
    pub port: u16,
}

impl ServeConfig {
    /// The interface as an address to bind.
    pub fn ip(&self) -> Result<IpAddr, ConfigError> {
        self.interface
            .parse()
            .map_err(|err| ConfigError::Interface(self.interface.clone(), err))
    }

    /// Check the section on its own.
    ///
    /// Port 0 would bind a random port on every retry, so it is refused.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ip()?;
        if self.port == 0 {
            return Err(ConfigError::Validation("[serve.port] must be greater than 0".into()));
        }
        Ok(())
    }
}
