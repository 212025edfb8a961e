//! `[view]` section configuration.
//!
//! Behavior of the page chrome: header offset for anchor scrolling, how long
//! a copy button shows "Copied!", and which sidebar sections start expanded.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[view]` section in docsite.toml.
///
/// # Example
/// ```toml
/// [view]
/// header_offset = 64
/// copy_reset_ms = 1500
/// expanded = ["js-fundamentals", "design-patterns"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Pixels subtracted from anchor scroll positions (fixed header height).
    #[serde(default = "defaults::view::header_offset")]
    #[educe(Default = defaults::view::header_offset())]
    pub header_offset: u32,

    /// Milliseconds a copy button stays in the "Copied!" state.
    #[serde(default = "defaults::view::copy_reset_ms")]
    #[educe(Default = defaults::view::copy_reset_ms())]
    pub copy_reset_ms: u64,

    /// Section ids whose sidebar group is open on first render.
    #[serde(default = "defaults::view::expanded")]
    #[educe(Default = defaults::view::expanded())]
    pub expanded: Vec<String>,
}

impl ViewConfig {
    pub const fn copy_reset(&self) -> Duration {
        Duration::from_millis(self.copy_reset_ms)
    }
}
