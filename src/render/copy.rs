//! Copy-to-clipboard control attached to every code block.
//!
//! ```text
//!          click (clipboard ok)            reset delay elapsed
//!   Idle ───────────────────────▶ Copied ───────────────────────▶ Idle
//!                                  │  ▲
//!                                  └──┘ click (clipboard ok): restart delay
//! ```
//!
//! A failed clipboard write is logged and leaves the state unchanged; the
//! button never reports "Copied!" for text that did not reach the clipboard.
//! The served page runs the same machine in `embed/serve/app.js`.

use crate::clipboard::Clipboard;
use crate::log;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyState {
    Idle,
    /// Showing success until `until`.
    Copied { until: Instant },
}

/// One code block's copy button.
#[derive(Debug, Clone)]
pub struct CopyButton {
    text: String,
    state: CopyState,
    reset_after: Duration,
}

impl CopyButton {
    /// Button for a code block's source text.
    ///
    /// The trailing newline the Markdown parser leaves on block content is
    /// not copied.
    pub fn new(code: &str, reset_after: Duration) -> Self {
        Self {
            text: strip_trailing_newline(code).to_owned(),
            state: CopyState::Idle,
            reset_after,
        }
    }

    /// Text placed on the clipboard by [`Self::click`].
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Label shown at `now`; the success label lapses once the reset delay
    /// has elapsed.
    pub fn label(&self, now: Instant) -> &'static str {
        match self.state {
            CopyState::Copied { until } if now < until => "Copied!",
            _ => "Copy",
        }
    }

    /// Copy the block text. Returns whether the clipboard accepted it.
    pub fn click(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        match clipboard.write_text(&self.text) {
            Ok(()) => {
                self.state = CopyState::Copied {
                    until: now + self.reset_after,
                };
                true
            }
            Err(err) => {
                log!("copy"; "clipboard write failed: {err}");
                false
            }
        }
    }
}

/// Drop one trailing `\n` (or `\r\n`).
pub fn strip_trailing_newline(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text)
}
