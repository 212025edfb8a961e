//! System clipboard access.
//!
//! Copy buttons talk to a [`Clipboard`] so their state machine can be
//! exercised without a desktop session. [`SystemClipboard`] shells out to
//! the platform tool:
//! - macOS: pbcopy
//! - Linux: xclip, falling back to xsel
//! - Windows: clip.exe

use std::{
    io::Write,
    process::{Command, Stdio},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to spawn {0}: {1}")]
    Spawn(&'static str, #[source] std::io::Error),

    #[error("failed to write to {0}: {1}")]
    Write(&'static str, #[source] std::io::Error),

    #[error("{0} exited with error")]
    Exit(&'static str),

    #[error("clipboard not supported on this platform")]
    Unsupported,
}

/// Destination for copied code.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The operating system clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    #[allow(unreachable_code)]
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        #[cfg(target_os = "macos")]
        return pipe_to("pbcopy", &[], text);

        #[cfg(target_os = "windows")]
        return pipe_to("clip", &[], text);

        #[cfg(target_os = "linux")]
        return pipe_to("xclip", &["-selection", "clipboard"], text)
            .or_else(|_| pipe_to("xsel", &["--clipboard", "--input"], text));

        Err(ClipboardError::Unsupported)
    }
}

/// Run `program args...` and write `text` to its stdin.
#[allow(dead_code)]
fn pipe_to(program: &'static str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| ClipboardError::Spawn(program, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| ClipboardError::Write(program, e))?;
    }

    let status = child
        .wait()
        .map_err(|e| ClipboardError::Write(program, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::Exit(program))
    }
}
