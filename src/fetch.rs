//! Document retrieval and load state.
//!
//! [`ContentSource`] abstracts where Markdown text comes from. The server
//! exposes the same files at `GET /content/<file>`; [`FsSource`] reads them
//! straight from the content root so a page render does not loop back
//! through HTTP.
//!
//! [`DocumentLoader`] tracks the view's load state. Every [`begin`] issues a
//! [`Ticket`] carrying a generation number; a completion whose ticket is no
//! longer current is discarded, so a slow response for an earlier navigation
//! can never overwrite the document of a later one.
//!
//! [`begin`]: DocumentLoader::begin

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Retrieval failure for one document path.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The file could not be served (missing, forbidden path).
    #[error("Failed to load {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    /// Reading failed for another reason.
    #[error("Failed to load {path}: HTTP 500 ({source})")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The file is not UTF-8 text.
    #[error("Failed to load {path}: HTTP 500 (content is not valid UTF-8)")]
    Encoding { path: String },
}

impl FetchError {
    /// HTTP status equivalent of this failure.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            Self::Io { .. } | Self::Encoding { .. } => 500,
        }
    }

    /// The path whose retrieval failed.
    pub fn path(&self) -> &str {
        match self {
            Self::Status { path, .. } | Self::Io { path, .. } | Self::Encoding { path } => path,
        }
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Somewhere Markdown documents can be read from.
pub trait ContentSource: Send + Sync {
    /// Retrieve the raw text at `path` (relative to the content root).
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Reads documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a content path to a file below the root.
    ///
    /// Absolute paths and `..` segments are refused with 403 so that
    /// `GET /content/../docsite.toml` cannot leave the content root.
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(FetchError::Status {
                path: path.to_owned(),
                status: 403,
            });
        }
        Ok(self.root.join(relative))
    }

    /// Raw bytes of the file at `path`.
    ///
    /// Missing files and directories are 404, unreadable files 403, any
    /// other I/O failure 500.
    pub fn read(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full = self.resolve(path)?;
        if full.is_dir() {
            return Err(FetchError::Status {
                path: path.to_owned(),
                status: 404,
            });
        }

        fs::read(&full).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => FetchError::Status {
                path: path.to_owned(),
                status: 404,
            },
            io::ErrorKind::PermissionDenied => FetchError::Status {
                path: path.to_owned(),
                status: 403,
            },
            _ => FetchError::Io {
                path: path.to_owned(),
                source,
            },
        })
    }
}

impl ContentSource for FsSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|_| FetchError::Encoding {
            path: path.to_owned(),
        })
    }
}

/// In-memory source for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySource {
    files: rustc_hash::FxHashMap<String, String>,
}

#[cfg(test)]
impl MemorySource {
    pub fn with(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_owned(), text.to_owned());
        self
    }
}

#[cfg(test)]
impl ContentSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.files.get(path).cloned().ok_or_else(|| FetchError::Status {
            path: path.to_owned(),
            status: 404,
        })
    }
}

// ============================================================================
// Load State
// ============================================================================

/// Identifies one requested load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    path: String,
}

impl Ticket {
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The view's document state. Loading, loaded and failed are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested (home/section pages, unknown ids).
    Idle,
    Loading { path: String },
    Loaded { path: String, text: String },
    Failed { path: String, status: u16, message: String },
}

/// Outcome of [`DocumentLoader::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result became the current state.
    Applied,
    /// A newer load was started; the result was discarded.
    Stale,
}

/// Load-state machine with a stale-response guard.
#[derive(Debug)]
pub struct DocumentLoader {
    generation: u64,
    state: LoadState,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            state: LoadState::Idle,
        }
    }

    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Start loading `path`. Any outstanding ticket becomes stale.
    pub fn begin(&mut self, path: &str) -> Ticket {
        self.generation += 1;
        self.state = LoadState::Loading {
            path: path.to_owned(),
        };
        Ticket {
            generation: self.generation,
            path: path.to_owned(),
        }
    }

    /// Forget the current document; any outstanding ticket becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = LoadState::Idle;
    }

    /// Apply the result of a load if `ticket` is still the current one.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<String, FetchError>) -> Completion {
        if ticket.generation != self.generation {
            return Completion::Stale;
        }

        self.state = match result {
            Ok(text) => LoadState::Loaded {
                path: ticket.path.clone(),
                text,
            },
            Err(err) => LoadState::Failed {
                path: ticket.path.clone(),
                status: err.status(),
                message: err.to_string(),
            },
        };
        Completion::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load(loader: &mut DocumentLoader, source: &dyn ContentSource, path: &str) -> Completion {
        let ticket = loader.begin(path);
        loader.complete(&ticket, source.fetch(path))
    }

    fn content_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("creational")).unwrap();
        fs::write(dir.path().join("creational/singleton.md"), "# Singleton\n").unwrap();
        fs::write(dir.path().join("binary.md"), [0xff, 0xfe, 0x00]).unwrap();
        dir
    }

    #[test]
    fn test_fs_source_reads_file() {
        let dir = content_dir();
        let source = FsSource::new(dir.path());
        assert_eq!(source.fetch("creational/singleton.md").unwrap(), "# Singleton\n");
        assert_eq!(source.fetch("/creational/singleton.md").unwrap(), "# Singleton\n");
    }

    #[test]
    fn test_fs_source_missing_is_404() {
        let dir = content_dir();
        let source = FsSource::new(dir.path());

        let err = source.fetch("creational/factory.md").unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.path(), "creational/factory.md");
        let message = err.to_string();
        assert!(message.contains("creational/factory.md"));
        assert!(message.contains("404"));

        assert_eq!(source.fetch("creational").unwrap_err().status(), 404);
    }

    #[test]
    fn test_fs_source_refuses_escape() {
        let dir = content_dir();
        let source = FsSource::new(dir.path().join("creational"));

        assert_eq!(source.fetch("../binary.md").unwrap_err().status(), 403);
        assert_eq!(source.fetch("").unwrap_err().status(), 403);
    }

    #[test]
    fn test_fs_source_read_bytes() {
        let dir = content_dir();
        let source = FsSource::new(dir.path());

        // raw reads accept any bytes; only `fetch` requires text
        assert_eq!(source.read("binary.md").unwrap(), vec![0xff, 0xfe, 0x00]);
        assert_eq!(source.read("creational").unwrap_err().status(), 404);
        assert_eq!(source.read("creational/factory.md").unwrap_err().status(), 404);
        assert_eq!(source.read("../outside.md").unwrap_err().status(), 403);
    }

    #[test]
    fn test_fs_source_rejects_non_utf8() {
        let dir = content_dir();
        let source = FsSource::new(dir.path());
        let err = source.fetch("binary.md").unwrap_err();
        assert!(matches!(err, FetchError::Encoding { .. }));
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn test_loader_success() {
        let source = MemorySource::default().with("a.md", "# A");
        let mut loader = DocumentLoader::new();

        assert_eq!(load(&mut loader, &source, "a.md"), Completion::Applied);
        assert_eq!(
            loader.state(),
            &LoadState::Loaded {
                path: "a.md".into(),
                text: "# A".into()
            }
        );
    }

    #[test]
    fn test_loader_failure_names_path_and_status() {
        let source = MemorySource::default();
        let mut loader = DocumentLoader::new();

        load(&mut loader, &source, "creational/singleton.md");
        match loader.state() {
            LoadState::Failed {
                path,
                status,
                message,
            } => {
                assert_eq!(path, "creational/singleton.md");
                assert_eq!(*status, 404);
                assert!(message.contains("404"));
                assert!(message.contains("creational/singleton.md"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_loader_begin_sets_loading() {
        let mut loader = DocumentLoader::new();
        let ticket = loader.begin("a.md");
        assert_eq!(ticket.path(), "a.md");
        assert_eq!(loader.state(), &LoadState::Loading { path: "a.md".into() });
    }

    #[test]
    fn test_loader_discards_stale_response() {
        let mut loader = DocumentLoader::new();
        let first = loader.begin("a.md");
        let second = loader.begin("b.md");

        // b arrives first, then the late response for a
        assert_eq!(loader.complete(&second, Ok("# B".into())), Completion::Applied);
        assert_eq!(loader.complete(&first, Ok("# A".into())), Completion::Stale);

        assert_eq!(
            loader.state(),
            &LoadState::Loaded {
                path: "b.md".into(),
                text: "# B".into()
            }
        );
    }

    #[test]
    fn test_loader_reset_invalidates_ticket() {
        let mut loader = DocumentLoader::new();
        let ticket = loader.begin("a.md");
        loader.reset();

        assert_eq!(loader.complete(&ticket, Ok("# A".into())), Completion::Stale);
        assert_eq!(loader.state(), &LoadState::Idle);
    }
}
