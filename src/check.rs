//! Catalog and content validation (`docsite check`).
//!
//! Every catalog entry is fetched and rendered in parallel. Missing files,
//! documents without any heading anchor and `.md` links that resolve to no
//! entry are reported, as are Markdown files under the content root that no
//! entry points at.

use crate::catalog::{Catalog, ContentEntry};
use crate::config::SiteConfig;
use crate::fetch::{ContentSource, FsSource};
use crate::log;
use crate::render::Renderer;
use anyhow::{Result, bail};
use rayon::prelude::*;
use std::{fmt, path::Path};
use walkdir::WalkDir;

/// Directories skipped when looking for orphaned documents
const IGNORED_DIRS: &[&str] = &[".git", "node_modules"];

/// One finding of a check run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The entry's file could not be fetched.
    Unreadable { id: String, message: String },
    /// The document renders without any heading to link to.
    NoHeadings { id: String, file: String },
    /// A `.md` link inside the document matches no catalog entry.
    UnresolvedLink { id: String, href: String },
    /// A Markdown file no catalog entry refers to.
    Orphan { file: String },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { id, message } => write!(f, "{id}: {message}"),
            Self::NoHeadings { id, file } => write!(f, "{id}: {file} has no headings"),
            Self::UnresolvedLink { id, href } => write!(f, "{id}: unresolved link `{href}`"),
            Self::Orphan { file } => write!(f, "{file} is not in the catalog"),
        }
    }
}

/// Result of checking a content root against a catalog.
#[derive(Debug, Default)]
pub struct Report {
    pub checked: usize,
    pub problems: Vec<Problem>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }

    /// Problems other than orphans.
    pub fn errors(&self) -> impl Iterator<Item = &Problem> {
        self.problems
            .iter()
            .filter(|p| !matches!(p, Problem::Orphan { .. }))
    }
}

/// Check every catalog entry and look for orphaned files below `root`.
pub fn check_content(root: &Path, catalog: &Catalog) -> Report {
    let source = FsSource::new(root);
    let renderer = Renderer::new(catalog);

    let mut problems: Vec<Problem> = catalog
        .entries()
        .par_iter()
        .flat_map_iter(|entry| check_entry(entry, &source, renderer))
        .collect();

    problems.extend(
        collect_markdown_files(root)
            .into_iter()
            .filter(|file| catalog.entry_by_file(file).is_none())
            .map(|file| Problem::Orphan { file }),
    );

    Report {
        checked: catalog.entries().len(),
        problems,
    }
}

/// Run `docsite check`: log every problem and fail if any entry is broken.
///
/// Orphaned files are reported but do not fail the check.
pub fn check_site(config: &SiteConfig, catalog: &Catalog) -> Result<()> {
    let report = check_content(&config.content.root, catalog);

    for problem in &report.problems {
        log!("check"; "{problem}");
    }

    let errors = report.errors().count();
    if errors > 0 {
        bail!("found {} problems in {} checked entries", errors, report.checked);
    }

    log!("check"; "{} entries ok", report.checked);
    Ok(())
}

fn check_entry(entry: &ContentEntry, source: &dyn ContentSource, renderer: Renderer<'_>) -> Vec<Problem> {
    let text = match source.fetch(&entry.file) {
        Ok(text) => text,
        Err(err) => {
            return vec![Problem::Unreadable {
                id: entry.id.clone(),
                message: err.to_string(),
            }];
        }
    };

    let document = renderer.render(&text, Some(&entry.file));
    let mut problems = Vec::new();
    if document.headings.is_empty() {
        problems.push(Problem::NoHeadings {
            id: entry.id.clone(),
            file: entry.file.clone(),
        });
    }
    problems.extend(document.unresolved_links.into_iter().map(|href| Problem::UnresolvedLink {
        id: entry.id.clone(),
        href,
    }));
    problems
}

/// Markdown files below `root`, as `/`-separated paths relative to it, sorted.
pub fn collect_markdown_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_DIRS.contains(&name)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).ok()?;
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            Some(parts.join("/"))
        })
        .collect();
    files.sort();
    files
}
