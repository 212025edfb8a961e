//! The content catalog: every navigable document and the sections grouping them.
//!
//! The built-in catalog is compiled into the binary from `embed/catalog.toml`.
//! `[content].catalog` may name a replacement file, which is read once at
//! startup. Either way the catalog is validated on load and never mutated
//! afterwards, so it is shared by reference between all views and threads.
//!
//! # Invariants
//!
//! - entry ids are unique
//! - section ids are unique
//! - every entry's `section` is declared
//! - the overview entry, when named, exists
//!
//! Whether `file` exists under the content root is not checked here; a
//! dangling path surfaces as a fetch failure (and in `docsite check`).

mod error;

pub use error::CatalogError;

use crate::route::Route;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Built-in catalog source (embedded at compile time)
const BUILTIN_CATALOG: &str = include_str!("../embed/catalog.toml");

/// A fixed top-level grouping of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Style token for the section card background.
    #[serde(default)]
    pub gradient: String,
}

/// One navigable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentEntry {
    /// Stable key used in `/pattern/:id`.
    pub id: String,
    /// Markdown path relative to the content root.
    pub file: String,
    pub title: String,
    pub icon: String,
    /// Id of the owning [`Section`].
    pub section: String,
    /// Subsection label, used for grouping within a section page.
    pub category: String,
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default)]
    entries: Vec<ContentEntry>,
}

/// Validated, indexed catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    overview: Option<String>,
    sections: Vec<Section>,
    entries: Vec<ContentEntry>,
    by_id: FxHashMap<String, usize>,
    by_file: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build and validate a catalog. Display order is the given order.
    pub fn new(
        overview: Option<String>,
        sections: Vec<Section>,
        entries: Vec<ContentEntry>,
    ) -> Result<Self, CatalogError> {
        let mut section_ids = FxHashMap::default();
        for section in &sections {
            if section_ids.insert(section.id.as_str(), ()).is_some() {
                return Err(CatalogError::DuplicateSection(section.id.clone()));
            }
        }

        let mut by_id = FxHashMap::default();
        let mut by_file = FxHashMap::default();
        for (index, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            if !section_ids.contains_key(entry.section.as_str()) {
                return Err(CatalogError::UnknownSection {
                    entry: entry.id.clone(),
                    section: entry.section.clone(),
                });
            }
            // first entry wins when two entries share a file
            by_file.entry(entry.file.clone()).or_insert(index);
        }

        if let Some(id) = &overview
            && !by_id.contains_key(id)
        {
            return Err(CatalogError::UnknownOverview(id.clone()));
        }

        Ok(Self {
            overview,
            sections,
            entries,
            by_id,
            by_file,
        })
    }

    /// Parse a catalog from TOML.
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.overview, file.sections, file.entries)
    }

    /// Load a catalog TOML file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content =
            fs::read_to_string(path).map_err(|err| CatalogError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_str(BUILTIN_CATALOG)
    }

    /// Load `path` if given, the built-in catalog otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&ContentEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Look up an entry by its exact `file` value.
    pub fn entry_by_file(&self, file: &str) -> Option<&ContentEntry> {
        self.by_file.get(file).map(|&i| &self.entries[i])
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// The entry displayed on the home route, if any.
    pub fn overview(&self) -> Option<&ContentEntry> {
        self.overview.as_deref().and_then(|id| self.entry(id))
    }

    pub fn is_overview(&self, entry: &ContentEntry) -> bool {
        self.overview.as_deref() == Some(entry.id.as_str())
    }

    /// Page route of an entry: home for the overview, `/pattern/:id` otherwise.
    pub fn route_for(&self, entry: &ContentEntry) -> Route {
        if self.is_overview(entry) {
            Route::Home
        } else {
            Route::pattern(&entry.id)
        }
    }

    /// Entries of one section, in catalog order.
    pub fn entries_in<'a, 's>(&'a self, section: &'s str) -> impl Iterator<Item = &'a ContentEntry> + use<'a, 's> {
        self.entries.iter().filter(move |e| e.section == section)
    }

    /// Number of entries in one section.
    pub fn count_in(&self, section: &str) -> usize {
        self.entries.iter().filter(|e| e.section == section).count()
    }

    /// Entries of one section grouped by category.
    ///
    /// Categories appear in order of first occurrence; entries keep catalog order.
    pub fn categories_in<'a>(&'a self, section: &str) -> Vec<(&'a str, Vec<&'a ContentEntry>)> {
        let mut groups: Vec<(&str, Vec<&ContentEntry>)> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.section == section) {
            match groups.iter_mut().find(|(name, _)| *name == entry.category) {
                Some((_, group)) => group.push(entry),
                None => groups.push((entry.category.as_str(), vec![entry])),
            }
        }
        groups
    }
}

// ============================================================================
// Tests
// ============================================================================
