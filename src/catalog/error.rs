//! Catalog error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error when reading catalog `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Catalog parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("duplicate entry id `{0}`")]
    DuplicateId(String),

    #[error("duplicate section id `{0}`")]
    DuplicateSection(String),

    #[error("entry `{entry}` refers to undeclared section `{section}`")]
    UnknownSection { entry: String, section: String },

    #[error("overview entry `{0}` is not in the catalog")]
    UnknownOverview(String),
}
