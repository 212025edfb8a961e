//! Relative Markdown link resolution.
//!
//! Documents link to each other the way they would on disk
//! (`./factory.md`, `../structural/adapter.md#intent`). Under page routes
//! those links must become `/pattern/:id` locations instead of requests for
//! raw `.md` files.
//!
//! # Resolution
//!
//! | Step | Example (`from = creational/singleton.md`) |
//! |------|---------------------------------------------|
//! | split fragment | `../structural/adapter.md#intent` → `../structural/adapter.md`, `intent` |
//! | strip `./` | `./factory.md` → `factory.md` |
//! | strip one `../` | `../structural/adapter.md` → `structural/adapter.md` |
//! | exact catalog match | `structural/adapter.md` → `adapter` |
//!
//! A link resolves if and only if its cleaned path is some entry's `file`.
//! The cleaned path is not joined onto the linking document's directory, so
//! `./factory.md` written in `creational/singleton.md` stays unresolved.
//! Only one leading `../` is stripped; `../../x.md` keeps a `../` after
//! cleaning and therefore only resolves if the catalog literally contains it.

use crate::catalog::Catalog;
use crate::route::Location;

/// True if the link targets a Markdown document (`*.md` or `*.md#frag`).
#[inline]
pub fn is_content_link(href: &str) -> bool {
    href.ends_with(".md") || href.contains(".md#")
}

/// Check if a link is external (has a scheme like http:, mailto:, etc.)
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Split `path#fragment` into its parts. An empty fragment is `None`.
pub fn split_fragment(href: &str) -> (&str, Option<&str>) {
    match href.split_once('#') {
        Some((path, fragment)) if !fragment.is_empty() => (path, Some(fragment)),
        Some((path, _)) => (path, None),
        None => (href, None),
    }
}

/// Strip a leading `./`, then at most one leading `../`.
pub fn clean_target(path: &str) -> &str {
    let path = path.strip_prefix("./").unwrap_or(path);
    path.strip_prefix("../").unwrap_or(path)
}

/// Resolve a Markdown link to a page location.
///
/// Returns `None` when the link is not an internal content link: no `.md`
/// target, an absolute URL, or no catalog entry for the cleaned path.
pub fn resolve_link(href: &str, catalog: &Catalog) -> Option<Location> {
    if !is_content_link(href) || is_external_link(href) {
        return None;
    }

    let (path, fragment) = split_fragment(href);
    let cleaned = clean_target(path.trim_start_matches('/'));
    let entry = catalog.entry_by_file(cleaned)?;

    Some(Location::new(catalog.route_for(entry)).with_fragment(fragment))
}
