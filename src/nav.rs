//! Link classification for rendered documents.
//!
//! Every anchor in a rendered document falls in exactly one [`LinkKind`]:
//!
//! | `href` shape            | Kind                | Behavior |
//! |-------------------------|---------------------|----------|
//! | `*.md`, `*.md#frag`     | `InternalContent`   | navigate to the route, then scroll to `frag` |
//! | `#frag`                 | `InPageAnchor`      | offset scroll, replace URL fragment |
//! | anything else           | `External`          | default browser navigation |
//!
//! A `.md` link with no catalog match is `External`: the click falls through
//! to the browser. The renderer logs such links so authors can fix them.

use crate::catalog::Catalog;
use crate::resolve::resolve_link;
use crate::route::Location;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Link to another catalog document.
    InternalContent { location: Location },
    /// Link to an element of the current document.
    InPageAnchor { id: String },
    /// Anything the navigator does not intercept.
    External,
}

/// Classify `href` as found in a rendered document.
pub fn classify(href: &str, catalog: &Catalog) -> LinkKind {
    if let Some(fragment) = href.strip_prefix('#') {
        if fragment.is_empty() {
            return LinkKind::External;
        }
        return LinkKind::InPageAnchor {
            id: decode_fragment(fragment).into_owned(),
        };
    }

    match resolve_link(href, catalog) {
        Some(location) => LinkKind::InternalContent { location },
        None => LinkKind::External,
    }
}

/// Percent-decode a fragment (`#gr%C3%B6%C3%9Fe` → `größe`).
pub fn decode_fragment(fragment: &str) -> Cow<'_, str> {
    urlencoding::decode(fragment).unwrap_or(Cow::Borrowed(fragment))
}

/// A request to bring an element into view below the fixed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTarget {
    /// Element id to scroll to.
    pub id: String,
    /// Pixels left above the element for the header.
    pub offset: u32,
}

impl ScrollTarget {
    pub fn new(id: impl Into<String>, offset: u32) -> Self {
        Self {
            id: id.into(),
            offset,
        }
    }
}
