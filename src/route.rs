//! Page routes and locations.
//!
//! | Path                  | Route                 |
//! |-----------------------|-----------------------|
//! | `/`                   | [`Route::Home`]       |
//! | `/section/:sectionId` | [`Route::Section`]    |
//! | `/pattern/:id`        | [`Route::Pattern`]    |
//!
//! A [`Location`] is a route plus the optional `#fragment` used as an
//! in-page scroll target.

use std::fmt;

/// A page route handled without a full document reload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Home page (overview document and section cards).
    Home,
    /// Listing page of one top-level section.
    Section(String),
    /// Detail page of one catalog entry.
    Pattern(String),
}

impl Route {
    /// Parse a URL path (no query, no fragment) into a route.
    ///
    /// Trailing slashes are ignored; ids must be a single non-empty segment.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Some(Self::Home);
        }

        let (kind, id) = path.split_once('/')?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        match kind {
            "section" => Some(Self::Section(id.to_owned())),
            "pattern" => Some(Self::Pattern(id.to_owned())),
            _ => None,
        }
    }

    pub fn pattern(id: impl Into<String>) -> Self {
        Self::Pattern(id.into())
    }

    pub fn section(id: impl Into<String>) -> Self {
        Self::Section(id.into())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Section(id) => write!(f, "/section/{id}"),
            Self::Pattern(id) => write!(f, "/pattern/{id}"),
        }
    }
}

/// A route plus an optional fragment (`/pattern/singleton#lazy-init`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub fragment: Option<String>,
}

impl Location {
    pub const fn new(route: Route) -> Self {
        Self {
            route,
            fragment: None,
        }
    }

    /// Attach a fragment; an empty fragment is treated as none.
    pub fn with_fragment(mut self, fragment: Option<&str>) -> Self {
        self.fragment = fragment.filter(|f| !f.is_empty()).map(str::to_owned);
        self
    }

    /// Parse `path[?query][#fragment]`. The query string is ignored.
    pub fn parse(url: &str) -> Option<Self> {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let path = rest.split('?').next().unwrap_or(rest);
        Route::parse(path).map(|route| Self::new(route).with_fragment(fragment))
    }

    /// The same location without its fragment.
    pub fn bare(&self) -> Self {
        Self::new(self.route.clone())
    }
}

impl From<Route> for Location {
    fn from(route: Route) -> Self {
        Self::new(route)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route)?;
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_home() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse(""), Some(Route::Home));
    }

    #[test]
    fn test_parse_pattern_and_section() {
        assert_eq!(Route::parse("/pattern/singleton"), Some(Route::pattern("singleton")));
        assert_eq!(Route::parse("/pattern/singleton/"), Some(Route::pattern("singleton")));
        assert_eq!(
            Route::parse("/section/design-patterns"),
            Some(Route::section("design-patterns"))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_shapes() {
        assert_eq!(Route::parse("/pattern"), None);
        assert_eq!(Route::parse("/pattern/"), None);
        assert_eq!(Route::parse("/pattern/a/b"), None);
        assert_eq!(Route::parse("/content/README.md"), None);
    }

    #[test]
    fn test_route_display() {
        assert_eq!(Route::Home.to_string(), "/");
        assert_eq!(Route::section("interview").to_string(), "/section/interview");
        assert_eq!(Route::pattern("factory").to_string(), "/pattern/factory");
    }

    #[test]
    fn test_location_parse_with_fragment_and_query() {
        let location = Location::parse("/pattern/singleton?q=sing#lazy-init").unwrap();
        assert_eq!(location.route, Route::pattern("singleton"));
        assert_eq!(location.fragment.as_deref(), Some("lazy-init"));
        assert_eq!(location.to_string(), "/pattern/singleton#lazy-init");
    }

    #[test]
    fn test_location_empty_fragment_is_none() {
        let location = Location::parse("/pattern/singleton#").unwrap();
        assert_eq!(location.fragment, None);
        assert_eq!(location.to_string(), "/pattern/singleton");
    }

    #[test]
    fn test_location_bare_drops_fragment() {
        let location = Location::parse("/#intro").unwrap();
        assert_eq!(location.bare(), Location::new(Route::Home));
    }
}
