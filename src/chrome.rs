//! Navigation chrome: sidebar filter, section expansion, breadcrumb.
//!
//! Everything here is a pure function of the catalog, the current route and
//! per-view flags. The catalog itself is never modified by filtering.

use crate::catalog::{Catalog, ContentEntry};
use crate::route::Route;
use rustc_hash::FxHashMap;

// ============================================================================
// Filter
// ============================================================================

/// Case-insensitive substring match on an entry's title or file path.
///
/// An empty (or all-whitespace) query matches everything.
pub fn matches_filter(entry: &ContentEntry, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty()
        || entry.title.to_lowercase().contains(&needle)
        || entry.file.to_lowercase().contains(&needle)
}

/// Entries matching `query`, in catalog order.
pub fn filter_entries<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a ContentEntry> {
    catalog
        .entries()
        .iter()
        .filter(|entry| matches_filter(entry, query))
        .collect()
}

// ============================================================================
// Active Section
// ============================================================================

/// Section highlighted in the sidebar for `route`.
///
/// Derived from the route alone: a pattern page activates its entry's
/// section, a section page activates itself, home activates nothing.
pub fn active_section<'a>(route: &Route, catalog: &'a Catalog) -> Option<&'a str> {
    match route {
        Route::Home => None,
        Route::Section(id) => catalog.section(id).map(|s| s.id.as_str()),
        Route::Pattern(id) => catalog.entry(id).map(|e| e.section.as_str()),
    }
}

// ============================================================================
// Sidebar
// ============================================================================

/// Expand/collapse flags of the sidebar sections.
#[derive(Debug, Clone)]
pub struct SidebarState {
    open: FxHashMap<String, bool>,
}

impl SidebarState {
    /// Flags for every catalog section; sections listed in `expanded` start open.
    pub fn new(catalog: &Catalog, expanded: &[String]) -> Self {
        let open = catalog
            .sections()
            .iter()
            .map(|s| (s.id.clone(), expanded.contains(&s.id)))
            .collect();
        Self { open }
    }

    /// Flip one section. Unknown ids are ignored.
    pub fn toggle(&mut self, section: &str) {
        if let Some(flag) = self.open.get_mut(section) {
            *flag = !*flag;
        }
    }

    /// The stored flag, ignoring the active section.
    pub fn is_expanded(&self, section: &str) -> bool {
        self.open.get(section).copied().unwrap_or(false)
    }

    /// Whether the section renders open: expanded, or containing the active route.
    pub fn is_open(&self, section: &str, active: Option<&str>) -> bool {
        active == Some(section) || self.is_expanded(section)
    }
}

// ============================================================================
// Breadcrumb
// ============================================================================

/// Breadcrumb segments of a content path.
///
/// `creational/abstract-factory.md` → `["Creational", "Abstract Factory"]`
pub fn breadcrumb(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(|segment| title_case(segment.strip_suffix(".md").unwrap_or(segment)))
        .collect()
}

/// `abstract-factory` → `Abstract Factory`
pub fn title_case(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample;

    fn ids(entries: &[&ContentEntry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_filter_case_insensitive() {
        let catalog = sample();
        let upper = filter_entries(&catalog, "SINGLETON");
        let lower = filter_entries(&catalog, "singleton");
        assert_eq!(ids(&upper), vec!["singleton"]);
        assert_eq!(ids(&upper), ids(&lower));
    }

    #[test]
    fn test_filter_matches_file_path() {
        let catalog = sample();
        let hits = filter_entries(&catalog, "creational/");
        assert_eq!(ids(&hits), vec!["singleton", "factory", "builder"]);
    }

    #[test]
    fn test_empty_filter_keeps_catalog() {
        let catalog = sample();
        assert_eq!(filter_entries(&catalog, "").len(), catalog.entries().len());
        assert_eq!(filter_entries(&catalog, "   ").len(), catalog.entries().len());
        assert!(filter_entries(&catalog, "zzz-nothing").is_empty());
        // filtering leaves the catalog intact
        assert_eq!(catalog.entries().len(), 6);
    }

    #[test]
    fn test_active_section_from_route() {
        let catalog = sample();
        assert_eq!(
            active_section(&Route::pattern("singleton"), &catalog),
            Some("design-patterns")
        );
        assert_eq!(
            active_section(&Route::section("js-fundamentals"), &catalog),
            Some("js-fundamentals")
        );
        assert_eq!(active_section(&Route::Home, &catalog), None);
        assert_eq!(active_section(&Route::pattern("nope"), &catalog), None);
        assert_eq!(active_section(&Route::section("nope"), &catalog), None);
    }

    #[test]
    fn test_sidebar_defaults_and_toggle() {
        let catalog = sample();
        let mut sidebar = SidebarState::new(&catalog, &["js-fundamentals".to_string()]);

        assert!(sidebar.is_expanded("js-fundamentals"));
        assert!(!sidebar.is_expanded("design-patterns"));

        sidebar.toggle("design-patterns");
        sidebar.toggle("js-fundamentals");
        assert!(sidebar.is_expanded("design-patterns"));
        assert!(!sidebar.is_expanded("js-fundamentals"));

        sidebar.toggle("unknown");
        assert!(!sidebar.is_expanded("unknown"));
    }

    #[test]
    fn test_active_section_forced_open() {
        let catalog = sample();
        let sidebar = SidebarState::new(&catalog, &[]);
        assert!(!sidebar.is_open("design-patterns", None));
        assert!(sidebar.is_open("design-patterns", Some("design-patterns")));
        assert!(!sidebar.is_open("js-fundamentals", Some("design-patterns")));
    }

    #[test]
    fn test_breadcrumb() {
        assert_eq!(
            breadcrumb("creational/abstract-factory.md"),
            vec!["Creational", "Abstract Factory"]
        );
        assert_eq!(breadcrumb("README.md"), vec!["README"]);
        assert_eq!(breadcrumb("./interview/event_loop.md"), vec!["Interview", "Event Loop"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("chain-of-responsibility"), "Chain Of Responsibility");
        assert_eq!(title_case("singleton"), "Singleton");
        assert_eq!(title_case("--"), "");
    }
}
