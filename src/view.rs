//! Centralized view state.
//!
//! All navigation goes through [`ViewState`]. Transitions are pure: they
//! update the state and return the [`Effect`]s the host must carry out
//! (fetch a document, scroll, rewrite the address bar). The server drives a
//! fresh `ViewState` per request through [`ViewState::open`]; tests drive
//! transitions one at a time to exercise orderings a single request cannot
//! produce, such as a late response for an abandoned navigation.

use crate::catalog::{Catalog, ContentEntry, Section};
use crate::chrome::{self, SidebarState};
use crate::config::ViewConfig;
use crate::fetch::{Completion, ContentSource, DocumentLoader, FetchError, LoadState, Ticket};
use crate::log;
use crate::nav::{LinkKind, ScrollTarget, classify};
use crate::render::{RenderedDocument, Renderer};
use crate::route::{Location, Route};

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Retrieve the ticket's path and hand the result to [`ViewState::complete_fetch`].
    Fetch(Ticket),
    /// Scroll the window to the top.
    ScrollToTop,
    /// Smooth-scroll an element into view below the fixed header.
    ScrollTo(ScrollTarget),
    /// Replace the URL fragment without adding a history entry.
    ReplaceFragment(String),
    /// Push a new history entry for a route change.
    Navigate(Location),
}

/// What the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page<'a> {
    Home,
    Section(&'a Section),
    Pattern(&'a ContentEntry),
    /// `/section/:id` with an id missing from the catalog.
    SectionNotFound,
    /// `/pattern/:id` with an id missing from the catalog.
    PatternNotFound,
}

pub struct ViewState<'a> {
    catalog: &'a Catalog,
    renderer: Renderer<'a>,
    header_offset: u32,
    location: Location,
    page: Page<'a>,
    sidebar: SidebarState,
    filter: String,
    loader: DocumentLoader,
    document: Option<RenderedDocument>,
    breadcrumb: Vec<String>,
    /// Fragment to scroll to once the pending document has loaded.
    pending_scroll: Option<String>,
}

impl<'a> ViewState<'a> {
    /// A view positioned at `/` with nothing loaded yet.
    pub fn new(catalog: &'a Catalog, config: &ViewConfig) -> Self {
        Self {
            catalog,
            renderer: Renderer::new(catalog),
            header_offset: config.header_offset,
            location: Route::Home.into(),
            page: Page::Home,
            sidebar: SidebarState::new(catalog, &config.expanded),
            filter: String::new(),
            loader: DocumentLoader::new(),
            document: None,
            breadcrumb: Vec::new(),
            pending_scroll: None,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Switch to `location`.
    ///
    /// Known patterns (and the home overview) start a fetch; the location's
    /// fragment is remembered and scrolled to only after the load completes.
    /// Unknown ids render a not-found page without any fetch.
    pub fn navigate(&mut self, location: Location) -> Vec<Effect> {
        self.document = None;
        self.breadcrumb.clear();
        self.pending_scroll = location.fragment.clone();

        let mut effects = Vec::new();
        let fetch_file = match &location.route {
            Route::Home => {
                self.page = Page::Home;
                self.catalog.overview().map(|entry| entry.file.as_str())
            }
            Route::Section(id) => {
                self.page = self
                    .catalog
                    .section(id)
                    .map_or(Page::SectionNotFound, Page::Section);
                None
            }
            Route::Pattern(id) => match self.catalog.entry(id) {
                Some(entry) => {
                    self.page = Page::Pattern(entry);
                    Some(entry.file.as_str())
                }
                None => {
                    self.page = Page::PatternNotFound;
                    None
                }
            },
        };

        match fetch_file {
            Some(file) => effects.push(Effect::Fetch(self.loader.begin(file))),
            None => {
                self.loader.reset();
                self.pending_scroll = None;
                effects.push(Effect::ScrollToTop);
            }
        }

        self.location = location;
        effects
    }

    /// Apply the result of an [`Effect::Fetch`].
    ///
    /// Results for a ticket that is no longer current are dropped and
    /// produce no effects.
    pub fn complete_fetch(&mut self, ticket: &Ticket, result: Result<String, FetchError>) -> Vec<Effect> {
        if self.loader.complete(ticket, result) == Completion::Stale {
            log!("fetch"; "discarding stale response for {}", ticket.path());
            return Vec::new();
        }

        let mut effects = Vec::new();
        match self.loader.state() {
            LoadState::Loaded { path, text } => {
                let document = self.renderer.render(text, Some(path));
                self.breadcrumb = chrome::breadcrumb(path);
                effects.push(Effect::ScrollToTop);

                if let Some(fragment) = self.pending_scroll.take() {
                    if document.has_id(&fragment) {
                        effects.push(Effect::ScrollTo(ScrollTarget::new(fragment, self.header_offset)));
                    } else {
                        log!("render"; "no heading `{}` in {}", fragment, path);
                    }
                }
                self.document = Some(document);
            }
            LoadState::Failed { message, .. } => {
                log!("fetch"; "{}", message);
                self.pending_scroll = None;
            }
            LoadState::Idle | LoadState::Loading { .. } => {}
        }
        effects
    }

    /// Handle a click on `href` inside the current document.
    pub fn click(&mut self, href: &str) -> Vec<Effect> {
        match classify(href, self.catalog) {
            LinkKind::InternalContent { location } => {
                let mut effects = vec![Effect::Navigate(location.clone())];
                effects.extend(self.navigate(location));
                effects
            }
            LinkKind::InPageAnchor { id } => {
                let exists = self.document.as_ref().is_some_and(|doc| doc.has_id(&id));
                if !exists {
                    return Vec::new();
                }
                self.location = self.location.bare().with_fragment(Some(id.as_str()));
                vec![
                    Effect::ScrollTo(ScrollTarget::new(id.clone(), self.header_offset)),
                    Effect::ReplaceFragment(id),
                ]
            }
            LinkKind::External => Vec::new(),
        }
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_owned();
    }

    pub fn toggle_section(&mut self, section: &str) {
        self.sidebar.toggle(section);
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// Carry out fetch effects against `source` until none remain.
    ///
    /// Returns the remaining (client-side) effects in order.
    pub fn run(&mut self, source: &dyn ContentSource, effects: Vec<Effect>) -> Vec<Effect> {
        let mut done = Vec::new();
        for effect in effects {
            match effect {
                Effect::Fetch(ticket) => {
                    let result = source.fetch(ticket.path());
                    let follow = self.complete_fetch(&ticket, result);
                    done.extend(self.run(source, follow));
                }
                other => done.push(other),
            }
        }
        done
    }

    /// Navigate to `location` and load its document synchronously.
    pub fn open(&mut self, location: Location, source: &dyn ContentSource) -> Vec<Effect> {
        let effects = self.navigate(location);
        self.run(source, effects)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub const fn location(&self) -> &Location {
        &self.location
    }

    pub const fn page(&self) -> Page<'a> {
        self.page
    }

    pub const fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    pub const fn document(&self) -> Option<&RenderedDocument> {
        self.document.as_ref()
    }

    pub fn breadcrumb(&self) -> &[String] {
        &self.breadcrumb
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub const fn header_offset(&self) -> u32 {
        self.header_offset
    }

    pub fn active_section(&self) -> Option<&'a str> {
        chrome::active_section(&self.location.route, self.catalog)
    }

    /// Whether a sidebar section renders open.
    pub fn is_section_open(&self, section: &str) -> bool {
        self.sidebar.is_open(section, self.active_section())
    }

    /// The section's own expand flag, regardless of the active route.
    pub fn is_section_expanded(&self, section: &str) -> bool {
        self.sidebar.is_expanded(section)
    }

    /// Sidebar entries of `section` passing the current filter.
    pub fn visible_entries(&self, section: &str) -> Vec<&'a ContentEntry> {
        self.catalog
            .entries_in(section)
            .filter(|entry| chrome::matches_filter(entry, &self.filter))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample;
    use crate::fetch::MemorySource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SINGLETON: &str = "# Singleton\n\n## Lazy Init\n\nSee [factory](../creational/factory.md#usage) and [below](#lazy-init).\n";
    const FACTORY: &str = "# Factory Method\n\n## Usage\n\ntext\n";

    /// Counts fetches so tests can assert none happened.
    struct CountingSource {
        inner: MemorySource,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                inner: MemorySource::default()
                    .with("README.md", "# Overview\n")
                    .with("creational/singleton.md", SINGLETON)
                    .with("creational/factory.md", FACTORY),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ContentSource for CountingSource {
        fn fetch(&self, path: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(path)
        }
    }

    fn view(catalog: &Catalog) -> ViewState<'_> {
        ViewState::new(catalog, &ViewConfig::default())
    }

    fn location(url: &str) -> Location {
        Location::parse(url).unwrap()
    }

    fn loaded_path<'v>(view: &'v ViewState<'_>) -> Option<&'v str> {
        match view.load_state() {
            LoadState::Loaded { path, .. } => Some(path),
            _ => None,
        }
    }

    #[test]
    fn test_pattern_route_loads_entry() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);

        let effects = view.navigate(location("/pattern/singleton"));
        let [Effect::Fetch(ticket)] = effects.as_slice() else {
            panic!("expected a single fetch, got {effects:?}");
        };
        assert_eq!(ticket.path(), "creational/singleton.md");
        assert_eq!(view.active_section(), Some("design-patterns"));
        assert!(view.is_section_open("design-patterns"));

        let rest = view.run(&source, effects);
        assert_eq!(rest, vec![Effect::ScrollToTop]);
        assert_eq!(source.calls(), 1);
        assert_eq!(view.breadcrumb(), ["Creational", "Singleton"]);
        assert!(view.document().unwrap().html.contains(r#"id="lazy-init""#));
    }

    #[test]
    fn test_unknown_pattern_never_fetches() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);

        view.open(location("/pattern/does-not-exist"), &source);
        assert_eq!(view.page(), Page::PatternNotFound);
        assert_eq!(view.load_state(), &LoadState::Idle);
        assert_eq!(source.calls(), 0);
        assert!(view.document().is_none());
    }

    #[test]
    fn test_unknown_section() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);

        view.open(location("/section/nope"), &source);
        assert_eq!(view.page(), Page::SectionNotFound);
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_home_loads_overview() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);

        view.open(location("/"), &source);
        assert_eq!(view.page(), Page::Home);
        assert_eq!(loaded_path(&view), Some("README.md"));
        assert_eq!(view.active_section(), None);
    }

    #[test]
    fn test_fetch_failure_reports_status() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);

        // adapter's file is absent from the source
        view.open(location("/pattern/adapter"), &source);
        let LoadState::Failed { path, status, message } = view.load_state() else {
            panic!("expected failure, got {:?}", view.load_state());
        };
        assert_eq!(path, "structural/adapter.md");
        assert_eq!(*status, 404);
        assert!(message.contains("404"));
        assert!(view.document().is_none());
    }

    #[test]
    fn test_stale_response_ignored() {
        let catalog = sample();
        let mut view = view(&catalog);

        let first = view.navigate(location("/pattern/singleton"));
        let second = view.navigate(location("/pattern/factory"));
        let (Effect::Fetch(first), Effect::Fetch(second)) = (&first[0], &second[0]) else {
            panic!("expected fetches");
        };

        // the older request resolves last
        assert!(!view.complete_fetch(second, Ok(FACTORY.into())).is_empty());
        assert!(view.complete_fetch(first, Ok(SINGLETON.into())).is_empty());

        assert_eq!(loaded_path(&view), Some("creational/factory.md"));
        assert!(view.document().unwrap().has_id("usage"));
        assert!(!view.document().unwrap().has_id("lazy-init"));
    }

    #[test]
    fn test_stale_response_while_loading() {
        let catalog = sample();
        let mut view = view(&catalog);

        let first = view.navigate(location("/pattern/singleton"));
        view.navigate(location("/pattern/factory"));
        let Effect::Fetch(first) = &first[0] else {
            panic!("expected fetch");
        };

        assert!(view.complete_fetch(first, Ok(SINGLETON.into())).is_empty());
        assert_eq!(
            view.load_state(),
            &LoadState::Loading {
                path: "creational/factory.md".into()
            }
        );
        assert!(view.document().is_none());
    }

    #[test]
    fn test_fragment_scroll_waits_for_load() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);

        let effects = view.navigate(location("/pattern/singleton#lazy-init"));
        assert!(!effects.iter().any(|e| matches!(e, Effect::ScrollTo(_))));

        let rest = view.run(&source, effects);
        assert_eq!(
            rest,
            vec![
                Effect::ScrollToTop,
                Effect::ScrollTo(ScrollTarget::new("lazy-init", 80)),
            ]
        );
    }

    #[test]
    fn test_missing_fragment_does_not_scroll() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);

        let rest = view.open(location("/pattern/singleton#nowhere"), &source);
        assert_eq!(rest, vec![Effect::ScrollToTop]);
    }

    #[test]
    fn test_click_internal_link_navigates_then_scrolls() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);
        view.open(location("/pattern/singleton"), &source);

        let effects = view.click("../creational/factory.md#usage");
        assert_eq!(effects[0], Effect::Navigate(location("/pattern/factory#usage")));
        assert!(matches!(&effects[1], Effect::Fetch(t) if t.path() == "creational/factory.md"));

        let rest = view.run(&source, effects);
        assert_eq!(view.location().route, Route::pattern("factory"));
        assert!(rest.contains(&Effect::ScrollTo(ScrollTarget::new("usage", 80))));
    }

    #[test]
    fn test_click_in_page_anchor() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);
        view.open(location("/pattern/singleton"), &source);
        let calls = source.calls();

        let effects = view.click("#lazy-init");
        assert_eq!(
            effects,
            vec![
                Effect::ScrollTo(ScrollTarget::new("lazy-init", 80)),
                Effect::ReplaceFragment("lazy-init".into()),
            ]
        );
        assert_eq!(view.location().route, Route::pattern("singleton"));
        assert_eq!(view.location().fragment.as_deref(), Some("lazy-init"));
        assert_eq!(source.calls(), calls);

        // anchors without a target do nothing
        assert!(view.click("#missing").is_empty());
    }

    #[test]
    fn test_click_external_and_unresolved() {
        let catalog = sample();
        let source = CountingSource::new();
        let mut view = view(&catalog);
        view.open(location("/pattern/singleton"), &source);

        assert!(view.click("https://developer.mozilla.org").is_empty());
        assert!(view.click("./missing.md").is_empty());
        assert_eq!(view.location().route, Route::pattern("singleton"));
    }

    #[test]
    fn test_filter_and_toggle() {
        let catalog = sample();
        let mut view = view(&catalog);

        view.set_filter("FACT");
        let visible: Vec<_> = view
            .visible_entries("design-patterns")
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(visible, vec!["factory"]);
        assert_eq!(catalog.count_in("design-patterns"), 4);

        assert!(!view.is_section_open("design-patterns"));
        view.toggle_section("design-patterns");
        assert!(view.is_section_open("design-patterns"));
        assert!(view.is_section_expanded("design-patterns"));

        // the active section renders open without touching its flag
        view.toggle_section("design-patterns");
        view.navigate(location("/pattern/singleton"));
        assert!(view.is_section_open("design-patterns"));
        assert!(!view.is_section_expanded("design-patterns"));
    }
}
