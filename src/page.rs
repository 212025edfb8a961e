//! HTML page assembly for the server.
//!
//! A page is the embedded layout with its placeholders filled from a
//! [`ViewState`]: the sidebar, the breadcrumb and the main area for the
//! current [`Page`] and load state.

use crate::catalog::Section;
use crate::chrome::filter_entries;
use crate::config::SiteConfig;
use crate::fetch::LoadState;
use crate::render::escape_html;
use crate::route::Route;
use crate::view::{Page, ViewState};
use std::fmt::Write;

/// Page layout (embedded at compile time)
const LAYOUT_TEMPLATE: &str = include_str!("embed/serve/layout.html");

/// An assembled page and its HTTP status.
#[derive(Debug)]
pub struct HtmlPage {
    pub status: u16,
    pub html: String,
}

/// Assemble the page for the current view.
pub fn render_page(view: &ViewState<'_>, config: &SiteConfig) -> HtmlPage {
    let (status, title, main) = main_area(view, config);
    let title = match title {
        Some(title) => format!("{title} | {}", config.base.title),
        None => config.base.title.clone(),
    };

    let header_offset = view.header_offset().to_string();
    let copy_reset_ms = config.view.copy_reset_ms.to_string();
    let html = fill_template(
        LAYOUT_TEMPLATE,
        &[
            ("lang", escape_html(&config.base.language).as_str()),
            ("description", escape_html(&config.base.description).as_str()),
            ("title", escape_html(&title).as_str()),
            ("site_title", escape_html(&config.base.title).as_str()),
            ("version", env!("CARGO_PKG_VERSION")),
            ("header_offset", header_offset.as_str()),
            ("copy_reset_ms", copy_reset_ms.as_str()),
            ("sidebar", sidebar(view).as_str()),
            ("breadcrumb", breadcrumb(view).as_str()),
            ("main", main.as_str()),
        ],
    );

    HtmlPage { status, html }
}

/// Substitute `{name}` placeholders of `template` in one pass.
///
/// Values are copied verbatim and never rescanned, so text such as a filter
/// query of `{main}` stays literal. Braces naming no placeholder are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let found = tail[1..].find('}').and_then(|end| {
            let name = &tail[1..=end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end + 2))
        });
        match found {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Main Area
// ============================================================================

/// Status, title and main-area HTML for the current page.
fn main_area(view: &ViewState<'_>, config: &SiteConfig) -> (u16, Option<String>, String) {
    match view.page() {
        Page::Home => {
            let mut html = section_cards(view);
            let (status, document) = document_area(view);
            html.push_str(&document);
            (status, None, html)
        }
        Page::Section(section) => (200, Some(section.title.clone()), section_page(view, section)),
        Page::Pattern(entry) => {
            let (status, mut html) = document_area(view);
            if status == 200 {
                let _ = writeln!(
                    html,
                    r#"<p class="source-link"><a href="{}">View Markdown source</a></p>"#,
                    escape_html(&config.content.url_for(&entry.file))
                );
            }
            (status, Some(entry.title.clone()), html)
        }
        Page::SectionNotFound => (
            404,
            Some("Section Not Found".into()),
            not_found("Section Not Found", "section", route_id(view)),
        ),
        Page::PatternNotFound => (
            404,
            Some("Pattern Not Found".into()),
            not_found("Pattern Not Found", "topic", route_id(view)),
        ),
    }
}

fn route_id<'v>(view: &'v ViewState<'_>) -> &'v str {
    match &view.location().route {
        Route::Home => "",
        Route::Section(id) | Route::Pattern(id) => id,
    }
}

/// The loaded document, or the loading / error state in its place.
fn document_area(view: &ViewState<'_>) -> (u16, String) {
    match view.load_state() {
        LoadState::Idle => (200, String::new()),
        LoadState::Loading { path } => (
            200,
            format!(
                r#"<div class="loading">Loading <code>{}</code>…</div>"#,
                escape_html(path)
            ),
        ),
        LoadState::Loaded { .. } => {
            let body = view.document().map(|doc| doc.html.as_str()).unwrap_or_default();
            (200, format!("<article class=\"markdown-body\">\n{body}</article>\n"))
        }
        LoadState::Failed {
            path,
            status,
            message,
        } => (502, error_panel(path, *status, message)),
    }
}

fn error_panel(path: &str, status: u16, message: &str) -> String {
    format!(
        concat!(
            r#"<div class="error-panel" role="alert">"#,
            "<h2>Failed to load content</h2>",
            "<p>{message}</p>",
            r#"<p class="error-path"><code>{path}</code> (HTTP {status})</p>"#,
            r#"<a href="/">Back to overview</a>"#,
            "</div>\n"
        ),
        message = escape_html(message),
        path = escape_html(path),
        status = status,
    )
}

fn not_found(heading: &str, kind: &str, id: &str) -> String {
    format!(
        concat!(
            r#"<div class="not-found">"#,
            "<h1>{heading}</h1>",
            "<p>No {kind} with id <code>{id}</code>.</p>",
            r#"<a href="/">Back to overview</a>"#,
            "</div>\n"
        ),
        heading = heading,
        kind = kind,
        id = escape_html(id),
    )
}

/// Home page cards: one per section with its entry count.
fn section_cards(view: &ViewState<'_>) -> String {
    let catalog = view.catalog();
    let mut html = String::from("<section class=\"section-cards\">\n");
    for section in catalog.sections() {
        let count = catalog.count_in(&section.id);
        let style = if section.gradient.is_empty() {
            String::new()
        } else {
            format!(r#" style="--gradient: {}""#, escape_html(&section.gradient))
        };
        let _ = writeln!(
            html,
            r#"<a class="section-card" href="{href}"{style}><span class="icon">{icon}</span><h2>{title}</h2><p>{description}</p><span class="count">{count} {noun}</span></a>"#,
            href = Route::section(&section.id),
            icon = section.icon,
            title = escape_html(&section.title),
            description = escape_html(&section.description),
            noun = if count == 1 { "topic" } else { "topics" },
        );
    }
    html.push_str("</section>\n");
    html
}

/// Section page: entries grouped by category in catalog order.
fn section_page(view: &ViewState<'_>, section: &Section) -> String {
    let catalog = view.catalog();
    let mut html = format!(
        "<header class=\"section-header\"><span class=\"icon\">{}</span><h1>{}</h1><p>{}</p></header>\n",
        section.icon,
        escape_html(&section.title),
        escape_html(&section.description),
    );

    for (category, entries) in catalog.categories_in(&section.id) {
        let _ = writeln!(html, "<h2>{}</h2>\n<ul class=\"entry-list\">", escape_html(category));
        for entry in entries {
            let _ = writeln!(
                html,
                r#"<li><a href="{}">{} {}</a></li>"#,
                catalog.route_for(entry),
                entry.icon,
                escape_html(&entry.title)
            );
        }
        html.push_str("</ul>\n");
    }
    html
}

// ============================================================================
// Chrome
// ============================================================================

fn breadcrumb(view: &ViewState<'_>) -> String {
    let segments = view.breadcrumb();
    if segments.is_empty() || matches!(view.page(), Page::Home) {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="breadcrumb"><a href="/">Home</a>"#);
    if let Some(section) = view.active_section().and_then(|id| view.catalog().section(id)) {
        let _ = write!(
            html,
            r#"<span class="sep">/</span><a href="{}">{}</a>"#,
            Route::section(&section.id),
            escape_html(&section.title)
        );
    }
    for segment in segments {
        let _ = write!(
            html,
            r#"<span class="sep">/</span><span>{}</span>"#,
            escape_html(segment)
        );
    }
    html.push_str("</nav>");
    html
}

fn sidebar(view: &ViewState<'_>) -> String {
    let catalog = view.catalog();
    let current = match &view.location().route {
        Route::Pattern(id) => Some(id.as_str()),
        _ => None,
    };
    let active = view.active_section();
    let filtering = !view.filter().trim().is_empty();

    let mut html = format!(
        concat!(
            r#"<form class="sidebar-filter" method="get" role="search">"#,
            r#"<input type="search" name="q" value="{}" placeholder="Filter topics…" autocomplete="off" aria-label="Filter topics">"#,
            "</form>\n"
        ),
        escape_html(view.filter())
    );

    let home_class = if matches!(view.location().route, Route::Home) {
        "sidebar-home active"
    } else {
        "sidebar-home"
    };
    let _ = writeln!(html, r#"<a class="{home_class}" href="/">🏠 Overview</a>"#);

    for section in catalog.sections() {
        let visible = view.visible_entries(&section.id);
        let open = view.is_section_open(&section.id) || (filtering && !visible.is_empty());
        let class = if active == Some(section.id.as_str()) {
            "sidebar-section active"
        } else {
            "sidebar-section"
        };

        let _ = writeln!(
            html,
            r#"<details class="{class}" data-section="{id}" data-expanded="{expanded}"{open}><summary><span class="icon">{icon}</span> <a href="{href}">{title}</a> <span class="count">{count}</span></summary>"#,
            id = escape_html(&section.id),
            expanded = view.is_section_expanded(&section.id),
            open = if open { " open" } else { "" },
            icon = section.icon,
            href = Route::section(&section.id),
            title = escape_html(&section.title),
            count = catalog.count_in(&section.id),
        );

        html.push_str("<ul>\n");
        for entry in catalog.entries_in(&section.id) {
            let hidden = !visible.iter().any(|v| v.id == entry.id);
            let link_class = if current == Some(entry.id.as_str()) {
                r#" class="current""#
            } else {
                ""
            };
            let _ = writeln!(
                html,
                r#"<li data-title="{title_key}" data-file="{file_key}"{hidden}><a{link_class} href="{href}">{icon} {title}</a></li>"#,
                title_key = escape_html(&entry.title.to_lowercase()),
                file_key = escape_html(&entry.file.to_lowercase()),
                hidden = if hidden { " hidden" } else { "" },
                href = catalog.route_for(entry),
                icon = entry.icon,
                title = escape_html(&entry.title),
            );
        }
        html.push_str("</ul></details>\n");
    }

    if filtering && filter_entries(catalog, view.filter()).is_empty() {
        html.push_str("<p class=\"sidebar-empty\">No matching topics.</p>\n");
    }
    html
}
