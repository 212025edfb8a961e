//! HTTP server for the handbook.
//!
//! Built on `tiny_http`; every page route is rendered server-side from a
//! fresh [`ViewState`], so requests share nothing mutable and are handled
//! concurrently on the rayon pool.
//!
//! # Routes
//!
//! | Path                    | Response |
//! |-------------------------|----------|
//! | `/`, `/section/:id`, `/pattern/:id` | rendered page (`?q=` pre-filters the sidebar) |
//! | `{url_base}<file>`      | raw content file (404 missing, 403 outside the content root) |
//! | `/assets/app.css`, `/assets/app.js`, `/assets/highlight.css` | embedded assets |
//! | anything else           | 404 |
//!
//! The server blocks until Ctrl+C is received.

use crate::{
    catalog::Catalog,
    config::SiteConfig,
    fetch::FsSource,
    log,
    page::render_page,
    render::highlighter,
    route::Location,
    view::ViewState,
};
use anyhow::{Context, Result, anyhow};
use std::{
    borrow::Cow,
    net::{IpAddr, SocketAddr},
    path::Path,
    sync::{Arc, LazyLock},
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

// ============================================================================
// Constants - Embedded Assets
// ============================================================================

/// Page stylesheet (embedded at compile time)
const APP_CSS: &str = include_str!("embed/serve/app.css");

/// Client script: copy buttons, anchor scrolling, live sidebar filter
const APP_JS: &str = include_str!("embed/serve/app.js");

/// Syntax highlighting classes, generated on first request
static HIGHLIGHT_CSS: LazyLock<String> = LazyLock::new(|| highlighter().stylesheet());

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Cookie listing the sidebar sections flipped from their configured default
/// (comma separated, URL encoded). Written by `app.js`.
const TOGGLED_COOKIE: &str = "docsite-toggled";

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the server.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Hands each request to the rayon pool
pub fn serve_site(config: &'static SiteConfig, catalog: &'static Catalog) -> Result<()> {
    let interface = config.serve.ip()?;
    let base_port = config.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);
    log!("serve"; "{} topics from {}", catalog.entries().len(), config.content.root.display());

    for request in server.incoming_requests() {
        rayon::spawn(move || {
            if let Err(e) = handle_request(request, config, catalog) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// A response ready to be written.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn html(status: u16, body: String) -> Self {
        Self::new(status, "text/html; charset=utf-8", body)
    }

    fn not_found() -> Self {
        Self::new(404, "text/plain; charset=utf-8", "404 Not Found")
    }
}

/// Handle a single HTTP request.
fn handle_request(request: Request, config: &SiteConfig, catalog: &Catalog) -> Result<()> {
    let cookies = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Cookie"))
        .map(|header| header.value.as_str())
        .unwrap_or_default();

    let reply = respond(request.url(), cookies, config, catalog);
    if reply.status >= 400 {
        log!("serve"; "{} {}", reply.status, request.url());
    }

    let header = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow!("invalid content type `{}`", reply.content_type))?;
    let response = Response::from_data(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header);

    request.respond(response)?;
    Ok(())
}

/// Build the reply for a request URL.
///
/// Resolution order:
/// 1. Embedded assets
/// 2. Raw content files under `url_base`
/// 3. Page routes
/// 4. Nothing matched → 404
///
/// `cookies` is the raw `Cookie` header (empty when absent).
fn respond(url: &str, cookies: &str, config: &SiteConfig, catalog: &Catalog) -> Reply {
    // Strip fragment and query string before decoding so an encoded `?` stays in the path
    let url = url.split('#').next().unwrap_or(url);
    let (raw_path, query) = url.split_once('?').unwrap_or((url, ""));

    // Decode URL-encoded characters (e.g., %20 → space)
    let path = urlencoding::decode(raw_path).unwrap_or(Cow::Borrowed(raw_path));

    match &*path {
        "/assets/app.css" => return Reply::new(200, "text/css; charset=utf-8", APP_CSS),
        "/assets/app.js" => return Reply::new(200, "application/javascript; charset=utf-8", APP_JS),
        "/assets/highlight.css" => {
            return Reply::new(200, "text/css; charset=utf-8", HIGHLIGHT_CSS.as_str());
        }
        _ => {}
    }

    let source = FsSource::new(&config.content.root);
    if let Some(file) = path.strip_prefix(config.content.url_base.as_str()) {
        return serve_content(&source, file);
    }

    let Some(location) = Location::parse(&path) else {
        return Reply::not_found();
    };

    let mut view = ViewState::new(catalog, &config.view);
    if let Some(filter) = query_param(query, "q") {
        view.set_filter(&filter);
    }
    for section in toggled_sections(cookies) {
        view.toggle_section(&section);
    }
    view.open(location, &source);

    let page = render_page(&view, config);
    Reply::html(page.status, page.html)
}

/// Serve a file below the content root with its content type.
fn serve_content(source: &FsSource, file: &str) -> Reply {
    match source.read(file) {
        Ok(content) => Reply::new(200, guess_content_type(Path::new(file)), content),
        Err(err) => Reply::new(err.status(), "text/plain; charset=utf-8", err.to_string()),
    }
}

/// Value of `name` in a query string, decoded (`+` → space).
fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then(|| {
            let value = value.replace('+', " ");
            urlencoding::decode(&value)
                .map(Cow::into_owned)
                .unwrap_or(value)
        })
    })
}

/// Section ids listed in the sidebar cookie, each at most once.
fn toggled_sections(cookies: &str) -> Vec<String> {
    let Some(value) = cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == TOGGLED_COOKIE).then_some(value)
    }) else {
        return Vec::new();
    };

    let value = urlencoding::decode(value).unwrap_or(Cow::Borrowed(value));
    let mut sections: Vec<String> = Vec::new();
    for id in value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !sections.iter().any(|seen| seen == id) {
            sections.push(id.to_owned());
        }
    }
    sections
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Documents
        Some("md" | "markdown") => "text/markdown; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",

        // Images referenced from documents
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",

        // Default binary
        _ => "application/octet-stream",
    }
}
