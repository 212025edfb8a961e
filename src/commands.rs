//! One-shot CLI commands: `render`, `resolve`, `list`, `copy`.
//!
//! Each command writes its result to the given writer so the output can be
//! asserted in tests; `main` passes stdout.

use crate::catalog::Catalog;
use crate::chrome::matches_filter;
use crate::clipboard::Clipboard;
use crate::config::SiteConfig;
use crate::fetch::{ContentSource, FsSource};
use crate::log;
use crate::render::{RenderedDocument, Renderer};
use crate::route::Location;
use crate::view::{Effect, ViewState};
use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use std::io::Write;
use std::time::Instant;

/// Fetch and render the entry `id`.
fn load(id: &str, catalog: &Catalog, source: &dyn ContentSource) -> Result<RenderedDocument> {
    let entry = catalog
        .entry(id)
        .ok_or_else(|| anyhow!("no catalog entry with id `{id}`"))?;
    let text = source.fetch(&entry.file)?;
    Ok(Renderer::new(catalog).render(&text, Some(&entry.file)))
}

/// `docsite render <id> [--json]`
pub fn render(id: &str, json: bool, config: &SiteConfig, catalog: &Catalog, out: &mut dyn Write) -> Result<()> {
    let source = FsSource::new(&config.content.root);
    let document = load(id, catalog, &source)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &document).context("Failed to serialize document")?;
        writeln!(out)?;
    } else {
        out.write_all(document.html.as_bytes())?;
    }
    Ok(())
}

/// `docsite resolve <href> [--from <location>]`
///
/// Opens `from` (default `/`), clicks `href` inside it and prints what the
/// navigator does, one effect per line. Links the navigator leaves to the
/// browser print `external`.
pub fn resolve(
    href: &str,
    from: Option<&str>,
    config: &SiteConfig,
    catalog: &Catalog,
    out: &mut dyn Write,
) -> Result<()> {
    let source = FsSource::new(&config.content.root);
    resolve_from(href, from, config, catalog, &source, out)
}

fn resolve_from(
    href: &str,
    from: Option<&str>,
    config: &SiteConfig,
    catalog: &Catalog,
    source: &dyn ContentSource,
    out: &mut dyn Write,
) -> Result<()> {
    let from = from.unwrap_or("/");
    let location = Location::parse(from).ok_or_else(|| anyhow!("`{from}` is not a page location"))?;

    let mut view = ViewState::new(catalog, &config.view);
    view.open(location, source);

    let effects = view.click(href);
    if effects.is_empty() {
        let outcome = if href.starts_with('#') {
            "no such anchor"
        } else {
            "external"
        };
        writeln!(out, "{outcome}")?;
        return Ok(());
    }

    for effect in view.run(source, effects) {
        match effect {
            Effect::Navigate(location) => writeln!(out, "navigate {location}")?,
            Effect::ScrollToTop => writeln!(out, "scroll top")?,
            Effect::ScrollTo(target) => writeln!(out, "scroll #{} (offset {})", target.id, target.offset)?,
            Effect::ReplaceFragment(id) => writeln!(out, "replace #{id}")?,
            Effect::Fetch(_) => {}
        }
    }
    Ok(())
}

/// `docsite list [--filter <q>] [--section <id>]`
///
/// Sections without a matching entry are skipped.
pub fn list(filter: Option<&str>, section: Option<&str>, catalog: &Catalog, out: &mut dyn Write) -> Result<()> {
    if let Some(id) = section
        && catalog.section(id).is_none()
    {
        bail!("no section with id `{id}`");
    }
    let query = filter.unwrap_or_default();

    let mut shown = 0;
    for sec in catalog.sections() {
        if section.is_some_and(|id| id != sec.id) {
            continue;
        }

        let mut printed_header = false;
        for (category, entries) in catalog.categories_in(&sec.id) {
            let entries: Vec<_> = entries.into_iter().filter(|e| matches_filter(e, query)).collect();
            if entries.is_empty() {
                continue;
            }
            if !printed_header {
                writeln!(out, "{} {}", sec.icon, sec.title.bold())?;
                printed_header = true;
            }
            writeln!(out, "  {}", category.dimmed())?;
            for entry in entries {
                writeln!(
                    out,
                    "    {:<20} {} {}  {}",
                    entry.id.cyan(),
                    entry.icon,
                    entry.title,
                    entry.file.dimmed()
                )?;
                shown += 1;
            }
        }
    }

    if shown == 0 {
        writeln!(out, "no matching entries")?;
    }
    Ok(())
}

/// `docsite copy <id> [--block <n>]`
pub fn copy(
    id: &str,
    block: usize,
    config: &SiteConfig,
    catalog: &Catalog,
    clipboard: &dyn Clipboard,
) -> Result<()> {
    let source = FsSource::new(&config.content.root);
    copy_from(id, block, config, catalog, &source, clipboard)
}

fn copy_from(
    id: &str,
    block: usize,
    config: &SiteConfig,
    catalog: &Catalog,
    source: &dyn ContentSource,
    clipboard: &dyn Clipboard,
) -> Result<()> {
    let document = load(id, catalog, source)?;
    let count = document.code_blocks.len();
    let mut button = document
        .copy_button(block, config.view.copy_reset())
        .ok_or_else(|| anyhow!("`{id}` has {count} code blocks, no block {block}"))?;

    let now = Instant::now();
    if !button.click(clipboard, now) {
        bail!("failed to copy block {block} of `{id}`");
    }
    log!("copy"; "{} ({} lines)", button.label(now), button.text().lines().count());
    Ok(())
}
