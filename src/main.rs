//! docsite - A Markdown handbook server with routed pages and navigable anchors.

mod catalog;
mod check;
mod chrome;
mod cli;
mod clipboard;
mod commands;
mod config;
mod fetch;
mod logger;
mod nav;
mod page;
mod render;
mod resolve;
mod route;
mod serve;
mod view;

use anyhow::{Context, Result};
use catalog::Catalog;
use check::check_site;
use clap::Parser;
use cli::{Cli, Commands};
use clipboard::SystemClipboard;
use config::SiteConfig;
use serve::serve_site;
use std::io::{self, Write};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(SiteConfig::load(cli)?));
    let catalog: &'static Catalog = Box::leak(Box::new(load_catalog(config)?));

    let mut out = io::stdout();

    match &cli.command {
        Commands::Serve { .. } => serve_site(config, catalog),
        Commands::Render { id, json } => commands::render(id, *json, config, catalog, &mut out),
        Commands::Resolve { href, from } => commands::resolve(href, from.as_deref(), config, catalog, &mut out),
        Commands::List { filter, section } => {
            commands::list(filter.as_deref(), section.as_deref(), catalog, &mut out)
        }
        Commands::Check => check_site(config, catalog),
        Commands::Copy { id, block } => commands::copy(id, *block, config, catalog, &SystemClipboard),
    }?;

    out.flush()?;
    Ok(())
}

/// Load the configured catalog, or the built-in one.
fn load_catalog(config: &SiteConfig) -> Result<Catalog> {
    let path = config.content.catalog.as_deref();
    Catalog::load(path).with_context(|| match path {
        Some(path) => format!("Failed to load catalog `{}`", path.display()),
        None => "Built-in catalog is invalid".to_string(),
    })
}
