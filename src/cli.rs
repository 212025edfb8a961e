//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docsite markdown handbook server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: docsite.toml)
    #[arg(short = 'C', long, default_value = "docsite.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the handbook over HTTP
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render one catalog entry to HTML on stdout
    Render {
        /// Catalog id of the entry
        id: String,

        /// Print headings, code blocks and html as JSON
        #[arg(long)]
        json: bool,
    },

    /// Click a link the way the in-page navigator does and print the outcome
    Resolve {
        /// Link target as written in the document (e.g. `../structural/adapter.md#intent`)
        href: String,

        /// Page the link is clicked on (e.g. `/pattern/singleton`, default `/`)
        #[arg(short, long)]
        from: Option<String>,
    },

    /// List catalog entries grouped by section
    List {
        /// Case-insensitive substring matched against titles and file paths
        #[arg(short, long)]
        filter: Option<String>,

        /// Only list entries of this section
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Validate the catalog against the content directory
    Check,

    /// Copy a code block of an entry to the system clipboard
    Copy {
        /// Catalog id of the entry
        id: String,

        /// Zero-based index of the code block within the document
        #[arg(short, long, default_value_t = 0)]
        block: usize,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::parse_from(["docsite", "serve", "--port", "8080", "-i", "0.0.0.0"]);
        assert!(cli.is_serve());
        match cli.command {
            Commands::Serve { interface, port } => {
                assert_eq!(interface.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_global_paths() {
        let cli = Cli::parse_from(["docsite", "-r", "site", "-c", "docs", "check"]);
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        assert_eq!(cli.content, Some(PathBuf::from("docs")));
        assert_eq!(cli.config, PathBuf::from("docsite.toml"));
        assert!(cli.is_check());
    }

    #[test]
    fn test_parse_copy_default_block() {
        let cli = Cli::parse_from(["docsite", "copy", "singleton"]);
        match cli.command {
            Commands::Copy { id, block } => {
                assert_eq!(id, "singleton");
                assert_eq!(block, 0);
            }
            _ => panic!("expected copy"),
        }
    }

    #[test]
    fn test_parse_resolve_from() {
        let cli = Cli::parse_from([
            "docsite",
            "resolve",
            "../creational/factory.md#intent",
            "--from",
            "/pattern/singleton",
        ]);
        match cli.command {
            Commands::Resolve { href, from } => {
                assert_eq!(href, "../creational/factory.md#intent");
                assert_eq!(from.as_deref(), Some("/pattern/singleton"));
            }
            _ => panic!("expected resolve"),
        }
    }
}
