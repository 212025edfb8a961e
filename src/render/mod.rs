//! Markdown to HTML rendering.
//!
//! On top of plain CommonMark (plus tables, strikethrough, task lists and
//! footnotes) the renderer:
//!
//! - gives every heading a document-unique slug id usable as a scroll target
//! - highlights fenced code blocks and wraps each in a copy-button container
//! - rewrites links to other catalog documents into page routes
//! - passes raw HTML through untouched (the content mixes Markdown and HTML)

mod copy;
mod highlight;
mod markdown;
pub mod slug;

pub use copy::CopyButton;
pub use highlight::highlighter;

use crate::catalog::Catalog;
use highlight::Highlighter;
use serde::Serialize;
use std::time::Duration;

/// A heading of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// A code block of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// First word of the fence info string, if any.
    pub lang: Option<String>,
    /// Block source exactly as written (including the final newline).
    pub text: String,
}

/// Output of one render pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedDocument {
    pub html: String,
    pub headings: Vec<Heading>,
    pub code_blocks: Vec<CodeBlock>,
    /// `.md` links that matched no catalog entry.
    pub unresolved_links: Vec<String>,
}

impl RenderedDocument {
    /// True if some heading carries `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.headings.iter().any(|h| h.id == id)
    }

    /// Copy control for the code block at `index`.
    pub fn copy_button(&self, index: usize, reset_after: Duration) -> Option<CopyButton> {
        self.code_blocks
            .get(index)
            .map(|block| CopyButton::new(&block.text, reset_after))
    }
}

/// Renders documents of one catalog.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    catalog: &'a Catalog,
    highlighter: &'a Highlighter,
}

impl<'a> Renderer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            highlighter: highlighter(),
        }
    }

    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Render `source`; `current_file` names the document in link diagnostics.
    pub fn render(&self, source: &str, current_file: Option<&str>) -> RenderedDocument {
        markdown::render(source, current_file, self.catalog, self.highlighter)
    }
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_copy_button_for_block() {
        let doc = RenderedDocument {
            code_blocks: vec![CodeBlock {
                lang: Some("js".into()),
                text: "let a = 1;\n".into(),
            }],
            ..Default::default()
        };
        let reset = Duration::from_secs(2);
        let button = doc.copy_button(0, reset).unwrap();
        assert_eq!(button.text(), "let a = 1;");
        assert!(doc.copy_button(1, reset).is_none());
    }
}
