//! Fenced code block syntax highlighting.
//!
//! Highlighting emits class-based `<span>`s; the matching stylesheet is
//! generated once from a bundled theme and served at `/assets/highlight.css`.
//! Loading the syntax set is expensive, so a single [`Highlighter`] is built
//! lazily and shared by every render.

use std::sync::LazyLock;
use syntect::{
    highlighting::ThemeSet,
    html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

/// Theme used for the generated stylesheet.
const THEME: &str = "base16-ocean.dark";

static HIGHLIGHTER: LazyLock<Highlighter> = LazyLock::new(Highlighter::new);

/// Shared highlighter instance.
pub fn highlighter() -> &'static Highlighter {
    &HIGHLIGHTER
}

/// Map info-string languages missing from the bundled syntax set to close relatives.
fn alias(lang: &str) -> &str {
    match lang {
        "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "typescript" | "node" => "js",
        "sh" | "shell" | "zsh" | "console" => "bash",
        "yml" => "yaml",
        "htm" | "vue" => "html",
        other => other,
    }
}

pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Highlighter {
    fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    fn syntax_for(&self, lang: Option<&str>) -> &SyntaxReference {
        lang.map(|l| alias(&l.to_ascii_lowercase()).to_owned())
            .and_then(|l| self.syntaxes.find_syntax_by_token(&l))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    /// Highlight `code` as HTML (inner content of `<code>`).
    ///
    /// Unknown languages fall back to escaped plain text.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = self.syntax_for(lang);
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);

        for line in LinesWithEndings::from(code) {
            if generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                return super::escape_html(code);
            }
        }
        generator.finalize()
    }

    /// Stylesheet for the classes emitted by [`Self::highlight`].
    pub fn stylesheet(&self) -> String {
        let themes = ThemeSet::load_defaults();
        themes
            .themes
            .get(THEME)
            .and_then(|theme| css_for_theme_with_class_style(theme, ClassStyle::Spaced).ok())
            .unwrap_or_default()
    }
}
