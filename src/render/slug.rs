//! Heading id slugification.
//!
//! Ids follow the GitHub heading-anchor convention the content is authored
//! against, so existing `[see below](#closures--scope)` links keep working:
//!
//! 1. lowercase
//! 2. drop everything except letters, digits, spaces, `-` and `_`
//! 3. each space becomes `-` (runs are not collapsed)
//!
//! Repeated headings get `-1`, `-2`, ... suffixes within one document.

use rustc_hash::FxHashMap;

/// Fallback id for headings whose text slugifies to nothing.
const EMPTY_SLUG: &str = "section";

/// Convert heading text to an anchor slug.
pub fn slugify(text: &str) -> String {
    let slug: String = text
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();

    if slug.is_empty() {
        EMPTY_SLUG.to_owned()
    } else {
        slug
    }
}

/// Hands out document-unique slugs.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: FxHashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `text`, suffixed if already used in this document.
    pub fn slug(&mut self, text: &str) -> String {
        self.claim(slugify(text))
    }

    /// Reserve an explicit id (`{#custom}` heading attribute).
    pub fn claim(&mut self, base: String) -> String {
        let mut count = self.seen.get(&base).copied().unwrap_or(0);
        let mut candidate = base.clone();
        while self.seen.contains_key(&candidate) {
            count += 1;
            candidate = format!("{base}-{count}");
        }
        self.seen.entry(candidate.clone()).or_insert(0);
        self.seen.insert(base, count);
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Lazy Initialization"), "lazy-initialization");
        assert_eq!(slugify("  Section Two  "), "section-two");
    }

    #[test]
    fn test_slugify_removes_punctuation() {
        assert_eq!(slugify("What is `this`?"), "what-is-this");
        assert_eq!(slugify("Closures & Scope"), "closures--scope");
        assert_eq!(slugify("Q1: Hoisting (var vs let)"), "q1-hoisting-var-vs-let");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Größe"), "größe");
        assert_eq!(slugify("单例模式"), "单例模式");
    }

    #[test]
    fn test_slugify_keeps_hyphen_and_underscore() {
        assert_eq!(slugify("snake_case-vs-kebab"), "snake_case-vs-kebab");
    }

    #[test]
    fn test_slugify_empty_fallback() {
        assert_eq!(slugify(""), "section");
        assert_eq!(slugify("???"), "section");
    }

    #[test]
    fn test_slugger_deduplicates() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Example"), "example");
        assert_eq!(slugger.slug("Example"), "example-1");
        assert_eq!(slugger.slug("Example"), "example-2");
        assert_eq!(slugger.slug("Other"), "other");
    }

    #[test]
    fn test_slugger_avoids_collision_with_suffixed_text() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Example 1"), "example-1");
        assert_eq!(slugger.slug("Example"), "example");
        assert_eq!(slugger.slug("Example"), "example-2");
    }
}
