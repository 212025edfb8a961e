//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn title() -> String {
        "JS Handbook".into()
    }

    pub fn description() -> String {
        "JavaScript fundamentals, design patterns and interview notes".into()
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    use std::path::PathBuf;

    pub fn root() -> PathBuf {
        "content".into()
    }

    pub fn url_base() -> String {
        "/content/".into()
    }

    pub fn catalog() -> Option<PathBuf> {
        None
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}

// ============================================================================
// [view] Section Defaults
// ============================================================================

pub mod view {
    /// Height of the fixed page header, subtracted from anchor scroll targets.
    pub fn header_offset() -> u32 {
        80
    }

    pub fn copy_reset_ms() -> u64 {
        2000
    }

    pub fn expanded() -> Vec<String> {
        vec!["js-fundamentals".into()]
    }
}
