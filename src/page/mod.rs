//! Page model
//!
//! A page is a title plus an opaque body. The title doubles as the storage key.

mod store;

pub use store::{PageStore, StoreError};

use std::fmt;

/// A validated page title: one or more ASCII letters or digits.
///
/// Only `[a-zA-Z0-9]` is accepted. Unicode letters and digits are rejected, and no
/// separator or `.` can reach a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    /// Validate a raw title
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A page held in memory for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub const fn new(title: Title, body: Vec<u8>) -> Self {
        Self { title, body }
    }

    /// A page that has a title but no content yet
    pub const fn blank(title: Title) -> Self {
        Self::new(title, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_accepts_ascii_alphanumeric() {
        assert!(Title::parse("FrontPage").is_some());
        assert!(Title::parse("abc123").is_some());
        assert!(Title::parse("0").is_some());
    }

    #[test]
    fn test_title_rejects_everything_else() {
        for raw in ["", "foo!", "foo/bar", "..", "a.txt", "with space", "dash-ed", "under_score"] {
            assert!(Title::parse(raw).is_none(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_title_rejects_unicode_alphanumerics() {
        assert!(Title::parse("café").is_none());
        assert!(Title::parse("Ⅻ").is_none());
        assert!(Title::parse("٣").is_none());
    }

    #[test]
    fn test_blank_page() {
        let page = Page::blank(Title::parse("New").unwrap());
        assert_eq!(page.title.as_str(), "New");
        assert!(page.body.is_empty());
    }
}
