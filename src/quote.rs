//! The quote record shared by every parser and the composer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quotation marks stripped from both ends of a quote body.
const QUOTE_MARKS: &[char] = &['"', '\u{201C}', '\u{201D}'];

/// An immutable body/author pair.
///
/// The body never carries surrounding quotation marks; the composer adds its
/// own. The author is stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRecord {
    body: String,
    author: String,
}

impl QuoteRecord {
    /// Create a quote, stripping surrounding quotation marks from `body`.
    pub fn new(body: impl AsRef<str>, author: impl Into<String>) -> Self {
        Self {
            body: body.as_ref().trim_matches(QUOTE_MARKS).to_string(),
            author: author.into(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

impl fmt::Display for QuoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.body, self.author)
    }
}
