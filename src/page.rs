// src/page.rs
// =============================================================================
// The record produced for every successfully crawled page.
//
// A Page is created once by the crawler, right after its fetch and
// extraction succeed, and is never modified afterwards.
// =============================================================================

use serde::{Deserialize, Serialize};

/// One crawled page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Canonical URL of the page (fragment removed)
    pub url: String,
    /// Contents of the <title> element, may be empty
    pub title: String,
    /// Plain text extracted from the page
    pub content: String,
    /// Number of link hops from the seed along the path the crawl took
    pub depth: usize,
}

impl Page {
    pub fn new(url: impl Into<String>, title: impl Into<String>, content: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            depth,
        }
    }
}
