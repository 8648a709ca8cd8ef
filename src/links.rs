// src/links.rs
// =============================================================================
// Turning raw href values into URLs the crawler is allowed to follow.
//
// Two steps:
// 1. resolve_url: make an href absolute against the page it was found on
// 2. LinkFilter: keep only http(s) links on the seed's host that look like
//    documents (not images, archives, stylesheets...)
//
// Rust concepts:
// - Url::join: standard relative URL resolution, same as a browser does
// - Option<Url>: "no followable link here" without needing an error type
// =============================================================================

use url::{ParseError, Url};

/// Extensions that never lead to a document worth extracting text from
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "zip", "gz", "tar", "rar", "7z", "exe", "dmg", "png", "jpg", "jpeg", "gif", "svg",
    "webp", "ico", "mp3", "mp4", "avi", "mov", "css", "js", "woff", "woff2", "ttf",
];

// Resolves a possibly-relative reference against a base URL
//
// Examples with base = "https://example.com/guide/intro":
//   "/docs"              -> https://example.com/docs
//   "setup"              -> https://example.com/guide/setup
//   "../api"             -> https://example.com/api
//   "//cdn.example.com/" -> https://cdn.example.com/
//   "https://other.com"  -> https://other.com/
pub fn resolve_url(base: &Url, reference: &str) -> Result<Url, ParseError> {
    base.join(reference.trim())
}

// Resolves an href found on a page, skipping the ones that can never be
// crawled (in-page anchors and non-HTTP schemes)
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    resolve_url(base, href).ok()
}

/// Decides which resolved links stay inside the crawl
#[derive(Debug, Clone)]
pub struct LinkFilter {
    base_domain: String,
}

impl LinkFilter {
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
        }
    }

    /// True if the crawler may follow `url`
    pub fn allows(&self, url: &Url) -> bool {
        (url.scheme() == "http" || url.scheme() == "https")
            && url.host_str() == Some(self.base_domain.as_str())
            && !has_non_document_extension(url)
    }
}

// Looks at the last path segment only, so "/v1.2/guide" is still a document
fn has_non_document_extension(url: &Url) -> bool {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            NON_DOCUMENT_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
