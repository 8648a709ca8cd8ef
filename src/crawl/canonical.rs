// src/crawl/canonical.rs
// =============================================================================
// URL canonicalization: the key used to decide "have we seen this page?".
//
// By default only the fragment is removed, so "/docs#install" and "/docs"
// are the same page. Query strings and trailing slashes are left alone,
// which means "/docs" and "/docs/" are crawled as two pages. Sites that
// serve the same page under both forms can opt into TrimTrailingSlash.
//
// The `url` crate already normalizes scheme and host case, default ports
// and percent-encoding when parsing, so those never need handling here.
// =============================================================================

use url::Url;

/// How URLs are reduced to a de-duplication key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Canonicalization {
    /// Remove the fragment only
    #[default]
    FragmentOnly,
    /// Remove the fragment and any trailing '/' from a non-root path
    TrimTrailingSlash,
}

impl Canonicalization {
    pub fn apply(self, url: &Url) -> Url {
        let mut canonical = url.clone();
        canonical.set_fragment(None);

        if self == Canonicalization::TrimTrailingSlash {
            let trimmed = canonical.path().trim_end_matches('/').to_string();
            if trimmed.is_empty() {
                canonical.set_path("/");
            } else if trimmed.len() != canonical.path().len() {
                canonical.set_path(&trimmed);
            }
        }

        canonical
    }
}
