// src/error.rs
// =============================================================================
// Error types for the crawl library.
//
// Only CrawlError ever comes back from Crawler::crawl. The others are
// produced and absorbed inside the crawl: a failed fetch or an unreadable
// page only ends its own branch.
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from the #[error] text
// - #[from]: lets `?` convert a lower-level error automatically
// =============================================================================

use thiserror::Error;

/// Errors that abort a crawl before it starts
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("invalid crawl configuration: {0}")]
    InvalidConfig(String),
}

/// Why a single fetch did not produce a usable body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("cancelled by crawl deadline")]
    Cancelled,
}

/// Why a fetched body could not be turned into a page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("unparseable document: {0}")]
    Unparseable(String),
}

/// Returned by the dispatcher when the crawl deadline fires while waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cancelled")]
pub struct Cancelled;

/// Errors while writing the output document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("there are no pages to write")]
    NoPages,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why one page was abandoned; only ever logged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}
