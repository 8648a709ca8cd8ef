// src/lib.rs
// =============================================================================
// docrawl: crawl a documentation site and collect its pages as text.
//
// Modules:
// - crawl: the concurrent crawl engine (Crawler, Dispatcher, visited set)
// - fetch: the Fetcher trait and its reqwest implementation
// - extract: the Extractor trait and the HTML implementation
// - links: link resolution and the same-domain filter
// - render: text and JSON output documents
// - config, error, page: shared types
//
// Example:
//   let config = CrawlConfig::new("https://docs.example.com/").with_max_depth(2);
//   let crawler = Crawler::new(config, Arc::new(HttpFetcher::new()?), Arc::new(HtmlExtractor));
//   let pages = crawler.crawl().await?;
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod links;
pub mod page;
pub mod render;

pub use config::CrawlConfig;
pub use crawl::{Canonicalization, Crawler};
pub use error::{CrawlError, ExtractError, FetchError, RenderError};
pub use extract::{Extracted, Extractor, HtmlExtractor};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use page::Page;
pub use render::OutputFormat;
