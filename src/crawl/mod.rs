// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Concurrent crawling: every discovered link is its own task
// - Same-domain restriction (doesn't crawl external sites)
// - Configurable depth limit
// - A fixed ceiling on simultaneous fetches
// - Polite crawling with a delay before each request
// - A total deadline after which the crawl returns what it has
//
// Submodules:
// - frontier: the Crawler and its recursive visit
// - dispatcher: the pool of fetch slots
// - state: visited set and collected pages
// - canonical: the de-duplication key for URLs
// =============================================================================

mod canonical;
mod dispatcher;
mod frontier;
mod state;

pub use canonical::Canonicalization;
pub use dispatcher::{Dispatcher, Slot};
pub use frontier::Crawler;
