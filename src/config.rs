// src/config.rs
// =============================================================================
// Crawl configuration.
//
// A CrawlConfig is built once before the crawl starts and only read after
// that. Every knob has a default taken from the CLI defaults, so library
// users only need to supply the seed URL:
//
//   let config = CrawlConfig::new("https://docs.example.com/")
//       .with_max_depth(2)
//       .with_delay(Duration::from_millis(500));
// =============================================================================

use std::time::Duration;

use crate::crawl::Canonicalization;
use crate::error::CrawlError;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_TOTAL_DEADLINE: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 5;

/// Immutable inputs of one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// URL the crawl starts from (depth 0)
    pub seed_url: String,
    /// Deepest link distance from the seed that is still fetched
    pub max_depth: usize,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// Politeness pause before every fetch
    pub delay: Duration,
    /// Wall-clock budget for the whole crawl
    pub total_deadline: Duration,
    /// Ceiling on simultaneously in-flight fetches
    pub max_concurrent_fetches: usize,
    /// How URLs are normalized for de-duplication
    pub canonicalization: Canonicalization,
}

impl CrawlConfig {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            delay: DEFAULT_DELAY,
            total_deadline: DEFAULT_TOTAL_DEADLINE,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            canonicalization: Canonicalization::default(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_total_deadline(mut self, deadline: Duration) -> Self {
        self.total_deadline = deadline;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    pub fn with_canonicalization(mut self, mode: Canonicalization) -> Self {
        self.canonicalization = mode;
        self
    }

    /// Rejects settings the crawler cannot run with.
    ///
    /// The seed URL itself is checked later by the crawler, which reports it
    /// as CrawlError::InvalidSeedUrl.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.max_concurrent_fetches == 0 {
            return Err(CrawlError::InvalidConfig(
                "max concurrent fetches must be greater than 0".to_string(),
            ));
        }
        if self.total_deadline.is_zero() {
            return Err(CrawlError::InvalidConfig(
                "total deadline must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CrawlError::InvalidConfig(
                "request timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
