// src/fetch.rs
// =============================================================================
// Fetching pages over HTTP.
//
// The crawler only talks to the Fetcher trait, so tests can swap the real
// network for an in-memory site. HttpFetcher is the reqwest-backed
// implementation used by the CLI.
//
// Failure modes are mapped onto FetchError:
// - 2xx            -> Ok(FetchedPage)
// - other statuses -> FetchError::Status(code)
// - timeouts       -> FetchError::Timeout
// - anything else  -> FetchError::Transport(message)
//
// Rust concepts:
// - async-trait: async fn in a trait object (dyn Fetcher)
// - Send + Sync: the fetcher is shared by every crawl task
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;

/// Browser-like User-Agent; some documentation hosts reject unknown clients
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// A successful response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs one GET request
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

/// Fetcher backed by a shared reqwest client (connection pooling)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(categorize_error)?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

// reqwest reports timeouts, connect failures, TLS problems etc. through one
// error type; only the timeout case gets its own variant
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(error.to_string())
    }
}
