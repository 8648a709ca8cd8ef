// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below IS the CLI definition, and
// clap generates the parsing, --help and --version output from it.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use docrawl::{Canonicalization, CrawlConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "docrawl",
    version,
    about = "Crawl a documentation site and save its text as a single document",
    long_about = "docrawl crawls every page of a documentation site reachable from a start URL \
                  (same host only, up to a depth limit) and writes the extracted text to one \
                  text or JSON file."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://docs.example.com/)
    #[arg(short = 'u', long = "url")]
    pub url: String,

    /// Output file path; the extension is fixed up to match --format
    #[arg(short = 'o', long = "output", default_value = "output.txt")]
    pub output: PathBuf,

    /// Maximum crawl depth (0 = only the start page)
    #[arg(short = 'd', long = "depth", default_value_t = 3)]
    pub depth: usize,

    /// Timeout for each request, in seconds
    #[arg(short = 't', long = "timeout", default_value_t = 30)]
    pub timeout: u64,

    /// Pause before each request, in seconds (fractions allowed)
    #[arg(short = 'w', long = "delay", default_value_t = 2.0)]
    pub delay: f64,

    /// Total time budget for the crawl, in seconds
    #[arg(short = 'T', long = "total-time", default_value_t = 300)]
    pub total_time: u64,

    /// Maximum number of requests in flight at once
    #[arg(short = 'c', long = "concurrency", default_value_t = 5)]
    pub concurrency: usize,

    /// Output format (pdf writes the text document)
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Txt)]
    pub format: OutputFormat,

    /// Treat "/docs" and "/docs/" as the same page
    #[arg(long)]
    pub trim_trailing_slash: bool,
}

impl Cli {
    /// Builds the crawl configuration from the parsed flags
    pub fn crawl_config(&self) -> anyhow::Result<CrawlConfig> {
        let delay = Duration::try_from_secs_f64(self.delay)
            .map_err(|e| anyhow::anyhow!("invalid --delay {}: {}", self.delay, e))?;

        let canonicalization = if self.trim_trailing_slash {
            Canonicalization::TrimTrailingSlash
        } else {
            Canonicalization::FragmentOnly
        };

        Ok(CrawlConfig::new(self.url.clone())
            .with_max_depth(self.depth)
            .with_request_timeout(Duration::from_secs(self.timeout))
            .with_delay(delay)
            .with_total_deadline(Duration::from_secs(self.total_time))
            .with_max_concurrent_fetches(self.concurrency)
            .with_canonicalization(canonicalization))
    }
}
