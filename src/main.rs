// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Install logging (RUST_LOG controls verbosity, logs go to stderr)
// 2. Parse command-line arguments using clap
// 3. Crawl the site
// 4. Write the pages to the output document
// 5. Exit with proper code (0 = success, 1 = no pages crawled, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use docrawl::{render, Crawler, HtmlExtractor, HttpFetcher};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrawl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = document written
//   Ok(1) = the crawl finished without a single page
//   Err   = bad arguments, bad seed URL, or the document could not be written
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.crawl_config()?;

    println!("🔍 Crawling: {}", config.seed_url);
    println!("📊 Max depth: {}, concurrency: {}", config.max_depth, config.max_concurrent_fetches);

    let fetcher = HttpFetcher::new().context("failed to create HTTP client")?;
    let crawler = Crawler::new(config, Arc::new(fetcher), Arc::new(HtmlExtractor));
    let pages = crawler.crawl().await.context("crawl failed")?;

    println!("📄 Crawled {} page(s)", pages.len());

    if pages.is_empty() {
        println!("⚠️  No pages could be crawled, nothing written");
        return Ok(1);
    }

    let written = render::render(&pages, &crawler.config().seed_url, &cli.output, cli.format)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("✅ Wrote {}", written.display());
    Ok(0)
}
