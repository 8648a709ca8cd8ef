// src/crawl/frontier.rs
// =============================================================================
// The frontier controller: decides which URLs get visited and runs the crawl.
//
// How it works:
// 1. Parse the seed URL and remember its host (the base domain)
// 2. Start a deadline timer that cancels a shared CancellationToken
// 3. visit(seed, 0), where visit is:
//      - stop if past max depth, or if the URL was already claimed
//      - wait the politeness delay           (cancellable)
//      - take a dispatcher slot              (cancellable)
//      - fetch + extract                     (cancellable)
//      - record the page, give the slot back
//      - spawn visit(link, depth + 1) for every same-domain document link
//        and wait for all of those children before returning
// 4. Return whatever pages were collected when the seed's visit finishes
//
// Failures are local: a 404 or a body the extractor rejects ends that branch with a
// warning, and every other branch carries on. Hitting the deadline is not an
// error either; the pages gathered so far are the result.
//
// Each child visit is its own tokio task, so sibling branches really do run
// in parallel. Because every parent drains its JoinSet before returning,
// once the seed's task has finished no task is left running, and nothing
// can write to the results after crawl() hands them back.
//
// Rust concepts:
// - Arc<CrawlContext>: shared, read-mostly state for all tasks
// - BoxFuture: an async fn cannot call itself directly (its future type
//   would be infinitely large), so the recursion goes through a boxed future
// - JoinSet: a group of spawned tasks we can wait on together
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::dispatcher::Dispatcher;
use super::state::{ResultCollection, VisitedSet};
use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError, PageError};
use crate::extract::{Extracted, Extractor};
use crate::fetch::Fetcher;
use crate::links::{resolve_link, LinkFilter};
use crate::page::Page;

/// Crawls one site with the given fetcher and extractor
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
}

// Everything a visit task needs, shared through one Arc
struct CrawlContext {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    filter: LinkFilter,
    dispatcher: Dispatcher,
    visited: VisitedSet,
    results: ResultCollection,
    cancel: CancellationToken,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn Fetcher>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion or until the total deadline.
    ///
    /// Only an unusable seed URL or configuration is an error. Everything
    /// that goes wrong after the first request is logged and skipped.
    pub async fn crawl(&self) -> Result<Vec<Page>, CrawlError> {
        self.config.validate()?;
        let seed = parse_seed(&self.config.seed_url)?;
        // parse_seed guarantees a host
        let base_domain = seed.host_str().unwrap_or_default().to_string();

        info!(
            seed = %seed,
            base_domain = %base_domain,
            max_depth = self.config.max_depth,
            max_concurrent_fetches = self.config.max_concurrent_fetches,
            "starting crawl"
        );

        let ctx = Arc::new(CrawlContext {
            config: self.config.clone(),
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            filter: LinkFilter::new(base_domain),
            dispatcher: Dispatcher::new(self.config.max_concurrent_fetches),
            visited: VisitedSet::new(),
            results: ResultCollection::new(),
            cancel: CancellationToken::new(),
        });

        let mut root = tokio::spawn(visit(Arc::clone(&ctx), seed, 0));

        let deadline_reached = tokio::select! {
            joined = &mut root => {
                if let Err(e) = joined {
                    warn!(error = %e, "crawl task failed");
                }
                false
            }
            _ = tokio::time::sleep(self.config.total_deadline) => true,
        };

        if deadline_reached {
            info!(
                deadline_secs = self.config.total_deadline.as_secs_f64(),
                "crawl deadline reached, stopping"
            );
            ctx.cancel.cancel();
            // Tasks stop at their next suspension point; wait for all of
            // them so nothing writes to the results after we return
            if let Err(e) = root.await {
                warn!(error = %e, "crawl task failed");
            }
        }

        let pages = ctx.results.take();
        info!(pages = pages.len(), visited = ctx.visited.len(), "crawl finished");
        Ok(pages)
    }
}

// The seed must be an absolute http(s) URL with a host
fn parse_seed(raw: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidSeedUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }
    Ok(url)
}

fn visit(ctx: Arc<CrawlContext>, url: Url, depth: usize) -> BoxFuture<'static, ()> {
    async move {
        // Too deep, or the deadline already fired: nothing to do
        if depth > ctx.config.max_depth || ctx.cancel.is_cancelled() {
            return;
        }

        // Claim the URL. Only the first task to get here for a canonical URL
        // goes on to fetch it
        let url = ctx.config.canonicalization.apply(&url);
        if !ctx.visited.insert_if_absent(url.as_str()) {
            debug!(url = %url, "already visited");
            return;
        }

        info!(depth, url = %url, "crawling page");

        // Suspension point 1: the politeness delay
        if !ctx.config.delay.is_zero() {
            tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => return,
                _ = tokio::time::sleep(ctx.config.delay) => {}
            }
        }

        // Suspension point 2: waiting for a fetch slot
        let Ok(slot) = ctx.dispatcher.acquire(&ctx.cancel).await else {
            return;
        };

        // Suspension point 3: the fetch itself. Every exit below gives the
        // slot back before logging
        let extracted = match fetch_and_extract(&ctx, &url).await {
            Ok(extracted) => extracted,
            Err(PageError::Fetch(FetchError::Cancelled)) => {
                slot.release();
                debug!(url = %url, "fetch cancelled by deadline");
                return;
            }
            Err(e) => {
                slot.release();
                warn!(url = %url, error = %e, "skipping page");
                return;
            }
        };

        let Extracted { title, text, links } = extracted;
        debug!(url = %url, title = %title, text_bytes = text.len(), links = links.len(), "page extracted");

        ctx.results.push(Page::new(url.as_str(), title, text, depth));
        slot.release();

        // Children at max_depth + 1 would return immediately
        if depth >= ctx.config.max_depth {
            return;
        }

        // Spawn one task per followable link...
        let mut children = JoinSet::new();
        for href in &links {
            if ctx.cancel.is_cancelled() {
                break;
            }
            let Some(link) = resolve_link(&url, href) else {
                continue;
            };
            if !ctx.filter.allows(&link) {
                continue;
            }
            // Cheap pre-check; the child still claims the URL atomically
            if ctx.visited.contains(ctx.config.canonicalization.apply(&link).as_str()) {
                continue;
            }
            children.spawn(visit(Arc::clone(&ctx), link, depth + 1));
        }

        // ...and wait for every one of them before this visit counts as done
        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                warn!(parent = %url, error = %e, "crawl task failed");
            }
        }
    }
    .boxed()
}

// The fetch is raced against the deadline so a slow server cannot hold the
// crawl open past it
async fn fetch_and_extract(ctx: &CrawlContext, url: &Url) -> Result<Extracted, PageError> {
    let fetched = tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => Err(FetchError::Cancelled),
        result = ctx.fetcher.fetch(url, ctx.config.request_timeout) => result,
    };
    let fetched = fetched?;
    debug!(url = %url, status = fetched.status, body_bytes = fetched.body.len(), "page fetched");

    Ok(ctx.extractor.extract(&fetched.body)?)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does visit return BoxFuture instead of being an async fn?
//    - An async fn compiles to a state machine that contains the futures it
//      awaits. A visit that awaits visit would have to contain itself
//    - Boxing puts the child future on the heap, so the size is known
//    - .boxed() also requires Send + 'static, which tokio::spawn needs anyway
//
// 2. Why drain the JoinSet instead of just spawning?
//    - Dropping a JoinSet aborts its tasks, so it has to be awaited
//    - More importantly, the seed's visit only finishes when the whole tree
//      below it has finished. crawl() relies on that: once the root task is
//      joined, nobody can push to the results any more
//
// 3. Why `biased;` in the select! calls?
//    - Without it select! polls the branches in random order
//    - With cancellation listed first, a deadline that has already fired
//      always wins, even if the sleep or the fetch is ready at the same time
//
// 4. Why is the deadline a CancellationToken and not tokio::time::timeout?
//    - A timeout around crawl() would drop the root task's future, but the
//      spawned children would keep running in the background
//    - The token is cloned into every task and checked at every point where
//      a task can wait, so they all stop on their own
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::Canonicalization;
    use crate::error::ExtractError;
    use crate::extract::HtmlExtractor;
    use crate::fetch::FetchedPage;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    // In-memory site: path -> HTML body, or an HTTP error status
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, Result<Vec<u8>, u16>>,
        latency: Duration,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
        fetches: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn new() -> Self {
            Self::default()
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn page(mut self, url: &str, links: &[&str]) -> Self {
            let anchors: String = links.iter().map(|href| format!(r#"<a href="{href}">link</a>"#)).collect();
            let html = format!("<html><head><title>{url}</title></head><body><p>Text of {url}</p>{anchors}</body></html>");
            self.pages.insert(url.to_string(), Ok(html.into_bytes()));
            self
        }

        fn raw(mut self, url: &str, body: &[u8]) -> Self {
            self.pages.insert(url.to_string(), Ok(body.to_vec()));
            self
        }

        fn status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), Err(status));
            self
        }

        fn fetch_count(&self, url: &str) -> usize {
            self.fetches.lock().unwrap().iter().filter(|u| u.as_str() == url).count()
        }

        fn total_fetches(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Fetcher for FakeSite {
        async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<FetchedPage, FetchError> {
            self.fetches.lock().unwrap().push(url.to_string());
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let response = self.pages.get(url.as_str()).cloned();

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            match response {
                Some(Ok(body)) => Ok(FetchedPage { status: 200, body }),
                Some(Err(status)) => Err(FetchError::Status(status)),
                None => Err(FetchError::Status(404)),
            }
        }
    }

    // Never-ending site: /n links to /2n and /2n+1
    struct EndlessSite {
        latency: Duration,
    }

    #[async_trait]
    impl Fetcher for EndlessSite {
        async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<FetchedPage, FetchError> {
            tokio::time::sleep(self.latency).await;
            let n: u64 = url.path().trim_start_matches('/').parse().unwrap_or(1);
            let html = format!(
                r#"<html><body><p>page {n}</p><a href="/{}">a</a><a href="/{}">b</a></body></html>"#,
                n * 2,
                n * 2 + 1
            );
            Ok(FetchedPage { status: 200, body: html.into_bytes() })
        }
    }

    fn config(seed: &str, max_depth: usize) -> CrawlConfig {
        CrawlConfig::new(seed)
            .with_max_depth(max_depth)
            .with_delay(Duration::ZERO)
            .with_total_deadline(Duration::from_secs(10))
    }

    async fn run(site: Arc<FakeSite>, config: CrawlConfig) -> Vec<Page> {
        Crawler::new(config, site, Arc::new(HtmlExtractor)).crawl().await.unwrap()
    }

    fn depths(pages: &[Page]) -> HashMap<String, usize> {
        pages.iter().map(|p| (p.url.clone(), p.depth)).collect()
    }

    #[tokio::test]
    async fn test_follows_links_with_depths() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/a"])
                .page("https://x.test/a", &["/b", "/"])
                .page("https://x.test/b", &[]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/", 2)).await;

        assert_eq!(pages.len(), 3);
        let depths = depths(&pages);
        assert_eq!(depths["https://x.test/"], 0);
        assert_eq!(depths["https://x.test/a"], 1);
        assert_eq!(depths["https://x.test/b"], 2);
        assert_eq!(site.fetch_count("https://x.test/"), 1);
    }

    #[tokio::test]
    async fn test_other_domains_never_crawled() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["https://other.test/page", "/local"])
                .page("https://x.test/local", &[])
                .page("https://other.test/page", &[]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/", 3)).await;

        assert!(pages.iter().all(|p| Url::parse(&p.url).unwrap().host_str() == Some("x.test")));
        assert_eq!(pages.len(), 2);
        assert_eq!(site.fetch_count("https://other.test/page"), 0);
    }

    #[tokio::test]
    async fn test_max_depth_zero_fetches_only_seed() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/a", "/b"])
                .page("https://x.test/a", &[])
                .page("https://x.test/b", &[]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/", 0)).await;

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, "https://x.test/");
        assert_eq!(pages[0].depth, 0);
        assert_eq!(site.total_fetches(), 1);
    }

    #[tokio::test]
    async fn test_fragment_links_collapse_to_one_page() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/a#intro", "/a#usage", "/a"])
                .page("https://x.test/a", &["/#top"]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/#start", 3)).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(site.fetch_count("https://x.test/a"), 1);
        assert_eq!(site.fetch_count("https://x.test/"), 1);
        assert!(pages.iter().any(|p| p.url == "https://x.test/"));
    }

    #[tokio::test]
    async fn test_trailing_slash_variants_are_separate_by_default() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/docs", "/docs/"])
                .page("https://x.test/docs", &[])
                .page("https://x.test/docs/", &[]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/", 1)).await;
        assert_eq!(pages.len(), 3);

        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/docs", "/docs/"])
                .page("https://x.test/docs", &[]),
        );
        let trimmed = config("https://x.test/", 1).with_canonicalization(Canonicalization::TrimTrailingSlash);
        let pages = run(Arc::clone(&site), trimmed).await;
        assert_eq!(pages.len(), 2);
        assert_eq!(site.fetch_count("https://x.test/docs"), 1);
    }

    #[tokio::test]
    async fn test_failed_page_only_drops_its_branch() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/broken", "/ok", "/binary"])
                .status("https://x.test/broken", 500)
                .raw("https://x.test/binary", &[0xff, 0xfe, 0xfd])
                .page("https://x.test/ok", &["/deeper"])
                .page("https://x.test/deeper", &[]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/", 3)).await;

        let urls: HashSet<_> = pages.iter().map(|p| p.url.as_str()).collect();
        assert!(urls.contains("https://x.test/ok"));
        assert!(urls.contains("https://x.test/deeper"));
        assert!(!urls.contains("https://x.test/broken"));
        // garbage bytes still make a (mostly empty) page
        assert!(urls.contains("https://x.test/binary"));
        assert_eq!(site.fetch_count("https://x.test/broken"), 1);
    }

    #[tokio::test]
    async fn test_latin1_page_is_recorded_and_its_links_followed() {
        let site = Arc::new(
            FakeSite::new()
                .raw(
                    "https://x.test/",
                    b"<html><head><title>Caf\xE9</title></head><body><p>Men\xFC</p><a href=\"/child\">x</a></body></html>",
                )
                .page("https://x.test/child", &[]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/", 2)).await;

        let depths = depths(&pages);
        assert_eq!(pages.len(), 2);
        assert_eq!(depths["https://x.test/"], 0);
        assert_eq!(depths["https://x.test/child"], 1);
        assert_eq!(site.fetch_count("https://x.test/child"), 1);
        let seed = pages.iter().find(|p| p.url == "https://x.test/").unwrap();
        assert_eq!(seed.title, "Caf\u{FFFD}");
    }

    #[tokio::test]
    async fn test_empty_body_is_recorded_as_empty_page() {
        let site = Arc::new(FakeSite::new().page("https://x.test/", &["/empty"]).raw("https://x.test/empty", b""));

        let pages = run(Arc::clone(&site), config("https://x.test/", 1)).await;

        assert_eq!(pages.len(), 2);
        let empty = pages.iter().find(|p| p.url == "https://x.test/empty").unwrap();
        assert_eq!(empty.title, "");
        assert_eq!(empty.content, "");
        assert_eq!(empty.depth, 1);
    }

    // Rejects any body containing DO-NOT-PARSE, otherwise behaves like HtmlExtractor
    struct PickyExtractor;

    impl Extractor for PickyExtractor {
        fn extract(&self, body: &[u8]) -> Result<Extracted, ExtractError> {
            if String::from_utf8_lossy(body).contains("DO-NOT-PARSE") {
                return Err(ExtractError::Unparseable("rejected marker".to_string()));
            }
            HtmlExtractor.extract(body)
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_only_drops_its_branch() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/rejected", "/fine"])
                .raw("https://x.test/rejected", br#"<p>DO-NOT-PARSE</p><a href="/below">x</a>"#)
                .page("https://x.test/fine", &[])
                .page("https://x.test/below", &[]),
        );

        let pages = Crawler::new(config("https://x.test/", 3), Arc::clone(&site) as Arc<dyn Fetcher>, Arc::new(PickyExtractor))
            .crawl()
            .await
            .unwrap();

        let urls: HashSet<_> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, HashSet::from(["https://x.test/", "https://x.test/fine"]));
        assert_eq!(site.fetch_count("https://x.test/rejected"), 1);
        assert_eq!(site.fetch_count("https://x.test/below"), 0);
    }

    #[tokio::test]
    async fn test_non_document_links_skipped() {
        let site = Arc::new(
            FakeSite::new()
                .page("https://x.test/", &["/manual.pdf", "/bundle.zip", "/guide"])
                .page("https://x.test/guide", &[]),
        );

        let pages = run(Arc::clone(&site), config("https://x.test/", 2)).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(site.fetch_count("https://x.test/manual.pdf"), 0);
        assert_eq!(site.fetch_count("https://x.test/bundle.zip"), 0);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_fatal_before_any_fetch() {
        let site = Arc::new(FakeSite::new());

        for seed in ["not a url", "mailto:someone@x.test", "file:///etc/hosts"] {
            let result = Crawler::new(config(seed, 2), Arc::clone(&site) as Arc<dyn Fetcher>, Arc::new(HtmlExtractor))
                .crawl()
                .await;
            assert!(matches!(result, Err(CrawlError::InvalidSeedUrl { .. })), "seed {seed}");
        }
        assert_eq!(site.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_seed_returns_empty_result() {
        let site = Arc::new(FakeSite::new().status("https://x.test/", 503));
        let pages = run(site, config("https://x.test/", 2)).await;
        assert!(pages.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_densely_linked_site_visits_each_page_once() {
        let paths: Vec<String> = (0..25).map(|i| format!("/p{i}")).collect();
        let hrefs: Vec<&str> = paths.iter().map(String::as_str).collect();

        let mut site = FakeSite::new().with_latency(Duration::from_millis(2)).page("https://x.test/", &hrefs);
        for path in &paths {
            site = site.page(&format!("https://x.test{path}"), &hrefs);
        }
        let site = Arc::new(site);

        let pages = run(Arc::clone(&site), config("https://x.test/", 3).with_max_concurrent_fetches(8)).await;

        assert_eq!(pages.len(), 26);
        let unique: HashSet<_> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(unique.len(), pages.len());
        for path in &paths {
            assert_eq!(site.fetch_count(&format!("https://x.test{path}")), 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_fetches_never_exceed_limit() {
        let paths: Vec<String> = (0..30).map(|i| format!("/wide{i}")).collect();
        let hrefs: Vec<&str> = paths.iter().map(String::as_str).collect();

        let mut site = FakeSite::new().with_latency(Duration::from_millis(15)).page("https://x.test/", &hrefs);
        for path in &paths {
            site = site.page(&format!("https://x.test{path}"), &[]);
        }
        let site = Arc::new(site);

        let pages = run(Arc::clone(&site), config("https://x.test/", 1).with_max_concurrent_fetches(3)).await;

        assert_eq!(pages.len(), 31);
        let peak = site.peak_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak in-flight fetches was {peak}");
        assert!(peak >= 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_deadline_returns_partial_results() {
        let deadline = Duration::from_millis(300);
        let config = CrawlConfig::new("https://x.test/1")
            .with_max_depth(1_000)
            .with_delay(Duration::from_millis(5))
            .with_max_concurrent_fetches(4)
            .with_total_deadline(deadline);
        let fetcher = Arc::new(EndlessSite {
            latency: Duration::from_millis(20),
        });

        let started = Instant::now();
        let pages = Crawler::new(config, fetcher, Arc::new(HtmlExtractor)).crawl().await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed < deadline + Duration::from_secs(1), "crawl took {elapsed:?}");
        assert!(!pages.is_empty());
        assert!(pages.iter().any(|p| p.depth == 0));
    }

    #[tokio::test]
    async fn test_slow_fetch_is_cut_off_by_deadline() {
        let site = Arc::new(
            FakeSite::new()
                .with_latency(Duration::from_secs(30))
                .page("https://x.test/", &[]),
        );
        let config = config("https://x.test/", 1).with_total_deadline(Duration::from_millis(100));

        let started = Instant::now();
        let pages = run(site, config).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_during_politeness_delay() {
        let site = Arc::new(FakeSite::new().page("https://x.test/", &[]));
        let config = config("https://x.test/", 1)
            .with_delay(Duration::from_secs(30))
            .with_total_deadline(Duration::from_millis(100));

        let started = Instant::now();
        let pages = run(Arc::clone(&site), config).await;

        assert!(started.elapsed() < Duration::from_secs(2), "crawl took {:?}", started.elapsed());
        assert!(pages.is_empty());
        assert_eq!(site.total_fetches(), 0);
    }

    #[test]
    fn test_parse_seed() {
        assert!(parse_seed("https://x.test/docs").is_ok());
        assert!(parse_seed("  https://x.test/  ").is_ok());
        assert!(parse_seed("/relative/path").is_err());
        assert!(parse_seed("ftp://x.test/").is_err());
    }

    // Random site graph: node i lives at /n{i} and links to the listed nodes.
    // Node 0 is the seed.
    fn graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
        (1usize..12).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(0..n, 0..5), n))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn crawl_respects_depth_domain_and_uniqueness(graph in graph_strategy(), max_depth in 0usize..4) {
            let mut site = FakeSite::new();
            for (i, edges) in graph.iter().enumerate() {
                let mut hrefs: Vec<String> = edges.iter().map(|j| format!("/n{j}")).collect();
                hrefs.push("https://elsewhere.test/n0".to_string());
                let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
                site = site.page(&format!("https://x.test/n{i}"), &hrefs);
            }
            let site = Arc::new(site);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            let pages = runtime.block_on(run(Arc::clone(&site), config("https://x.test/n0", max_depth)));

            let unique: HashSet<_> = pages.iter().map(|p| p.url.clone()).collect();
            prop_assert_eq!(unique.len(), pages.len());
            prop_assert!(pages.iter().all(|p| p.depth <= max_depth));
            prop_assert!(pages.iter().all(|p| p.url.starts_with("https://x.test/")));
            prop_assert!(pages.iter().any(|p| p.url == "https://x.test/n0" && p.depth == 0));
            prop_assert!(pages.iter().all(|p| site.fetch_count(&p.url) == 1));
        }
    }
}
