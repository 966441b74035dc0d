//! Crawl orchestration.
//!
//! A `Crawler` takes a list of domains, deduplicates it, builds the crawl's
//! `IpMap` and fetches every domain through a page pool. Each page fetch
//! then fetches its assets through its own, smaller asset pool.
//!
//! Page tasks send their `FetchResult` over a channel; the orchestrator
//! drains it once the page pool has drained. Results are unordered.

mod context;
mod page;
mod resource;
mod summary;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::CrawlerConfig;
use crate::domain::{dedup_domains, DnsLookup, Domain, HostLookup, IpMap};
use crate::error_handling::{
    ConfigurationError, CrawlStats, FetchError, FetchScope, InitializationError,
};
use crate::fetch::{FetchClient, FetchResult};
use crate::initialization::init_resolver;
use crate::utils::{Pool, Timer};

use context::CrawlContext;
use page::fetch_page;

pub use summary::CrawlSummary;

/// Lifecycle of a `Crawler`. A crawler runs exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrawlState {
    Idle,
    Running,
    Done,
}

/// Concurrent crawler over a list of domains.
///
/// # Examples
///
/// ```no_run
/// use vhost_probe::{Crawler, CrawlerConfig, Domain};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let mut crawler = Crawler::new(CrawlerConfig::default())?;
/// let domains = vec![Domain::parse("https://example.com/", "203.0.113.5")?];
/// for result in crawler.crawl(domains).await? {
///     println!("{result}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    config: CrawlerConfig,
    lookup: Arc<dyn HostLookup>,
    state: CrawlState,
    results: Vec<FetchResult>,
    summary: Option<CrawlSummary>,
}

impl Crawler {
    /// Creates a crawler that classifies remote hosts through DNS.
    ///
    /// # Errors
    ///
    /// Returns an `InitializationError` if the DNS resolver cannot be set up.
    pub fn new(config: CrawlerConfig) -> Result<Self, InitializationError> {
        let resolver = init_resolver()?;
        Ok(Self::with_lookup(config, Arc::new(DnsLookup::new(resolver))))
    }

    /// Creates a crawler with a custom host lookup.
    pub fn with_lookup(config: CrawlerConfig, lookup: Arc<dyn HostLookup>) -> Self {
        Self {
            config,
            lookup,
            state: CrawlState::Idle,
            results: Vec::new(),
            summary: None,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Results of the finished crawl, in completion order.
    pub fn results(&self) -> &[FetchResult] {
        &self.results
    }

    /// The result for a `(URL, IP)` pair, if that domain was crawled.
    pub fn get_result(&self, url: &str, ip: &str) -> Option<&FetchResult> {
        self.results
            .iter()
            .find(|r| r.request.url.as_str() == url && r.request.ip == ip)
    }

    pub fn summary(&self) -> Option<&CrawlSummary> {
        self.summary.as_ref()
    }

    pub fn into_results(self) -> Vec<FetchResult> {
        self.results
    }

    /// Crawls every domain and waits for all pages and assets to finish.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` before any request is made if the
    /// configuration is invalid, the HTTP client cannot be built, or the
    /// crawler has already been used.
    pub async fn crawl(&mut self, domains: Vec<Domain>) -> Result<&[FetchResult], ConfigurationError> {
        self.crawl_with_cancel(domains, CancellationToken::new())
            .await
    }

    /// Like `crawl`, but every pending and in-flight fetch ends with
    /// `FetchError::Cancelled` once `cancel` fires.
    ///
    /// # Errors
    ///
    /// Same as `crawl`.
    pub async fn crawl_with_cancel(
        &mut self,
        domains: Vec<Domain>,
        cancel: CancellationToken,
    ) -> Result<&[FetchResult], ConfigurationError> {
        if self.state != CrawlState::Idle {
            return Err(ConfigurationError::AlreadyStarted);
        }
        self.config.validate()?;

        let timer = Timer::start();
        let domains = dedup_domains(domains);
        let ip_map = Arc::new(IpMap::build(&domains));
        let client = FetchClient::new(&self.config, ip_map)?;

        self.state = CrawlState::Running;

        let ctx = Arc::new(CrawlContext {
            client,
            lookup: Arc::clone(&self.lookup),
            config: self.config.clone(),
            stats: CrawlStats::new(),
            skipped_remote: AtomicUsize::new(0),
            cancel,
        });

        let pool = Pool::new(self.config.page_threads);
        let (tx, mut rx) = mpsc::unbounded_channel();

        for domain in domains {
            let slot = pool.slot().await;
            let ctx = Arc::clone(&ctx);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(result) = crawl_domain(&ctx, domain).await {
                    // The receiver lives until every sender is gone.
                    let _ = tx.send(result);
                }
                slot.free();
            });
        }
        drop(tx);

        pool.wait().await;

        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        let summary = CrawlSummary::from_results(
            &results,
            ctx.skipped_remote.load(Ordering::SeqCst),
            timer.end(),
        );
        summary.log();
        ctx.stats.log_breakdown();

        self.results = results;
        self.summary = Some(summary);
        self.state = CrawlState::Done;
        Ok(&self.results)
    }
}

/// Runs one domain inside a page slot.
///
/// Returns `None` when the domain is dropped by remote exclusion.
async fn crawl_domain(ctx: &Arc<CrawlContext>, domain: Domain) -> Option<FetchResult> {
    if !ctx.config.delay.is_zero() {
        info!(
            "delaying {:?} before starting crawl on {}",
            ctx.config.delay, domain
        );
        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {}
            _ = tokio::time::sleep(ctx.config.delay) => {}
        }
    }

    let result = fetch_page(ctx, domain).await;

    match &result.error {
        Some(e @ FetchError::OffOriginRedirect { .. }) if ctx.config.no_remote => {
            info!(
                "skipping {} as skip remote was used (error: {})",
                result.request, e
            );
            ctx.skipped_remote.fetch_add(1, Ordering::SeqCst);
            return None;
        }
        Some(e) => {
            ctx.stats.record(FetchScope::Page, e.kind());
            warn!("error scanning {} (error: {})", result.request, e);
        }
        None => {
            let total = result.total_time.map(|t| t.milli).unwrap_or_default();
            info!("finished scanning {} ({}ms)", result.request, total);
        }
    }

    Some(result)
}
