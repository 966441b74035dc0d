//! Shared state for one crawl.
//!
//! Groups everything the page and asset tasks need so they can be handed a
//! single `Arc` instead of a long argument list.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::CrawlerConfig;
use crate::domain::{HostLookup, IpMap};
use crate::error_handling::CrawlStats;
use crate::fetch::FetchClient;

pub(crate) struct CrawlContext {
    /// HTTP client (spoofing resolver and redirect policy over the crawl's IP map)
    pub client: FetchClient,
    /// Used to classify asset hosts when remote exclusion is on
    pub lookup: Arc<dyn HostLookup>,
    pub config: CrawlerConfig,
    pub stats: CrawlStats,
    /// Domains dropped because their redirect left the tested deployment
    pub skipped_remote: AtomicUsize,
    pub cancel: CancellationToken,
}

impl CrawlContext {
    pub fn ip_map(&self) -> &IpMap {
        self.client.ip_map()
    }
}
