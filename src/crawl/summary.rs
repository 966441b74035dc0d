//! Aggregate outcome of a crawl.

use std::collections::BTreeMap;

use log::info;
use serde::Serialize;

use crate::error_handling::ErrorKind;
use crate::fetch::FetchResult;
use crate::utils::TimerResult;

/// Counts computed once every domain has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// Number of results (deduplicated domains minus dropped ones)
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Domains dropped because remote exclusion was on and they redirected off-origin
    pub skipped_remote: usize,
    pub elapsed: TimerResult,
    /// Primary-page failures per category
    pub failures_by_kind: BTreeMap<ErrorKind, usize>,
}

impl CrawlSummary {
    pub fn from_results(results: &[FetchResult], skipped_remote: usize, elapsed: TimerResult) -> Self {
        let mut failures_by_kind = BTreeMap::new();
        for error in results.iter().filter_map(|r| r.error.as_ref()) {
            *failures_by_kind.entry(error.kind()).or_insert(0) += 1;
        }
        let failed = failures_by_kind.values().sum();

        Self {
            total: results.len(),
            successful: results.len() - failed,
            failed,
            skipped_remote,
            elapsed,
            failures_by_kind,
        }
    }

    pub fn log(&self) {
        info!(
            "finished scanning {} urls in {} seconds",
            self.total, self.elapsed.seconds
        );
        info!("{} successful, {} failed", self.successful, self.failed);
        if self.skipped_remote > 0 {
            info!("{} domains skipped as remote", self.skipped_remote);
        }
    }
}
