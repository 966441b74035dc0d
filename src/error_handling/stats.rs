//! Failure statistics tracking.
//!
//! Thread-safe counters of fetch failures per `ErrorKind`, split between
//! primary pages and their assets. Shared across crawl tasks via `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorKind;

/// Which kind of fetch a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchScope {
    /// The primary page of a domain
    Page,
    /// A static asset discovered on a page
    Asset,
}

/// Thread-safe failure counters.
///
/// Every `ErrorKind` is initialized to zero on creation so increments never
/// need to allocate, and concurrent tasks only touch atomics.
pub struct CrawlStats {
    pages: HashMap<ErrorKind, AtomicUsize>,
    assets: HashMap<ErrorKind, AtomicUsize>,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        let mut pages = HashMap::new();
        let mut assets = HashMap::new();
        for kind in ErrorKind::iter() {
            pages.insert(kind, AtomicUsize::new(0));
            assets.insert(kind, AtomicUsize::new(0));
        }
        CrawlStats { pages, assets }
    }

    fn counters(&self, scope: FetchScope) -> &HashMap<ErrorKind, AtomicUsize> {
        match scope {
            FetchScope::Page => &self.pages,
            FetchScope::Asset => &self.assets,
        }
    }

    /// Records one failure of the given kind.
    pub fn record(&self, scope: FetchScope, kind: ErrorKind) {
        if let Some(counter) = self.counters(scope).get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to record failure {:?} which is not in the stats map. \
                 This indicates a bug in CrawlStats initialization.",
                kind
            );
        }
    }

    /// Returns the number of failures recorded for one kind.
    pub fn count(&self, scope: FetchScope, kind: ErrorKind) -> usize {
        self.counters(scope)
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total failures recorded for a scope.
    pub fn total(&self, scope: FetchScope) -> usize {
        ErrorKind::iter().map(|k| self.count(scope, k)).sum()
    }

    /// Non-zero counters for a scope, ordered by kind.
    pub fn snapshot(&self, scope: FetchScope) -> BTreeMap<ErrorKind, usize> {
        ErrorKind::iter()
            .filter_map(|k| {
                let count = self.count(scope, k);
                (count > 0).then_some((k, count))
            })
            .collect()
    }

    /// Logs the failure breakdown for pages and assets.
    pub fn log_breakdown(&self) {
        for (label, scope) in [("page", FetchScope::Page), ("asset", FetchScope::Asset)] {
            let snapshot = self.snapshot(scope);
            if snapshot.is_empty() {
                continue;
            }
            log::info!("{} failures:", label);
            for (kind, count) in snapshot {
                log::info!("  {:24} {}", kind.as_str(), count);
            }
        }
    }
}
