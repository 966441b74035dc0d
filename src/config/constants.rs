//! Configuration constants.
//!
//! This module defines the constants used throughout the crawler, including
//! timeouts, pool sizes, and limits applied to every request.

// Crawl defaults
/// Default number of domains fetched concurrently (page pool capacity)
pub const DEFAULT_PAGE_THREADS: usize = 10;
/// Default number of assets fetched concurrently for a single page
pub const DEFAULT_ASSET_THREADS: usize = 4;

// Network operation timeouts
/// Per-request timeout in seconds, covering the GET and every redirect hop
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// DNS query timeout in seconds (remote classification lookups)
pub const DNS_TIMEOUT_SECS: u64 = 3;

/// User-Agent sent on every request, including each redirect hop.
///
/// Some servers deny requests by user agent (or the lack of one), so the
/// crawler presents itself as a desktop browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Redirect handling
/// Maximum number of redirect hops followed before the fetch fails.
/// A fourth redirect is an error, never a success.
pub const MAX_REDIRECT_HOPS: usize = 3;

// Body handling
/// Chunk size used when streaming HTML bodies into the asset extractor
pub const BODY_READ_CHUNK_SIZE: usize = 8 * 1024;
