//! Error handling and failure statistics.
//!
//! This module provides:
//! - Error type definitions (`FetchError`, `ParseError`, `ConfigurationError`)
//! - The `ErrorKind` categorization used for reporting
//! - Thread-safe failure counters shared by crawl tasks
//!
//! Fetch failures are data: they are stored on the page or asset they
//! affected and never abort sibling work. Configuration errors are the only
//! errors that stop a crawl, and only before it starts.

mod stats;
mod types;

// Re-export public API
pub use stats::{CrawlStats, FetchScope};
pub use types::{ConfigurationError, ErrorKind, FetchError, InitializationError, ParseError};
