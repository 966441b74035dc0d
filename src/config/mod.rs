//! Crawler configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, pool sizes, redirect limit, etc.)
//! - The `CrawlerConfig` value object consumed by the crawler
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{CrawlerConfig, LogFormat, LogLevel, Opt};
