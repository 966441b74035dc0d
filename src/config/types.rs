//! Configuration types and CLI options.
//!
//! This module defines the crawler's configuration value object along with the
//! enums and structs used for command-line argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_ASSET_THREADS, DEFAULT_PAGE_THREADS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::error_handling::ConfigurationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Crawler configuration (no CLI dependencies).
///
/// An opaque value object handed to the crawler. It can be constructed
/// programmatically and adjusted with struct update syntax.
///
/// # Examples
///
/// ```no_run
/// use vhost_probe::CrawlerConfig;
/// use std::time::Duration;
///
/// let config = CrawlerConfig {
///     page_threads: 20,
///     no_remote: true,
///     delay: Duration::from_millis(250),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum number of domains fetched concurrently
    pub page_threads: usize,

    /// Maximum number of assets fetched concurrently for one page
    pub asset_threads: usize,

    /// Whether the static assets of each page are fetched too
    pub assets: bool,

    /// Skip assets (and drop off-origin domains) that resolve outside the tested deployment
    pub no_remote: bool,

    /// Downgrade certificate hostname mismatches to warnings
    pub allow_insecure: bool,

    /// Delay applied before each domain is crawled
    pub delay: Duration,

    /// Timeout bounding one GET including all of its redirects
    pub timeout: Duration,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_threads: DEFAULT_PAGE_THREADS,
            asset_threads: DEFAULT_ASSET_THREADS,
            assets: true,
            no_remote: false,
            allow_insecure: false,
            delay: Duration::ZERO,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Checks the configuration before a crawl starts.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a pool size or the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.page_threads == 0 {
            return Err(ConfigurationError::InvalidPoolSize {
                pool: "page",
                size: self.page_threads,
            });
        }
        if self.asset_threads == 0 {
            return Err(ConfigurationError::InvalidPoolSize {
                pool: "asset",
                size: self.asset_threads,
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout);
        }
        Ok(())
    }
}

/// Command-line options for the `vhost_probe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "vhost_probe",
    about = "Crawl virtual hosts through an override IP and report availability"
)]
pub struct Opt {
    /// File containing whitespace-separated entries: HOST[:IP][:PORT] or URL[:IP][:PORT] ("-" for stdin)
    pub file: PathBuf,

    /// Maximum number of domains crawled concurrently
    #[arg(long, default_value_t = DEFAULT_PAGE_THREADS)]
    pub threads: usize,

    /// Maximum number of assets fetched concurrently per page
    #[arg(long, default_value_t = DEFAULT_ASSET_THREADS)]
    pub asset_threads: usize,

    /// Only fetch the primary page of each domain
    #[arg(long)]
    pub no_assets: bool,

    /// Ignore assets and redirects that resolve outside the tested server
    #[arg(long)]
    pub no_remote: bool,

    /// Do not fail requests whose certificate does not match the hostname
    #[arg(long)]
    pub allow_insecure: bool,

    /// Delay in milliseconds before each domain is crawled
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Per-request timeout in seconds (covers all redirects)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl From<&Opt> for CrawlerConfig {
    fn from(opt: &Opt) -> Self {
        Self {
            page_threads: opt.threads,
            asset_threads: opt.asset_threads,
            assets: !opt.no_assets,
            no_remote: opt.no_remote,
            allow_insecure: opt.allow_insecure,
            delay: Duration::from_millis(opt.delay_ms),
            timeout: Duration::from_secs(opt.timeout),
            user_agent: opt.user_agent.clone(),
        }
    }
}
