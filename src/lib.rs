//! vhost_probe library: crawl the virtual hosts of a web server through an
//! override IP.
//!
//! Typical use is validating a server before a DNS cutover: every hostname is
//! requested with its real Host header and SNI while the connection goes to
//! the new server's address. The certificate is re-checked against the
//! hostname, redirects may not leave the tested deployment, and each page's
//! static assets are fetched too.
//!
//! # Example
//!
//! ```no_run
//! use vhost_probe::{Crawler, CrawlerConfig, Domain};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CrawlerConfig {
//!     page_threads: 20,
//!     no_remote: true,
//!     ..Default::default()
//! };
//!
//! let domains = vec![
//!     Domain::parse("https://example.com/", "203.0.113.5")?,
//!     Domain::parse("https://shop.example.com/", "203.0.113.5")?,
//! ];
//!
//! let mut crawler = Crawler::new(config)?;
//! crawler.crawl(domains).await?;
//! if let Some(summary) = crawler.summary() {
//!     println!("{} succeeded, {} failed", summary.successful, summary.failed);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod crawl;
pub mod domain;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod parse;
pub mod tls;
pub mod utils;

// Re-export public API
pub use config::{CrawlerConfig, LogFormat, LogLevel, Opt};
pub use crawl::{CrawlState, CrawlSummary, Crawler};
pub use domain::{dedup_domains, is_remote, parse_manual_list, Domain, HostLookup, IpMap};
pub use error_handling::{ConfigurationError, ErrorKind, FetchError, ParseError};
pub use fetch::{FetchClient, FetchResult, Resource, Response};
pub use tls::{CertSummary, HostnameError, TlsSummary};
pub use utils::{Pool, Timer, TimerResult};
