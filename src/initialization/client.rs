//! HTTP client initialization.
//!
//! This module builds the single `reqwest::Client` shared by every fetch of a
//! crawl, wired for host/IP spoofing and the crawl's redirect policy.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::CrawlerConfig;
use crate::domain::IpMap;
use crate::error_handling::ConfigurationError;
use crate::fetch::{redirect_policy, SpoofResolver};

/// Initializes the HTTP client for a crawl.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config (sent on every redirect hop too)
/// - Timeout from the config, bounding the GET and all its redirects
/// - A DNS resolver that routes configured hosts to their override IP
/// - The off-origin/hop-limit redirect policy over `ip_map`
/// - Certificate checks disabled in the transport and the peer certificate
///   exposed, so the hostname can be verified against the intended host
///
/// # Errors
///
/// Returns `ConfigurationError::HttpClient` if client creation fails.
pub fn init_client(
    config: &CrawlerConfig,
    ip_map: Arc<IpMap>,
) -> Result<reqwest::Client, ConfigurationError> {
    let client = ClientBuilder::new()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .dns_resolver(Arc::new(SpoofResolver::new(Arc::clone(&ip_map))))
        .redirect(redirect_policy(ip_map))
        .referer(true)
        .danger_accept_invalid_certs(true)
        .tls_info(true)
        .build()?;
    Ok(client)
}
