//! HTTP fetching with host/IP spoofing.
//!
//! This module provides:
//! - `FetchClient`: one logical GET against a crawl's `IpMap`
//! - Redirect policy (hop limit, off-origin guard)
//! - Connection-target override through a custom DNS resolver
//! - `Response`/`Resource`/`FetchResult` records
//! - Body reading (kept for pages, counted and discarded for assets)
//!
//! Requests to hosts with an override IP connect to that IP while the URL,
//! Host header and SNI keep the real hostname. The transport accepts any
//! certificate; the leaf is then checked against the effective hostname here.

mod body;
mod record;
mod redirects;
mod resolver;

use std::error::Error as StdError;
use std::net::IpAddr;
use std::sync::Arc;

use reqwest::tls::TlsInfo;
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::config::CrawlerConfig;
use crate::domain::{host_key, IpMap};
use crate::error_handling::{ConfigurationError, FetchError};
use crate::initialization::init_client;
use crate::tls::{verify_hostname, TlsSummary};
use crate::utils::{Timer, TimerResult};

pub use body::{count_body, read_body};
pub use record::{collect_headers, display_url, FetchResult, Resource, Response};
pub use redirects::{check_redirect, redirect_policy, RedirectError};
pub use resolver::SpoofResolver;

/// A response whose headers have arrived; the body is still unread.
#[derive(Debug)]
pub struct FetchedResponse {
    pub response: reqwest::Response,
    /// Effective URL after redirects
    pub url: Url,
    /// Time spent on the request and its redirects
    pub time: TimerResult,
    pub tls: Option<TlsSummary>,
}

/// Shared HTTP client for one crawl.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    ip_map: Arc<IpMap>,
    allow_insecure: bool,
}

impl FetchClient {
    /// Builds the client for a crawl over `ip_map`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::HttpClient` if the underlying client
    /// cannot be constructed.
    pub fn new(config: &CrawlerConfig, ip_map: Arc<IpMap>) -> Result<Self, ConfigurationError> {
        let client = init_client(config, Arc::clone(&ip_map))?;
        Ok(Self {
            client,
            ip_map,
            allow_insecure: config.allow_insecure,
        })
    }

    pub fn ip_map(&self) -> &IpMap {
        &self.ip_map
    }

    /// Performs one GET (following allowed redirects) for `url`.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the URL has no host, the override IP is
    /// malformed, the request fails or times out, a redirect is rejected, the
    /// certificate does not cover the effective hostname (unless insecure
    /// TLS is allowed), or `cancel` fires first.
    pub async fn get(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedResponse, FetchError> {
        let host = host_key(url).ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;

        if let Some(ip) = self.ip_map.override_ip(&host) {
            if ip.parse::<IpAddr>().is_err() {
                return Err(FetchError::InvalidOverrideIp {
                    host,
                    ip: ip.to_string(),
                });
            }
        }

        let timer = Timer::start();
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            sent = self.client.get(url.clone()).send() => sent,
        };
        let time = timer.end();

        let response = sent.map_err(classify_error)?;
        let effective = response.url().clone();

        let peer = response
            .extensions()
            .get::<TlsInfo>()
            .and_then(TlsInfo::peer_certificate);
        let tls = match peer {
            Some(der) => TlsSummary::from_leaf_der(der)
                .map_err(|e| FetchError::Tls(format!("unparseable certificate: {e}"))),
            None => Err(FetchError::Tls("no peer certificate".to_string())),
        };
        let tls = verify_certificate(&effective, tls, self.allow_insecure)?;

        Ok(FetchedResponse {
            response,
            url: effective,
            time,
            tls,
        })
    }
}

/// Checks the certificate of an HTTPS response against the effective hostname.
///
/// Plain HTTP responses pass through. Over HTTPS, a missing or unparseable
/// leaf is an error just like a hostname mismatch. With `allow_insecure`
/// every certificate error is logged and the response accepted.
///
/// # Errors
///
/// Returns `FetchError::TlsHostnameMismatch` or `FetchError::Tls`.
pub fn verify_certificate(
    effective: &Url,
    tls: Result<TlsSummary, FetchError>,
    allow_insecure: bool,
) -> Result<Option<TlsSummary>, FetchError> {
    if effective.scheme() != "https" {
        return Ok(tls.ok());
    }
    let host = host_key(effective).ok_or_else(|| FetchError::InvalidUrl(effective.to_string()))?;

    let (summary, checked) = match tls {
        Ok(summary) => {
            let checked = match summary.leaf() {
                Some(leaf) => verify_hostname(leaf, &host).map_err(FetchError::from),
                None => Err(FetchError::Tls("no peer certificate".to_string())),
            };
            (Some(summary), checked)
        }
        Err(e) => (None, Err(e)),
    };

    match checked {
        Ok(()) => Ok(summary),
        Err(e) if allow_insecure => {
            log::warn!("Ignoring certificate error for {effective}: {e}");
            Ok(summary)
        }
        Err(e) => Err(e),
    }
}

/// Maps a transport error onto the fetch error taxonomy.
pub fn classify_error(err: reqwest::Error) -> FetchError {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(redirect) = cause.downcast_ref::<RedirectError>() {
            return redirect.clone().into();
        }
        source = cause.source();
    }

    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Connect(error_chain(&err))
    } else if err.is_body() || err.is_decode() {
        FetchError::Body(error_chain(&err))
    } else {
        FetchError::Request(error_chain(&err))
    }
}

/// Renders an error and its causes as `outer: inner: root`.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests;
