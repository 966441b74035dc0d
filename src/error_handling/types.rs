//! Error type definitions.
//!
//! This module defines every error produced by the crawler:
//! - `FetchError`: recorded as data on the page or asset it affected
//! - `ParseError`: logged, the offending input is skipped
//! - `ConfigurationError`: fatal, surfaced once before a crawl starts
//! - `InitializationError`: logger and resolver setup failures

use log::SetLoggerError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::tls::HostnameError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Errors that abort a crawl before any fetch starts.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A worker pool was configured without any capacity.
    #[error("invalid {pool} pool size {size}: must be at least 1")]
    InvalidPoolSize {
        /// Which pool ("page" or "asset")
        pool: &'static str,
        /// The rejected size
        size: usize,
    },

    /// The request timeout was zero.
    #[error("invalid request timeout: must be greater than zero")]
    InvalidTimeout,

    /// The HTTP client could not be constructed.
    #[error("HTTP client initialization error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// `crawl()` was called on a crawler that already left the idle state.
    #[error("crawler has already been started")]
    AlreadyStarted,
}

/// Errors raised while parsing input or page content.
///
/// These are never fatal: the offending asset or entry is logged and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An extracted asset reference could not be turned into a URL.
    #[error("unable to parse asset uri [{raw}]: {reason}")]
    AssetUrl {
        /// The raw value after resolution against the page
        raw: String,
        /// Why parsing failed
        reason: String,
    },

    /// The HTML stream could not be tokenized.
    #[error("unable to scan html: {0}")]
    Html(String),

    /// A manually supplied domain entry was malformed.
    #[error("invalid domain manually provided: {0}")]
    DomainEntry(String),
}

/// Failure of a single GET (page or asset).
///
/// Stored on `FetchResult::error` / `Resource::error`. Never retried, and
/// terminal only for the unit it is attached to.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// The URL to fetch has no usable host.
    #[error("invalid uri: {0}")]
    InvalidUrl(String),

    /// The override IP configured for the host is not an IP address.
    #[error("IP address provided is invalid: {ip} (host: {host})")]
    InvalidOverrideIp {
        /// Host the override was configured for
        host: String,
        /// The rejected value
        ip: String,
    },

    /// DNS or TCP/TLS connection failure.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The GET and its redirects did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// More redirects than `MAX_REDIRECT_HOPS` were issued.
    #[error("too many redirects ({limit})")]
    TooManyRedirects {
        /// The redirect limit that was exceeded
        limit: usize,
    },

    /// A redirect tried to leave the hosts and IPs under test.
    #[error("redirection does not match origin host ({from} -> {to})")]
    OffOriginRedirect {
        /// Host of the original request
        from: String,
        /// Host the redirect pointed at
        to: String,
    },

    /// The served certificate does not cover the intended hostname.
    #[error(transparent)]
    TlsHostnameMismatch(#[from] HostnameError),

    /// An HTTPS response without a certificate that could be checked.
    #[error("unable to verify certificate: {0}")]
    Tls(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The crawl was cancelled before this fetch completed.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Returns the category used for statistics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            FetchError::InvalidOverrideIp { .. } => ErrorKind::InvalidOverrideIp,
            FetchError::Connect(_) => ErrorKind::Connect,
            FetchError::Timeout => ErrorKind::Timeout,
            FetchError::TooManyRedirects { .. } => ErrorKind::TooManyRedirects,
            FetchError::OffOriginRedirect { .. } => ErrorKind::OffOriginRedirect,
            FetchError::TlsHostnameMismatch(_) => ErrorKind::TlsHostnameMismatch,
            FetchError::Tls(_) => ErrorKind::Tls,
            FetchError::Body(_) => ErrorKind::Body,
            FetchError::Request(_) => ErrorKind::Request,
            FetchError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Categories of fetch failures, one per `FetchError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    InvalidOverrideIp,
    Connect,
    Timeout,
    TooManyRedirects,
    OffOriginRedirect,
    TlsHostnameMismatch,
    Tls,
    Body,
    Request,
    Cancelled,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "Invalid URL",
            ErrorKind::InvalidOverrideIp => "Invalid override IP",
            ErrorKind::Connect => "Connection error",
            ErrorKind::Timeout => "Request timeout",
            ErrorKind::TooManyRedirects => "Too many redirects",
            ErrorKind::OffOriginRedirect => "Off-origin redirect",
            ErrorKind::TlsHostnameMismatch => "TLS hostname mismatch",
            ErrorKind::Tls => "TLS certificate unverifiable",
            ErrorKind::Body => "Body read error",
            ErrorKind::Request => "Request error",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}
