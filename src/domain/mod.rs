//! Domains under test and host/IP bookkeeping.
//!
//! This module provides:
//! - `Domain`: one URL to test plus an optional override IP
//! - Deduplication of the input list by `(URL, IP)`
//! - Parsing of manually supplied domain lists (`HOST[:IP][:PORT]`)
//! - `IpMap`: host → intended IP, built once per crawl
//! - Remote classification of asset hosts behind the `HostLookup` seam

mod ipmap;
mod manual;
mod remote;

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use url::{Host, Url};

use crate::error_handling::ParseError;

pub use ipmap::IpMap;
pub use manual::parse_manual_list;
pub use remote::{is_remote, DnsLookup, HostLookup};

/// A URL to test and the address to reach it through.
///
/// `url` always carries a scheme and host. An empty `ip` means the host is
/// resolved through normal DNS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Domain {
    pub url: Url,
    pub ip: String,
}

impl Domain {
    pub fn new(url: Url, ip: impl Into<String>) -> Self {
        Self {
            url,
            ip: ip.into(),
        }
    }

    /// Parses a URL string into a `Domain`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::DomainEntry` if the URL is invalid, is not
    /// http/https, or has no host.
    pub fn parse(url: &str, ip: &str) -> Result<Self, ParseError> {
        let parsed =
            Url::parse(url).map_err(|e| ParseError::DomainEntry(format!("{url}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ParseError::DomainEntry(format!(
                "{url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }
        if host_key(&parsed).is_none() {
            return Err(ParseError::DomainEntry(format!("{url}: missing host")));
        }
        Ok(Self::new(parsed, ip))
    }

    /// The host of the URL as used for `IpMap` lookups.
    pub fn host(&self) -> Option<String> {
        host_key(&self.url)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<[Domain] url:{:?} ip:{:?}>", self.url.as_str(), self.ip)
    }
}

/// Normalized host of a URL: lowercase, without IPv6 brackets or port.
pub fn host_key(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(name) => Some(name.to_ascii_lowercase()),
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Whether the URL's host is an IP literal rather than a name.
pub fn is_ip_host(url: &Url) -> bool {
    matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)))
}

/// Removes entries with the same `(URL, IP)` pair, keeping first occurrences
/// in their original order.
pub fn dedup_domains(domains: Vec<Domain>) -> Vec<Domain> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    domains
        .into_iter()
        .filter(|d| seen.insert((d.url.as_str().to_string(), d.ip.clone())))
        .collect()
}

#[cfg(test)]
mod tests;
