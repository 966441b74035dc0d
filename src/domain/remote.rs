//! Remote classification of asset hosts.
//!
//! A host is "remote" when it is not served by the deployment under test.
//! DNS access sits behind `HostLookup` so classification can be exercised
//! without a live resolver.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use hickory_resolver::TokioAsyncResolver;

use super::IpMap;

/// Resolves a hostname to a single address.
pub trait HostLookup: Send + Sync {
    fn lookup_ip<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<IpAddr>>;
}

/// `HostLookup` backed by the shared hickory resolver.
#[derive(Clone)]
pub struct DnsLookup {
    resolver: Arc<TokioAsyncResolver>,
}

impl DnsLookup {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

impl HostLookup for DnsLookup {
    fn lookup_ip<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<IpAddr>> {
        Box::pin(async move {
            if let Ok(ip) = host.parse::<IpAddr>() {
                return Ok(ip);
            }
            let response = self.resolver.lookup_ip(host).await?;
            response
                .iter()
                .next()
                .ok_or_else(|| anyhow!("no addresses found for {host}"))
        })
    }
}

/// Whether `host` should be treated as a third party.
///
/// Hosts configured in `ip_map` are remote by definition (they are crawled
/// as their own domains). Other hosts are remote when they resolve to an
/// address that is not one of the IPs under test. Resolution failures count
/// as local so the resulting connection error is reported on the asset.
pub async fn is_remote(host: &str, ip_map: &IpMap, lookup: &dyn HostLookup) -> bool {
    if ip_map.contains_host(host) {
        return true;
    }

    match lookup.lookup_ip(host).await {
        Ok(ip) => !ip_map.is_target_ip(&ip),
        Err(e) => {
            log::debug!("Lookup of {host} failed, treating as local: {e}");
            false
        }
    }
}
