//! Connection-target override for reqwest.
//!
//! Implements `reqwest::dns::Resolve` so that hosts configured with an
//! override IP connect to that IP. The request URL is left untouched, so the
//! Host header and TLS SNI keep the real hostname. Every other host goes to
//! the system resolver.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};

use crate::domain::IpMap;

#[derive(Debug, Clone)]
pub struct SpoofResolver {
    ip_map: Arc<IpMap>,
}

impl SpoofResolver {
    pub fn new(ip_map: Arc<IpMap>) -> Self {
        Self { ip_map }
    }
}

impl Resolve for SpoofResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let ip_map = Arc::clone(&self.ip_map);
        Box::pin(async move {
            let host = name.as_str().to_ascii_lowercase();

            if let Some(ip) = ip_map.override_ip(&host) {
                let addr: IpAddr = ip.parse().map_err(
                    |e: std::net::AddrParseError| -> Box<dyn std::error::Error + Send + Sync> {
                        Box::new(e)
                    },
                )?;
                log::trace!("Connecting {host} through override IP {addr}");
                let addrs: Addrs = Box::new(std::iter::once(SocketAddr::new(addr, 0)));
                return Ok(addrs);
            }

            let lookup = format!("{host}:0");
            let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&lookup)
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?
                .collect();

            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok(addrs)
        })
    }
}
