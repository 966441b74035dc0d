//! Host → IP map for one crawl.

use std::collections::HashMap;
use std::net::IpAddr;

use super::Domain;

/// Maps every configured host to its intended IP.
///
/// Each domain contributes three spellings of its host (as given, without
/// `www.`, with `www.`). An empty IP means the host is reached through
/// normal DNS. Built once per crawl and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpMap {
    hosts: HashMap<String, String>,
}

impl IpMap {
    pub fn build(domains: &[Domain]) -> Self {
        let mut hosts = HashMap::new();
        for domain in domains {
            let Some(host) = domain.host() else {
                continue;
            };
            let bare = host.strip_prefix("www.").unwrap_or(&host).to_string();
            hosts.insert(format!("www.{bare}"), domain.ip.clone());
            hosts.insert(bare, domain.ip.clone());
            hosts.insert(host, domain.ip.clone());
        }
        Self { hosts }
    }

    /// The IP configured for `host` (possibly empty), if the host is known.
    pub fn get(&self, host: &str) -> Option<&str> {
        self.hosts.get(host).map(String::as_str)
    }

    /// Whether `host` is one of the explicitly configured hosts.
    pub fn contains_host(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    /// The override IP for `host`, if one is configured and non-empty.
    pub fn override_ip(&self, host: &str) -> Option<&str> {
        self.get(host).filter(|ip| !ip.is_empty())
    }

    /// Whether `addr` is one of the IPs under test.
    ///
    /// Addresses are compared parsed, so `::0001` and `::1` are the same IP.
    pub fn is_target_ip(&self, addr: &IpAddr) -> bool {
        self.hosts
            .values()
            .filter_map(|ip| ip.parse::<IpAddr>().ok())
            .any(|ip| ip == *addr)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
