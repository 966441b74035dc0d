//! Certificate hostname verification.
//!
//! Requests may connect to an override IP instead of the address the public
//! hostname resolves to, so the served certificate is checked here against the
//! hostname the request was meant for. Matching follows RFC 6125 as applied by
//! browsers: IP hosts only match IP SANs; DNS hosts match DNS SANs, and the
//! subject common name only when the certificate has no DNS SANs.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

use super::CertSummary;

/// A certificate that is not valid for the host it was served for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostnameError {
    /// The hostname (or IP) the certificate was checked against
    pub host: String,
    /// The offending leaf certificate
    pub certificate: Box<CertSummary>,
}

impl fmt::Display for HostnameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cert = &self.certificate;
        let valid = if self.host.parse::<IpAddr>().is_ok() {
            if cert.ip_addresses.is_empty() {
                return write!(
                    f,
                    "x509: cannot validate certificate for {} because it doesn't contain any IP SANs",
                    self.host
                );
            }
            cert.ip_addresses
                .iter()
                .map(|ip| ip.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        } else if !cert.dns_names.is_empty() {
            cert.dns_names.join(", ")
        } else {
            cert.subject.common_name.clone()
        };
        write!(f, "x509: certificate is valid for {}, not {}", valid, self.host)
    }
}

impl std::error::Error for HostnameError {}

/// Matches a certificate name pattern against a hostname.
///
/// A leading `*` label matches exactly one label, label counts must be equal,
/// and a single trailing dot on either side is ignored. Both inputs are
/// expected to already be ASCII-lowercased.
pub fn match_hostnames(pattern: &str, host: &str) -> bool {
    let pattern = pattern.strip_suffix('.').unwrap_or(pattern);
    let host = host.strip_suffix('.').unwrap_or(host);

    if pattern.is_empty() || host.is_empty() {
        return false;
    }

    let pattern_parts: Vec<&str> = pattern.split('.').collect();
    let host_parts: Vec<&str> = host.split('.').collect();

    if pattern_parts.len() != host_parts.len() {
        return false;
    }

    pattern_parts
        .iter()
        .zip(host_parts.iter())
        .enumerate()
        .all(|(i, (p, h))| (i == 0 && *p == "*") || p == h)
}

/// Verifies that `cert` is valid for `host`.
///
/// `host` may be a DNS name or an IP address (IPv6 optionally in brackets).
///
/// # Errors
///
/// Returns a `HostnameError` carrying the certificate and host on mismatch.
pub fn verify_hostname(cert: &CertSummary, host: &str) -> Result<(), HostnameError> {
    let candidate_ip = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if let Ok(ip) = candidate_ip.parse::<IpAddr>() {
        if cert.ip_addresses.iter().any(|san| *san == ip) {
            return Ok(());
        }
        return Err(HostnameError {
            host: candidate_ip.to_string(),
            certificate: Box::new(cert.clone()),
        });
    }

    let lowered = host.to_ascii_lowercase();
    let matched = if !cert.dns_names.is_empty() {
        cert.dns_names
            .iter()
            .any(|name| match_hostnames(&name.to_ascii_lowercase(), &lowered))
    } else {
        match_hostnames(&cert.subject.common_name.to_ascii_lowercase(), &lowered)
    };

    if matched {
        Ok(())
    } else {
        Err(HostnameError {
            host: host.to_string(),
            certificate: Box::new(cert.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls::CertName;

    fn cert_with(dns: &[&str], ips: &[&str], cn: &str) -> CertSummary {
        CertSummary {
            subject: CertName {
                common_name: cn.to_string(),
                ..Default::default()
            },
            dns_names: dns.iter().map(|s| s.to_string()).collect(),
            ip_addresses: ips.iter().map(|s| s.parse().unwrap()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_wildcard_matches_single_label() {
        let cert = cert_with(&["*.example.com"], &[], "");
        assert!(verify_hostname(&cert, "www.example.com").is_ok());
        assert!(verify_hostname(&cert, "example.org").is_err());
        assert!(verify_hostname(&cert, "sub.www.example.com").is_err());
        assert!(verify_hostname(&cert, "example.com").is_err());
    }

    #[test]
    fn test_case_and_trailing_dot_insensitive() {
        let cert = cert_with(&["Example.COM."], &[], "");
        assert!(verify_hostname(&cert, "example.com").is_ok());
        assert!(verify_hostname(&cert, "EXAMPLE.com.").is_ok());
    }

    #[test]
    fn test_wildcard_only_in_first_label() {
        assert!(!match_hostnames("www.*.com", "www.example.com"));
        assert!(match_hostnames("*.example.com", "a.example.com"));
        assert!(!match_hostnames("", "example.com"));
        assert!(!match_hostnames("example.com", ""));
    }

    #[test]
    fn test_common_name_used_only_without_sans() {
        let cn_only = cert_with(&[], &[], "example.com");
        assert!(verify_hostname(&cn_only, "example.com").is_ok());

        let with_sans = cert_with(&["other.com"], &[], "example.com");
        assert!(verify_hostname(&with_sans, "example.com").is_err());
    }

    #[test]
    fn test_ip_hosts_match_ip_sans_only() {
        let cert = cert_with(&["203.0.113.5"], &["203.0.113.6", "::1"], "203.0.113.5");
        assert!(verify_hostname(&cert, "203.0.113.6").is_ok());
        assert!(verify_hostname(&cert, "[::1]").is_ok());
        assert!(verify_hostname(&cert, "203.0.113.5").is_err());
    }

    #[test]
    fn test_error_messages() {
        let cert = cert_with(&["a.example.com", "b.example.com"], &[], "");
        let err = verify_hostname(&cert, "example.org").unwrap_err();
        assert_eq!(
            err.to_string(),
            "x509: certificate is valid for a.example.com, b.example.com, not example.org"
        );
        assert_eq!(err.host, "example.org");

        let err = verify_hostname(&cert, "198.51.100.1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "x509: cannot validate certificate for 198.51.100.1 because it doesn't contain any IP SANs"
        );

        let cn_only = cert_with(&[], &[], "legacy.example.com");
        let err = verify_hostname(&cn_only, "example.com").unwrap_err();
        assert_eq!(
            err.to_string(),
            "x509: certificate is valid for legacy.example.com, not example.com"
        );
    }
}
