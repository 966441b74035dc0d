//! TLS certificate summaries and hostname verification.
//!
//! This module turns the DER certificate captured during a handshake into a
//! detached, serializable summary that outlives the connection:
//! - Certificate version, subject and issuer
//! - Validity period (not before/after)
//! - Subject Alternative Names (DNS, email, IP)
//!
//! It also re-verifies the certificate against the intended hostname, which
//! the transport cannot do itself when it was pointed at an override IP.
//!
//! Uses `x509-parser` for certificate parsing.

mod extract;
mod hostname;

use std::net::IpAddr;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use extract::{extract_certificate_sans, extract_name};

pub use hostname::{match_hostnames, verify_hostname, HostnameError};

/// Displayable attributes of a certificate subject or issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertName {
    pub country: String,
    pub organization: String,
    pub locality: String,
    pub province: String,
    pub common_name: String,
}

/// Detached projection of one X.509 certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CertSummary {
    /// X.509 version (1, 2 or 3)
    pub version: u32,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    pub issuer: CertName,
    pub subject: CertName,
    pub dns_names: Vec<String>,
    pub email_addresses: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
}

/// TLS session details of a response loaded over HTTPS.
///
/// Only the leaf certificate presented by the peer is captured.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TlsSummary {
    pub peer_certificates: Vec<CertSummary>,
}

impl TlsSummary {
    /// Builds a summary from the DER-encoded leaf certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if the certificate cannot be parsed.
    pub fn from_leaf_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            peer_certificates: vec![summarize_certificate(der)?],
        })
    }

    /// The leaf certificate, if any was captured.
    pub fn leaf(&self) -> Option<&CertSummary> {
        self.peer_certificates.first()
    }
}

/// Parses a DER certificate into a `CertSummary`.
///
/// # Errors
///
/// Returns an error if the DER data is not a valid X.509 certificate.
pub fn summarize_certificate(der: &[u8]) -> Result<CertSummary> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)?;
    let tbs_cert = &cert.tbs_certificate;

    let sans = extract_certificate_sans(&cert);
    let validity = &tbs_cert.validity;

    Ok(CertSummary {
        version: tbs_cert.version.0 + 1,
        not_before: DateTime::<Utc>::from_timestamp(validity.not_before.timestamp(), 0),
        not_after: DateTime::<Utc>::from_timestamp(validity.not_after.timestamp(), 0),
        issuer: extract_name(&tbs_cert.issuer),
        subject: extract_name(&tbs_cert.subject),
        dns_names: sans.dns_names,
        email_addresses: sans.email_addresses,
        ip_addresses: sans.ip_addresses,
    })
}
