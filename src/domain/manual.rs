//! Manually supplied domain lists.
//!
//! Entries take the form `HOST[:IPv4][:PORT]` or `http(s)://HOST[/PATH][:IPv4][:PORT]`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Domain;
use crate::error_handling::ParseError;

static MANUAL_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<domain>(?:[A-Za-z0-9_.-]{2,350}\.[A-Za-z0-9]{2,63})|https?://[A-Za-z0-9_.-]{2,350}\.[A-Za-z0-9]{2,63}[!-~]*?)(?::(?P<ip>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}))?(?::(?P<port>\d{2,5}))?$",
    )
    .expect("manual entry pattern is valid")
});

impl Domain {
    /// Parses one manual entry.
    ///
    /// Port 443 selects `https`, port 80 keeps the given (or `http`) scheme and
    /// any other port is kept in the URL authority.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::DomainEntry` for entries that do not match either
    /// accepted form, carry an invalid port, or do not form a valid URL.
    pub fn from_manual_entry(entry: &str) -> Result<Self, ParseError> {
        let entry = entry.trim();
        let caps = MANUAL_ENTRY
            .captures(entry)
            .ok_or_else(|| ParseError::DomainEntry(entry.to_string()))?;

        let target = caps.name("domain").map_or("", |m| m.as_str());
        let ip = caps.name("ip").map_or("", |m| m.as_str());
        let port = caps.name("port").map_or("", |m| m.as_str());

        if !port.is_empty() {
            let valid = port
                .parse::<u16>()
                .map(|p| p > 0 && p.to_string() == port)
                .unwrap_or(false);
            if !valid {
                return Err(ParseError::DomainEntry(format!("{entry}: invalid port")));
            }
        }

        let url = if target.starts_with("http://") || target.starts_with("https://") {
            let mut url = url::Url::parse(target)
                .map_err(|e| ParseError::DomainEntry(format!("{entry}: {e}")))?;
            match port {
                "" | "80" => {}
                "443" => {
                    url.set_scheme("https").map_err(|_| {
                        ParseError::DomainEntry(format!("{entry}: cannot switch to https"))
                    })?;
                }
                other => {
                    let port = other.parse::<u16>().ok();
                    url.set_port(port).map_err(|_| {
                        ParseError::DomainEntry(format!("{entry}: cannot set port"))
                    })?;
                }
            }
            url.to_string()
        } else {
            match port {
                "443" => format!("https://{target}"),
                "" | "80" => format!("http://{target}"),
                other => format!("http://{target}:{other}"),
            }
        };

        Domain::parse(&url, ip)
    }
}

/// Parses a whitespace-separated list of manual entries.
///
/// # Errors
///
/// Returns the first malformed entry as `ParseError::DomainEntry`.
pub fn parse_manual_list(input: &str) -> Result<Vec<Domain>, ParseError> {
    input
        .split_whitespace()
        .map(Domain::from_manual_entry)
        .collect()
}
