// Domain module tests.

use super::*;

use std::collections::HashMap;
use std::net::IpAddr;

use futures::future::BoxFuture;

struct StaticLookup(HashMap<&'static str, &'static str>);

impl HostLookup for StaticLookup {
    fn lookup_ip<'a>(&'a self, host: &'a str) -> BoxFuture<'a, anyhow::Result<IpAddr>> {
        Box::pin(async move {
            match self.0.get(host) {
                Some(ip) => Ok(ip.parse()?),
                None => Err(anyhow::anyhow!("NXDOMAIN {host}")),
            }
        })
    }
}

fn domain(url: &str, ip: &str) -> Domain {
    Domain::parse(url, ip).unwrap()
}

#[test]
fn test_parse_requires_http_scheme_and_host() {
    assert!(Domain::parse("http://example.com/", "").is_ok());
    assert!(Domain::parse("https://example.com/", "203.0.113.5").is_ok());
    assert!(matches!(
        Domain::parse("ftp://example.com/", ""),
        Err(ParseError::DomainEntry(_))
    ));
    assert!(Domain::parse("not a url", "").is_err());
}

#[test]
fn test_display() {
    let d = domain("http://example.com/", "203.0.113.5");
    assert_eq!(
        d.to_string(),
        r#"<[Domain] url:"http://example.com/" ip:"203.0.113.5">"#
    );
}

#[test]
fn test_host_key_normalizes() {
    let d = domain("http://WWW.Example.COM:8080/x", "");
    assert_eq!(d.host().as_deref(), Some("www.example.com"));

    let v6 = domain("http://[::1]:8080/", "");
    assert_eq!(v6.host().as_deref(), Some("::1"));
    assert!(is_ip_host(&v6.url));
    assert!(!is_ip_host(&d.url));
}

#[test]
fn test_dedup_by_url_and_ip() {
    let input = vec![
        domain("http://example.com/", "203.0.113.5"),
        domain("http://example.com/", "203.0.113.5"),
        domain("http://example.com/", "203.0.113.6"),
        domain("http://example.com/", ""),
        domain("http://example.org/", "203.0.113.5"),
        domain("http://example.com/", ""),
    ];
    let out = dedup_domains(input);
    assert_eq!(out.len(), 4);
    assert_eq!(out[0].ip, "203.0.113.5");
    assert_eq!(out[1].ip, "203.0.113.6");
    assert_eq!(out[2].ip, "");
    assert_eq!(out[3].url.as_str(), "http://example.org/");
}

#[test]
fn test_ipmap_contains_three_spellings() {
    let map = IpMap::build(&[
        domain("http://www.example.com/", "203.0.113.5"),
        domain("http://example.org/", ""),
    ]);

    for host in ["www.example.com", "example.com"] {
        assert_eq!(map.get(host), Some("203.0.113.5"));
        assert_eq!(map.override_ip(host), Some("203.0.113.5"));
    }
    assert!(map.contains_host("www.example.org"));
    assert!(map.contains_host("example.org"));
    assert_eq!(map.override_ip("example.org"), None);
    assert!(!map.contains_host("cdn.example.com"));
    assert_eq!(map.len(), 4);
}

#[test]
fn test_ipmap_target_ips() {
    let map = IpMap::build(&[domain("http://example.com/", "203.0.113.5")]);
    assert!(map.is_target_ip(&"203.0.113.5".parse().unwrap()));
    assert!(!map.is_target_ip(&"198.51.100.1".parse().unwrap()));
    assert!(IpMap::default().is_empty());
}

#[test]
fn test_ipmap_target_ips_compare_parsed() {
    let map = IpMap::build(&[
        domain("http://example.com/", "::0001"),
        domain("http://example.org/", ""),
        domain("http://example.net/", "not-an-ip"),
    ]);
    assert!(map.is_target_ip(&"::1".parse().unwrap()));
    assert!(!map.is_target_ip(&"::2".parse().unwrap()));
}

#[tokio::test]
async fn test_is_remote_classification() {
    let map = IpMap::build(&[domain("http://example.com/", "203.0.113.5")]);
    let lookup = StaticLookup(HashMap::from([
        ("static.example.com", "203.0.113.5"),
        ("cdn.thirdparty.net", "198.51.100.7"),
    ]));

    // Configured hosts are crawled on their own.
    assert!(is_remote("example.com", &map, &lookup).await);
    assert!(is_remote("www.example.com", &map, &lookup).await);
    // Co-located on the target IP.
    assert!(!is_remote("static.example.com", &map, &lookup).await);
    // Genuine third party.
    assert!(is_remote("cdn.thirdparty.net", &map, &lookup).await);
    // Lookup failure fails open.
    assert!(!is_remote("missing.invalid", &map, &lookup).await);
}

#[test]
fn test_manual_entry_bare_host() {
    let d = Domain::from_manual_entry("example.com").unwrap();
    assert_eq!(d.url.as_str(), "http://example.com/");
    assert_eq!(d.ip, "");
}

#[test]
fn test_manual_entry_with_ip_and_port() {
    let d = Domain::from_manual_entry("example.com:203.0.113.5").unwrap();
    assert_eq!(d.url.as_str(), "http://example.com/");
    assert_eq!(d.ip, "203.0.113.5");

    let d = Domain::from_manual_entry("example.com:203.0.113.5:443").unwrap();
    assert_eq!(d.url.as_str(), "https://example.com/");
    assert_eq!(d.ip, "203.0.113.5");

    let d = Domain::from_manual_entry("example.com:8080").unwrap();
    assert_eq!(d.url.as_str(), "http://example.com:8080/");
    assert_eq!(d.ip, "");
}

#[test]
fn test_manual_entry_url_form() {
    let d = Domain::from_manual_entry("https://example.com/shop").unwrap();
    assert_eq!(d.url.as_str(), "https://example.com/shop");

    let d = Domain::from_manual_entry("http://example.com/shop:203.0.113.5:443").unwrap();
    assert_eq!(d.url.as_str(), "https://example.com/shop");
    assert_eq!(d.ip, "203.0.113.5");

    let d = Domain::from_manual_entry("http://example.com:203.0.113.5:8443").unwrap();
    assert_eq!(d.url.as_str(), "http://example.com:8443/");
}

#[test]
fn test_manual_entry_rejects_garbage() {
    assert!(Domain::from_manual_entry("localhost").is_err());
    assert!(Domain::from_manual_entry("example.com:99999").is_err());
    assert!(Domain::from_manual_entry("example.com:0080").is_err());
    assert!(Domain::from_manual_entry("ftp://example.com").is_err());
}

#[test]
fn test_parse_manual_list() {
    let list = parse_manual_list("example.com\n  example.org:203.0.113.5\texample.net:443\n").unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[1].ip, "203.0.113.5");
    assert_eq!(list[2].url.scheme(), "https");

    assert!(parse_manual_list("example.com bogus").is_err());
    assert!(parse_manual_list("").unwrap().is_empty());
}
