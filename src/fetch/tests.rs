// Fetch module tests.

use super::*;
use crate::domain::Domain;

fn client_for(domains: &[Domain]) -> FetchClient {
    let config = CrawlerConfig {
        timeout: std::time::Duration::from_secs(2),
        ..Default::default()
    };
    FetchClient::new(&config, Arc::new(IpMap::build(domains))).unwrap()
}

#[tokio::test]
async fn test_invalid_override_ip_is_rejected_before_connecting() {
    let domain = Domain::parse("http://example.com/", "999.1.1.1").unwrap();
    let client = client_for(std::slice::from_ref(&domain));
    let err = client
        .get(&domain.url, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::InvalidOverrideIp {
            host: "example.com".to_string(),
            ip: "999.1.1.1".to_string(),
        }
    );
    assert!(err.to_string().starts_with("IP address provided is invalid"));
}

#[tokio::test]
async fn test_cancelled_token_short_circuits() {
    let domain = Domain::parse("http://example.com/", "192.0.2.1").unwrap();
    let client = client_for(std::slice::from_ref(&domain));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = client.get(&domain.url, &cancel).await.unwrap_err();
    assert_eq!(err, FetchError::Cancelled);
}

#[tokio::test]
async fn test_refused_connection_is_connect_error() {
    // Bind then drop to obtain a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let domain = Domain::parse(&format!("http://refused.test:{port}/"), "127.0.0.1").unwrap();
    let client = client_for(std::slice::from_ref(&domain));
    let err = client
        .get(&domain.url, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Connect(_)), "got {err:?}");
}

#[test]
fn test_error_chain_joins_causes() {
    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "inner"));
    assert_eq!(error_chain(&err), "outer: inner");
}

#[test]
fn test_ip_map_is_shared() {
    let domain = Domain::parse("http://example.com/", "203.0.113.5").unwrap();
    let client = client_for(std::slice::from_ref(&domain));
    let clone = client.clone();
    assert_eq!(clone.ip_map().override_ip("www.example.com"), Some("203.0.113.5"));
}

fn leaf_for(names: &[&str]) -> TlsSummary {
    TlsSummary {
        peer_certificates: vec![crate::tls::CertSummary {
            version: 3,
            dns_names: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }],
    }
}

#[test]
fn test_https_without_certificate_fails_closed() {
    let url = Url::parse("https://example.com/").unwrap();
    let missing = Err(FetchError::Tls("no peer certificate".to_string()));
    let err = verify_certificate(&url, missing, false).unwrap_err();
    assert_eq!(err.kind(), crate::error_handling::ErrorKind::Tls);

    let unparseable = Err(FetchError::Tls("unparseable certificate: bad der".to_string()));
    assert!(verify_certificate(&url, unparseable, false).is_err());

    let empty = Ok(TlsSummary::default());
    assert!(matches!(
        verify_certificate(&url, empty, false),
        Err(FetchError::Tls(_))
    ));
}

#[test]
fn test_https_certificate_checked_against_host() {
    let url = Url::parse("https://shop.example.com/").unwrap();
    let summary = verify_certificate(&url, Ok(leaf_for(&["*.example.com"])), false).unwrap();
    assert_eq!(summary, Some(leaf_for(&["*.example.com"])));

    let err = verify_certificate(&url, Ok(leaf_for(&["other.test"])), false).unwrap_err();
    assert!(matches!(err, FetchError::TlsHostnameMismatch(_)), "got {err:?}");
}

#[test]
fn test_allow_insecure_downgrades_certificate_errors() {
    let url = Url::parse("https://example.com/").unwrap();
    let missing = Err(FetchError::Tls("no peer certificate".to_string()));
    assert_eq!(verify_certificate(&url, missing, true).unwrap(), None);

    let mismatched = verify_certificate(&url, Ok(leaf_for(&["other.test"])), true).unwrap();
    assert_eq!(mismatched, Some(leaf_for(&["other.test"])));
}

#[test]
fn test_plain_http_skips_certificate_check() {
    let url = Url::parse("http://example.com/").unwrap();
    let missing = Err(FetchError::Tls("no peer certificate".to_string()));
    assert_eq!(verify_certificate(&url, missing, false).unwrap(), None);
}
