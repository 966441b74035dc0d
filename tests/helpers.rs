// Shared test helpers: a local virtual-host server and a static DNS table.
//
// Every test talks to an axum server on 127.0.0.1 reached through an
// override IP, so no test depends on live DNS or the internet.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Path,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Router,
};
use futures::future::BoxFuture;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use vhost_probe::{CrawlerConfig, Domain, HostLookup};

/// Host name used for the spoofed virtual host in every test.
#[allow(dead_code)] // Used by other test files
pub const SPOOFED_HOST: &str = "spoofed.test";

/// A running test server.
#[allow(dead_code)] // Used by other test files
pub struct TestServer {
    pub addr: SocketAddr,
    /// Number of requests served on `/count`
    pub hits: Arc<AtomicUsize>,
}

#[allow(dead_code)] // Used by other test files
impl TestServer {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// `http://spoofed.test:PORT{path}`
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", SPOOFED_HOST, self.port(), path)
    }

    /// A domain reaching `path` on the spoofed host through 127.0.0.1.
    pub fn domain(&self, path: &str) -> Domain {
        Domain::parse(&self.url(path), "127.0.0.1").expect("valid test url")
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts the virtual-host test server.
///
/// Routes:
/// - `/host`: echoes the Host header
/// - `/redirect/{n}`: redirects `n` times, then answers 200
/// - `/offsite`: redirects to a host outside the crawl
/// - `/to-ip`: redirects to the server's bare IP
/// - `/page`: HTML referencing two scripts on the same host
/// - `/mixed`: HTML referencing same-host, co-located and third-party assets
/// - `/static/{file}`: asset content
/// - `/hops/a`: redirects to `/hops/b`, which echoes User-Agent, Referer and Host
/// - `/count`: counts hits
/// - `/slow`: answers after five seconds
#[allow(dead_code)] // Used by other test files
pub async fn start_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let port = addr.port();
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route(
            "/host",
            get(|headers: HeaderMap| async move {
                headers
                    .get(header::HOST)
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        )
        .route(
            "/redirect/{hops}",
            get(|Path(hops): Path<usize>| async move {
                if hops > 0 {
                    Redirect::temporary(&format!("/redirect/{}", hops - 1)).into_response()
                } else {
                    "arrived".into_response()
                }
            }),
        )
        .route(
            "/offsite",
            get(move || async move {
                Redirect::temporary(&format!("http://elsewhere.test:{port}/host"))
            }),
        )
        .route(
            "/to-ip",
            get(move || async move { Redirect::temporary(&format!("http://127.0.0.1:{port}/host")) }),
        )
        .route(
            "/page",
            get(|| async {
                Html(
                    r#"<html><head><script src="/static/a.js"></script></head>
                    <body><script src="static/b.js"></script><a href="/elsewhere">x</a></body></html>"#,
                )
            }),
        )
        .route(
            "/mixed",
            get(move || async move {
                Html(format!(
                    r#"<html><body>
                    <img src="/static/logo.png">
                    <script src="http://static.test:{port}/static/a.js"></script>
                    <script src="//cdn.thirdparty.test/lib.js"></script>
                    </body></html>"#
                ))
            }),
        )
        .route(
            "/static/{file}",
            get(|Path(file): Path<String>| async move { format!("/* {file} */") }),
        )
        .route(
            "/count",
            get({
                let hits = Arc::clone(&hits);
                move || async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "counted"
                }
            }),
        )
        .route(
            "/hops/a",
            get(|| async { Redirect::temporary("/hops/b") }),
        )
        .route(
            "/hops/b",
            get(|headers: HeaderMap| async move {
                let value = |name: header::HeaderName| {
                    headers
                        .get(name)
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                };
                format!(
                    "{}\n{}\n{}",
                    value(header::USER_AGENT),
                    value(header::REFERER),
                    value(header::HOST)
                )
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer { addr, hits }
}

/// Starts an HTTPS server presenting a self-signed certificate for `names`.
///
/// Every request is answered with `200 secure`.
#[allow(dead_code)] // Used by other test files
pub async fn start_tls_server(names: &[&str]) -> SocketAddr {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let certified = rcgen::generate_simple_self_signed(names).expect("generate certificate");
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        certified.key_pair.serialize_der(),
    ));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![certified.cert.der().clone()], key)
        .expect("server certificate");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    serve_raw(move |stream| {
        let acceptor = acceptor.clone();
        async move {
            if let Ok(mut tls) = acceptor.accept(stream).await {
                if read_request_head(&mut tls).await {
                    let _ = tls
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 6\r\nConnection: close\r\n\r\nsecure")
                        .await;
                    let _ = tls.shutdown().await;
                }
            }
        }
    })
    .await
}

/// Starts a plain HTTP server that writes `response` verbatim and closes.
#[allow(dead_code)] // Used by other test files
pub async fn start_raw_server(response: &'static [u8]) -> SocketAddr {
    serve_raw(move |mut stream| async move {
        if read_request_head(&mut stream).await {
            let _ = stream.write_all(response).await;
            let _ = stream.shutdown().await;
        }
    })
    .await
}

async fn serve_raw<F, Fut>(handle: F) -> SocketAddr
where
    F: Fn(tokio::net::TcpStream) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle(stream));
        }
    });
    addr
}

async fn read_request_head<S: AsyncReadExt + Unpin>(stream: &mut S) -> bool {
    let mut seen = Vec::new();
    let mut buf = [0u8; 1024];
    while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return false,
            Ok(n) => seen.extend_from_slice(&buf[..n]),
        }
    }
    true
}

/// `HostLookup` answering from a fixed table.
#[allow(dead_code)] // Used by other test files
pub struct StaticLookup(pub HashMap<String, IpAddr>);

#[allow(dead_code)] // Used by other test files
impl StaticLookup {
    pub fn new(entries: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self(
            entries
                .iter()
                .map(|(host, ip)| (host.to_string(), ip.parse().expect("valid test ip")))
                .collect(),
        ))
    }
}

impl HostLookup for StaticLookup {
    fn lookup_ip<'a>(&'a self, host: &'a str) -> BoxFuture<'a, anyhow::Result<IpAddr>> {
        Box::pin(async move {
            self.0
                .get(host)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("no record for {host}"))
        })
    }
}

/// Crawler configuration with short timeouts for tests.
#[allow(dead_code)] // Used by other test files
pub fn test_config() -> CrawlerConfig {
    CrawlerConfig {
        timeout: Duration::from_secs(3),
        ..Default::default()
    }
}
