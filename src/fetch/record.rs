//! Serializable records of page and asset fetches.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::Url;
use serde::Serialize;

use crate::domain::Domain;
use crate::error_handling::FetchError;
use crate::tls::TlsSummary;
use crate::utils::TimerResult;

/// Normalized view of one HTTP response.
///
/// The default value (code 0, no URL) is what failed fetches carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    /// The effective host differs from the requested host
    pub remote: bool,
    pub code: u16,
    /// Effective URL after redirects
    pub url: Option<Url>,
    pub headers: BTreeMap<String, Vec<String>>,
    pub content_length: u64,
    pub tls: Option<TlsSummary>,
    /// Body of primary pages. Never kept for assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Response {
    /// Builds a response record without a body.
    ///
    /// `content_length` starts from the `Content-Length` header (0 when
    /// absent) and is corrected by the caller once the body has been read.
    pub fn new(
        request_url: &Url,
        effective_url: Url,
        code: u16,
        headers: &HeaderMap,
        content_length: Option<u64>,
        tls: Option<TlsSummary>,
    ) -> Self {
        Self {
            remote: effective_url.host_str() != request_url.host_str(),
            code,
            url: Some(effective_url),
            headers: collect_headers(headers),
            content_length: content_length.unwrap_or(0),
            tls,
            body: None,
        }
    }
}

/// Converts a header map into an ordered multimap.
pub fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        out.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    out
}

/// Display URL of a fetch: the effective URL, or `REQUESTED (-> EFFECTIVE)`
/// when a redirect moved it.
pub fn display_url(requested: &Url, effective: Option<&Url>) -> String {
    match effective {
        Some(effective) if effective != requested => format!("{requested} (-> {effective})"),
        Some(effective) => effective.to_string(),
        None => requested.to_string(),
    }
}

fn error_text(error: &Option<FetchError>) -> String {
    error.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Outcome of fetching one asset referenced by a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub url: String,
    pub request_url: Url,
    pub response: Response,
    pub error: Option<FetchError>,
    pub time: Option<TimerResult>,
}

impl Resource {
    pub fn new(request_url: Url) -> Self {
        Self {
            url: request_url.to_string(),
            request_url,
            response: Response::default(),
            error: None,
            time: None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.response.url, &self.time) {
            (Some(url), Some(time)) => write!(
                f,
                "<[Resource] request:{} response:{} code:{} time:{}ms err:{:?}>",
                self.request_url,
                url,
                self.response.code,
                time.milli,
                error_text(&self.error)
            ),
            _ => write!(
                f,
                "<[Resource] request:{} err:{:?}>",
                self.request_url,
                error_text(&self.error)
            ),
        }
    }
}

/// Everything recorded while crawling one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    pub url: String,
    pub request: Domain,
    pub response: Response,
    pub error: Option<FetchError>,
    pub time: Option<TimerResult>,
    pub assets: Vec<Resource>,
    pub resource_time: Option<TimerResult>,
    pub total_time: Option<TimerResult>,
}

impl FetchResult {
    pub fn new(request: Domain) -> Self {
        Self {
            url: request.url.to_string(),
            request,
            response: Response::default(),
            error: None,
            time: None,
            assets: Vec::new(),
            resource_time: None,
            total_time: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.response.url, &self.resource_time, &self.total_time) {
            (Some(url), Some(resource_time), Some(total_time)) => write!(
                f,
                "<[Results] request:{} response:{} ip:{:?} code:{} resources:{} resource-time:{}ms total-time:{}ms err:{:?}>",
                self.request.url,
                url,
                self.request.ip,
                self.response.code,
                self.assets.len(),
                resource_time.milli,
                total_time.milli,
                error_text(&self.error)
            ),
            _ => write!(
                f,
                "<[Results] request:{} response:{} ip:{:?} err:{:?}>",
                self.request.url,
                self.url,
                self.request.ip,
                error_text(&self.error)
            ),
        }
    }
}
