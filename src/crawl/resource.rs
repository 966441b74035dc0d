//! Asset (resource) fetching.

use log::{debug, info};
use reqwest::Url;

use super::context::CrawlContext;
use crate::error_handling::FetchScope;
use crate::fetch::{count_body, display_url, FetchedResponse, Resource, Response};

/// Fetches one asset found on a page.
///
/// The asset's own body is never parsed: it is counted (when the server did
/// not announce a length) and discarded.
pub(crate) async fn fetch_resource(ctx: &CrawlContext, url: Url) -> Resource {
    let mut resource = Resource::new(url);

    let fetched = match ctx.client.get(&resource.request_url, &ctx.cancel).await {
        Ok(fetched) => fetched,
        Err(e) => {
            debug!("Asset {} failed: {}", resource.request_url, e);
            ctx.stats.record(FetchScope::Asset, e.kind());
            resource.error = Some(e);
            return resource;
        }
    };

    let FetchedResponse {
        response,
        url,
        time,
        tls,
    } = fetched;

    let mut record = Response::new(
        &resource.request_url,
        url.clone(),
        response.status().as_u16(),
        response.headers(),
        response.content_length(),
        tls,
    );

    if record.content_length < 1 {
        match count_body(response, &ctx.cancel).await {
            Ok(length) => record.content_length = length,
            Err(e) => debug!("Unable to measure body of {url}: {e}"),
        }
    }

    info!(
        "fetched {} in {}ms with status {}",
        url, time.milli, record.code
    );

    resource.url = display_url(&resource.request_url, Some(&url));
    resource.time = Some(time);
    resource.response = record;
    resource
}
