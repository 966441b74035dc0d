//! Primary page fetch and asset fan-out for one domain.

use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};
use reqwest::Url;

use super::context::CrawlContext;
use super::resource::fetch_resource;
use crate::domain::{host_key, is_remote, Domain};
use crate::fetch::{display_url, read_body, FetchResult, FetchedResponse, Resource, Response};
use crate::parse::{extract_assets, parse_asset_urls};
use crate::utils::{Pool, Timer};

/// Crawls one domain: the primary page, then (optionally) its assets.
///
/// A failed primary fetch ends the domain with `error` set, a default
/// `response` and no assets.
pub(crate) async fn fetch_page(ctx: &Arc<CrawlContext>, domain: Domain) -> FetchResult {
    let total = Timer::start();
    let mut result = FetchResult::new(domain);

    let fetched = match ctx.client.get(&result.request.url, &ctx.cancel).await {
        Ok(fetched) => fetched,
        Err(e) => {
            result.error = Some(e);
            result.total_time = Some(total.end());
            return result;
        }
    };

    let FetchedResponse {
        response,
        url,
        time,
        tls,
    } = fetched;

    let mut record = Response::new(
        &result.request.url,
        url.clone(),
        response.status().as_u16(),
        response.headers(),
        response.content_length(),
        tls,
    );
    result.url = display_url(&result.request.url, Some(&url));
    result.time = Some(time);

    let body = match read_body(response, &ctx.cancel).await {
        Ok(body) => body,
        Err(e) => {
            // A failed primary fetch keeps a zero-valued response.
            result.error = Some(e);
            result.total_time = Some(total.end());
            return result;
        }
    };

    if record.content_length < 1 {
        record.content_length = body.len() as u64;
    }
    if !body.is_empty() {
        record.body = Some(String::from_utf8_lossy(&body).into_owned());
    }
    result.response = record;

    info!(
        "fetched {} in {}ms with status {}",
        url, time.milli, result.response.code
    );

    let resource_timer = Timer::start();
    if ctx.config.assets {
        result.assets = fetch_assets(ctx, &body, &url, &result.request).await;
    }
    result.resource_time = Some(resource_timer.end());
    result.total_time = Some(total.end());
    result
}

/// Fetches every asset referenced by `body` through a per-page pool.
///
/// Results keep the order in which assets appear on the page.
async fn fetch_assets(
    ctx: &Arc<CrawlContext>,
    body: &[u8],
    base: &Url,
    request: &Domain,
) -> Vec<Resource> {
    let raw = match extract_assets(body, base) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("{e}, resource: {request}");
            return Vec::new();
        }
    };

    let pool = Pool::new(ctx.config.asset_threads);
    let mut handles = Vec::new();

    for url in parse_asset_urls(raw) {
        if ctx.config.no_remote {
            let host = host_key(&url).unwrap_or_default();
            if is_remote(&host, ctx.ip_map(), ctx.lookup.as_ref()).await {
                info!("host {host} (url: {url}) resolves to a unknown remote ip, skipping");
                continue;
            }
        }

        let slot = pool.slot().await;
        let ctx = Arc::clone(ctx);
        handles.push(tokio::spawn(async move {
            let resource = fetch_resource(&ctx, url).await;
            slot.free();
            resource
        }));
    }

    pool.wait().await;

    join_all(handles)
        .await
        .into_iter()
        .filter_map(|joined| match joined {
            Ok(resource) => Some(resource),
            Err(e) => {
                warn!("Asset task for {request} failed: {e}");
                None
            }
        })
        .collect()
}
