//! Redirect policy for spoofed requests.
//!
//! Every hop is checked against the crawl's `IpMap` so a redirect cannot
//! quietly move the crawl off the deployment under test.

use std::net::IpAddr;
use std::sync::Arc;

use reqwest::redirect::Policy;
use reqwest::Url;
use thiserror::Error;

use crate::config::MAX_REDIRECT_HOPS;
use crate::domain::{host_key, is_ip_host, IpMap};
use crate::error_handling::FetchError;

/// A redirect hop rejected by `check_redirect`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    #[error("too many redirects ({limit})")]
    TooManyRedirects { limit: usize },

    #[error("redirection does not match origin host ({from} -> {to})")]
    OffOrigin { from: String, to: String },
}

impl From<RedirectError> for FetchError {
    fn from(err: RedirectError) -> Self {
        match err {
            RedirectError::TooManyRedirects { limit } => FetchError::TooManyRedirects { limit },
            RedirectError::OffOrigin { from, to } => FetchError::OffOriginRedirect { from, to },
        }
    }
}

/// Decides whether the redirect to `next` may be followed.
///
/// `previous` holds every URL already requested, starting with the origin.
/// A hop is rejected when:
/// - more than `MAX_REDIRECT_HOPS` redirects have already been followed
/// - `next` is an IP literal other than the origin host
/// - `next` is neither a configured host nor one of the IPs under test
///
/// # Errors
///
/// Returns the `RedirectError` describing the rejected hop.
pub fn check_redirect(ip_map: &IpMap, next: &Url, previous: &[Url]) -> Result<(), RedirectError> {
    if previous.len() > MAX_REDIRECT_HOPS {
        return Err(RedirectError::TooManyRedirects {
            limit: MAX_REDIRECT_HOPS,
        });
    }

    let origin = previous.first().and_then(host_key).unwrap_or_default();
    let target = host_key(next).unwrap_or_default();
    let off_origin = || RedirectError::OffOrigin {
        from: origin.clone(),
        to: target.clone(),
    };

    if is_ip_host(next) && target != origin {
        return Err(off_origin());
    }

    let target_ip = target
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip_map.is_target_ip(&ip));
    if !ip_map.contains_host(&target) && !target_ip {
        return Err(off_origin());
    }

    Ok(())
}

/// Builds the client redirect policy backed by `check_redirect`.
pub fn redirect_policy(ip_map: Arc<IpMap>) -> Policy {
    Policy::custom(move |attempt| {
        match check_redirect(&ip_map, attempt.url(), attempt.previous()) {
            Ok(()) => attempt.follow(),
            Err(e) => {
                log::debug!("Refusing redirect to {}: {}", attempt.url(), e);
                attempt.error(e)
            }
        }
    })
}
