//! DNS resolver initialization.
//!
//! The resolver backs remote classification of asset hosts; page fetches go
//! through the spoofing resolver instead.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;

use crate::config::DNS_TIMEOUT_SECS;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver for hostname lookups.
///
/// Prefers the system configuration and falls back to the default upstream
/// servers when it cannot be read. Timeouts are short, with two attempts and
/// `ndots = 0` so no search domains are appended.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the resolver cannot be
/// constructed.
pub fn init_resolver() -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let (config, mut opts) = match read_system_conf() {
        Ok(system) => system,
        Err(e) => {
            log::warn!("Unable to read system DNS configuration, using defaults: {e}");
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };

    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = 2;
    opts.ndots = 0;

    if config.name_servers().is_empty() {
        return Err(InitializationError::DnsResolverError(
            "no name servers configured".to_string(),
        ));
    }

    Ok(Arc::new(TokioAsyncResolver::tokio(config, opts)))
}
