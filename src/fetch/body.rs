//! Response body consumption.

use tokio_util::sync::CancellationToken;

use super::classify_error;
use crate::error_handling::FetchError;

/// Reads the whole body of a primary page.
///
/// # Errors
///
/// Returns `FetchError::Body`/`Timeout` if the stream fails, or
/// `FetchError::Cancelled` if `cancel` fires first.
pub async fn read_body(
    mut response: reqwest::Response,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            chunk = response.chunk() => chunk.map_err(classify_error)?,
        };
        match chunk {
            Some(bytes) => body.extend_from_slice(&bytes),
            None => return Ok(body),
        }
    }
}

/// Drains a body without keeping it, returning the number of bytes seen.
///
/// # Errors
///
/// Same as `read_body`.
pub async fn count_body(
    mut response: reqwest::Response,
    cancel: &CancellationToken,
) -> Result<u64, FetchError> {
    let mut total = 0u64;
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            chunk = response.chunk() => chunk.map_err(classify_error)?,
        };
        match chunk {
            Some(bytes) => total += bytes.len() as u64,
            None => return Ok(total),
        }
    }
}
