//! Static asset discovery.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io::Read;

use lol_html::{element, HtmlRewriter, Settings};
use url::Url;

use crate::config::BODY_READ_CHUNK_SIZE;
use crate::error_handling::ParseError;

const ASSET_LINK_RELS: [&str; 2] = ["stylesheet", "shortcut icon"];

/// Resolves one raw `href`/`src` value against the page it was found on.
///
/// Returns `None` for values that are empty, end in `/`, or do not resolve
/// to an http(s) URL. Dot-relative values (`./x`) are appended to the full
/// base path; other relative values resolve against the base directory.
pub fn resolve_asset_url(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.ends_with('/') {
        return None;
    }

    let authority = match base.port() {
        Some(port) => format!("{}:{}", base.host_str()?, port),
        None => base.host_str()?.to_string(),
    };

    let resolved = if let Some(rest) = raw.strip_prefix("./") {
        format!(
            "{}://{}{}/{}",
            base.scheme(),
            authority,
            base.path().trim_end_matches('/'),
            rest
        )
    } else if raw.starts_with("//") {
        format!("{}:{}", base.scheme(), raw)
    } else if raw.starts_with('/') {
        format!("{}://{}{}", base.scheme(), authority, raw)
    } else {
        base.join(raw).ok()?.to_string()
    };

    let lowered = resolved.to_ascii_lowercase();
    (lowered.starts_with("http://") || lowered.starts_with("https://")).then_some(resolved)
}

/// Scans an HTML stream for stylesheets, icons, scripts and images.
///
/// The body is fed to the tokenizer in fixed-size chunks. Results are
/// resolved against `base` and deduplicated, keeping document order.
///
/// # Errors
///
/// Returns `ParseError::Html` if the stream cannot be read or tokenized.
pub fn extract_assets<R: Read>(mut reader: R, base: &Url) -> Result<Vec<String>, ParseError> {
    let found: RefCell<Vec<String>> = RefCell::new(Vec::new());
    let record = |raw: Option<String>| {
        if let Some(url) = raw.and_then(|raw| resolve_asset_url(&raw, base)) {
            found.borrow_mut().push(url);
        }
    };

    {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    element!("link[href]", |el| {
                        let wanted = el.get_attribute("rel").map_or(true, |rel| {
                            let rel = rel.trim().to_ascii_lowercase();
                            rel.is_empty() || ASSET_LINK_RELS.contains(&rel.as_str())
                        });
                        if wanted {
                            record(el.get_attribute("href"));
                        }
                        Ok(())
                    }),
                    element!("script[src]", |el| {
                        record(el.get_attribute("src"));
                        Ok(())
                    }),
                    element!("img[src]", |el| {
                        record(el.get_attribute("src"));
                        Ok(())
                    }),
                ],
                ..Settings::default()
            },
            |_: &[u8]| {},
        );

        let mut chunk = vec![0u8; BODY_READ_CHUNK_SIZE];
        loop {
            let read = reader
                .read(&mut chunk)
                .map_err(|e| ParseError::Html(format!("read failed: {e}")))?;
            if read == 0 {
                break;
            }
            rewriter
                .write(&chunk[..read])
                .map_err(|e| ParseError::Html(e.to_string()))?;
        }
        rewriter
            .end()
            .map_err(|e| ParseError::Html(e.to_string()))?;
    }

    let mut seen = HashSet::new();
    Ok(found
        .into_inner()
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect())
}

/// Parses resolved asset references, logging and skipping malformed ones.
pub fn parse_asset_urls(raw: Vec<String>) -> Vec<Url> {
    raw.into_iter()
        .filter_map(|raw| match Url::parse(&raw) {
            Ok(url) => Some(url),
            Err(e) => {
                let err = ParseError::AssetUrl {
                    raw,
                    reason: e.to_string(),
                };
                log::warn!("{err}");
                None
            }
        })
        .collect()
}
