//! HTML parsing for asset discovery.
//!
//! This module finds the static resources a page loads:
//! - Stylesheets and shortcut icons (`<link href>`)
//! - Scripts (`<script src>`)
//! - Images (`<img src>`)
//!
//! Parsing streams the body through `lol_html`; no DOM is built. Assets of
//! assets are never looked at.

mod assets;

// Re-export public API
pub use assets::{extract_assets, parse_asset_urls, resolve_asset_url};
