// Copyright 2026 Sitegrab Contributors
// SPDX-License-Identifier: Apache-2.0

//! Asset discovery, deduplication, and reference rewriting.
//!
//! The capture stage is pure: it consumes a [`RenderedPage`] snapshot taken
//! from the browser session and produces rewritten HTML/CSS text plus the
//! ordered asset list for the fetch stage. No I/O happens here, which is
//! what keeps the whole stage testable against fixture documents.

pub mod registry;
pub mod resolver;
pub mod rewriter;
pub mod scanner;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Destination subfolder shared by all asset categories.
pub const ASSET_SUBFOLDER: &str = "assets";

/// Stylesheet path relative to the output root. The HTML pass injects a
/// `<link>` to it, and the CSS pass rewrites asset URLs relative to its
/// parent directory.
pub const STYLESHEET_RELPATH: &str = "css/styles.css";

/// Matches absolute-HTTP(S) `url(...)` occurrences in stylesheet text.
/// Shared by the scanner and the CSS rewrite pass so lookups always agree.
pub(crate) const CSS_URL_PATTERN: &str = r#"url\(["']?(https?://[^"')]+)["']?\)"#;

/// Snapshot of a rendered document, read from the browser session after
/// navigation and the lazy-content scroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Serialized `document.documentElement.outerHTML`.
    pub html: String,
    /// The document's effective base URL. Read from the rendered page, so
    /// any `<base>` element is already accounted for.
    pub base_url: String,
    /// Concatenated rule text of every reachable stylesheet.
    pub css: String,
}

/// Classification tag controlling the local filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Image,
    Background,
    Media,
    CssAsset,
}

impl AssetCategory {
    /// Filename prefix for this category.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Image => "img",
            Self::Background => "bg",
            Self::Media => "media",
            Self::CssAsset => "css_asset",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// One entry of the final asset list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    /// The URL the fetch driver retrieves, exactly as registered.
    pub url: String,
    /// Path relative to the output root where the bytes land.
    pub local_path: String,
}

/// Everything the capture stage hands to the fetch/persist driver.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Rewritten document markup, doctype-prefixed.
    pub html: String,
    /// Rewritten aggregate stylesheet text.
    pub css: String,
    /// Registered assets in first-registration order.
    pub assets: Vec<AssetEntry>,
}

/// Run the full capture pass over a snapshot: scan, then rewrite.
///
/// The registry is frozen between the two steps; the rewriter never
/// registers anything new.
pub fn collect(page: &RenderedPage) -> Result<CaptureResult> {
    let registry = scanner::scan(page)?;
    let css = rewriter::rewrite_css(&page.css, &registry);
    let html = rewriter::rewrite_html(&page.html, &registry);
    let assets = registry
        .records()
        .iter()
        .map(|record| AssetEntry {
            url: record.resolved_url.clone(),
            local_path: record.local_path.clone(),
        })
        .collect();
    Ok(CaptureResult { html, css, assets })
}
