//! Fixed-precedence walk of the rendered document for asset references.

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::capture::registry::AssetRegistry;
use crate::capture::{resolver, AssetCategory, RenderedPage, CSS_URL_PATTERN};

/// Populate a fresh registry from a page snapshot.
///
/// Precedence is fixed: image `src`/`srcset`, `<picture>` sources, inline
/// `style` backgrounds, media and icon elements, then aggregate stylesheet
/// text. Later sightings of an already-registered URL only add alternate
/// literals, so earlier categories win the filename prefix.
pub fn scan(page: &RenderedPage) -> Result<AssetRegistry> {
    let base = Url::parse(&page.base_url)
        .with_context(|| format!("document base URL `{}` is not absolute", page.base_url))?;
    let doc = Html::parse_document(&page.html);
    let mut registry = AssetRegistry::new();

    scan_images(&doc, &base, &mut registry);
    scan_picture_sources(&doc, &base, &mut registry);
    scan_inline_styles(&doc, &base, &mut registry);
    scan_media_and_icons(&doc, &base, &mut registry);
    scan_stylesheet_text(&page.css, &mut registry);

    debug!("scan registered {} assets", registry.len());
    Ok(registry)
}

/// Image `src` plus every `srcset` candidate.
fn scan_images(doc: &Html, base: &Url, registry: &mut AssetRegistry) {
    let sel = Selector::parse("img").unwrap();
    for img in doc.select(&sel) {
        if let Some(src) = img.value().attr("src") {
            track_reference(registry, base, src, AssetCategory::Image);
        }
        if let Some(srcset) = img.value().attr("srcset") {
            track_srcset(registry, base, srcset, AssetCategory::Image);
        }
    }
}

/// `<picture>` child sources carry responsive candidates in `srcset`.
fn scan_picture_sources(doc: &Html, base: &Url, registry: &mut AssetRegistry) {
    let sel = Selector::parse("picture source[srcset]").unwrap();
    for source in doc.select(&sel) {
        if let Some(srcset) = source.value().attr("srcset") {
            track_srcset(registry, base, srcset, AssetCategory::Image);
        }
    }
}

/// Inline `style` attributes: every `url(...)` occurrence, quotes optional.
fn scan_inline_styles(doc: &Html, base: &Url, registry: &mut AssetRegistry) {
    let sel = Selector::parse(r#"[style*="url"]"#).unwrap();
    let url_re = Regex::new(r#"url\(["']?(.*?)["']?\)"#).expect("style url pattern is valid");
    for element in doc.select(&sel) {
        let Some(style) = element.value().attr("style") else {
            continue;
        };
        for caps in url_re.captures_iter(style) {
            let reference = caps.get(1).map_or("", |m| m.as_str());
            track_reference(registry, base, reference, AssetCategory::Background);
        }
    }
}

/// Video/audio sources, `src`-bearing media elements, and icon links. The
/// alternate literal is the raw `src` (or `href`) attribute text.
fn scan_media_and_icons(doc: &Html, base: &Url, registry: &mut AssetRegistry) {
    let sel = Selector::parse(
        r#"video source, video[src], audio source, audio[src], link[rel*="icon"]"#,
    )
    .unwrap();
    for element in doc.select(&sel) {
        let value = element.value();
        let Some(reference) = value.attr("src").or_else(|| value.attr("href")) else {
            continue;
        };
        track_reference(registry, base, reference, AssetCategory::Media);
    }
}

/// Aggregate stylesheet text: absolute-HTTP(S) `url(...)` targets only,
/// keyed by the literal matched text so the CSS rewrite lookup always
/// agrees. Relative `url()` forms are left for the browser-relative CSS to
/// carry as-is.
fn scan_stylesheet_text(css: &str, registry: &mut AssetRegistry) {
    let url_re = Regex::new(CSS_URL_PATTERN).expect("css url pattern is valid");
    for caps in url_re.captures_iter(css) {
        if let Some(target) = caps.get(1) {
            registry.register(target.as_str(), None, AssetCategory::CssAsset);
        }
    }
}

/// Each comma-separated srcset candidate contributes its first
/// whitespace-delimited token; descriptors (`1x`, `480w`) are dropped.
fn track_srcset(registry: &mut AssetRegistry, base: &Url, srcset: &str, category: AssetCategory) {
    for candidate in srcset.split(',') {
        if let Some(reference) = candidate.split_whitespace().next() {
            track_reference(registry, base, reference, category);
        }
    }
}

/// Resolve one literal and register it. Rejected references (inline
/// schemes, malformed strings, empty attributes) are skipped; a single bad
/// reference never aborts the scan.
fn track_reference(registry: &mut AssetRegistry, base: &Url, literal: &str, category: AssetCategory) {
    if literal.is_empty() {
        return;
    }
    match resolver::resolve(literal, base) {
        Ok(resolved) => {
            registry.register(resolved.as_str(), Some(literal), category);
        }
        Err(err) => debug!("skipping reference `{literal}`: {err}"),
    }
}
