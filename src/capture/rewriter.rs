//! Text-substitution passes that point the captured page at local files.

use regex::Regex;

use crate::capture::registry::AssetRegistry;
use crate::capture::{CSS_URL_PATTERN, STYLESHEET_RELPATH};

/// Replace registered `url(...)` targets in the aggregate stylesheet with
/// quoted references relative to the css/ folder. Unregistered targets are
/// left exactly as matched.
pub fn rewrite_css(css: &str, registry: &AssetRegistry) -> String {
    let url_re = Regex::new(CSS_URL_PATTERN).expect("css url pattern is valid");
    url_re
        .replace_all(css, |caps: &regex::Captures<'_>| {
            let target = caps.get(1).map_or("", |m| m.as_str());
            match registry.get(target) {
                Some(record) => format!("url(\"../{}\")", record.local_path),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Substitute every known spelling of every registered asset with its local
/// path, then link the extracted stylesheet and prepend a doctype.
///
/// Replacement is plain global text substitution in registry order: first
/// the resolved URL, then each literal the scan saw. A literal that happens
/// to occur in unrelated text is rewritten too; the output stays consistent
/// because every occurrence of one spelling maps to one local path.
pub fn rewrite_html(html: &str, registry: &AssetRegistry) -> String {
    let mut out = html.to_string();
    for record in registry.records() {
        out = out.replace(&record.resolved_url, &record.local_path);
        for original in &record.originals {
            out = out.replace(original, &record.local_path);
        }
    }

    if let Some(pos) = out.find("</head>") {
        out.insert_str(
            pos,
            &format!("<link rel=\"stylesheet\" href=\"{STYLESHEET_RELPATH}\">\n"),
        );
    }

    format!("<!DOCTYPE html>\n{out}")
}
