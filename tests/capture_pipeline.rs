//! Capture Pipeline Integration Test
//!
//! Drives scan + rewrite over a realistic rendered-page snapshot and checks
//! the full contract: discovery order, shared numbering, category prefixes,
//! reference rewriting in both HTML and CSS, and output invariants.

use sitegrab::capture::{self, RenderedPage};

// ── Snapshot Builders ──

fn snapshot(html: &str, base_url: &str, css: &str) -> RenderedPage {
    RenderedPage {
        html: html.to_string(),
        base_url: base_url.to_string(),
        css: css.to_string(),
    }
}

fn storefront() -> RenderedPage {
    let html = r#"<html>
<head>
  <title>Shop</title>
  <link rel="shortcut icon" href="/favicon.ico">
</head>
<body>
  <img src="/logo.png" srcset="/logo.png 1x, /logo@2x.png 2x">
  <picture>
    <source srcset="hero-small.webp 480w, hero-large.webp 1080w">
    <img src="hero.jpg">
  </picture>
  <div style="background-image: url('https://cdn.example.com/bg.jpg')">promo</div>
  <video src="/media/intro.mp4"></video>
  <audio><source src="theme.ogg"></audio>
</body>
</html>"#;
    let css = r#".hero { background: url("https://cdn.example.com/fonts/face.woff2"); }
.other { background: url(/relative/skip.png); }"#;
    snapshot(html, "https://example.com/shop/", css)
}

// ── Tests ──

#[test]
fn test_storefront_asset_inventory() {
    let result = capture::collect(&storefront()).unwrap();

    let inventory: Vec<(&str, &str)> = result
        .assets
        .iter()
        .map(|a| (a.url.as_str(), a.local_path.as_str()))
        .collect();

    assert_eq!(
        inventory,
        [
            ("https://example.com/logo.png", "assets/img_0.png"),
            ("https://example.com/logo@2x.png", "assets/img_1.png"),
            ("https://example.com/shop/hero.jpg", "assets/img_2.jpg"),
            ("https://example.com/shop/hero-small.webp", "assets/img_3.webp"),
            ("https://example.com/shop/hero-large.webp", "assets/img_4.webp"),
            ("https://cdn.example.com/bg.jpg", "assets/bg_5.jpg"),
            ("https://example.com/favicon.ico", "assets/media_6.ico"),
            ("https://example.com/media/intro.mp4", "assets/media_7.mp4"),
            ("https://example.com/shop/theme.ogg", "assets/media_8.ogg"),
            (
                "https://cdn.example.com/fonts/face.woff2",
                "assets/css_asset_9.woff2"
            ),
        ]
    );
}

#[test]
fn test_storefront_html_rewrite() {
    let result = capture::collect(&storefront()).unwrap();

    assert!(result.html.starts_with("<!DOCTYPE html>\n"));
    assert!(result
        .html
        .contains(r#"<link rel="stylesheet" href="css/styles.css">"#));
    assert!(result
        .html
        .contains(r#"src="assets/img_0.png" srcset="assets/img_0.png 1x, assets/img_1.png 2x""#));
    assert!(result.html.contains(r#"<img src="assets/img_2.jpg">"#));
    assert!(result
        .html
        .contains("srcset=\"assets/img_3.webp 480w, assets/img_4.webp 1080w\""));
    assert!(result.html.contains("url('assets/bg_5.jpg')"));
    assert!(result.html.contains(r#"href="assets/media_6.ico""#));
    assert!(result.html.contains(r#"<video src="assets/media_7.mp4">"#));
    assert!(result.html.contains(r#"<source src="assets/media_8.ogg">"#));

    // No source spelling of any registered asset survives.
    assert!(!result.html.contains("/logo.png"));
    assert!(!result.html.contains("hero.jpg"));
    assert!(!result.html.contains("cdn.example.com"));
    assert!(!result.html.contains("/favicon.ico"));
}

#[test]
fn test_storefront_css_rewrite() {
    let result = capture::collect(&storefront()).unwrap();

    assert!(result
        .css
        .contains(r#"url("../assets/css_asset_9.woff2")"#));
    // Relative CSS references are not registered and stay untouched.
    assert!(result.css.contains("url(/relative/skip.png)"));
    assert!(!result.css.contains("cdn.example.com"));
}

#[test]
fn test_collect_is_deterministic() {
    let page = storefront();
    let first = capture::collect(&page).unwrap();
    let second = capture::collect(&page).unwrap();

    assert_eq!(first.html, second.html);
    assert_eq!(first.css, second.css);
    assert_eq!(first.assets.len(), second.assets.len());
    for (a, b) in first.assets.iter().zip(second.assets.iter()) {
        assert_eq!(a.url, b.url);
        assert_eq!(a.local_path, b.local_path);
    }
}

#[test]
fn test_inline_schemes_survive_untouched() {
    let page = snapshot(
        r#"<html><head></head><body>
          <img src="data:image/png;base64,iVBORw0KGgo=">
          <video src="blob:https://example.com/f7c2"></video>
          <img src="real.png">
        </body></html>"#,
        "https://example.com/",
        "",
    );

    let result = capture::collect(&page).unwrap();

    assert_eq!(result.assets.len(), 1);
    assert_eq!(result.assets[0].local_path, "assets/img_0.png");
    assert!(result
        .html
        .contains("data:image/png;base64,iVBORw0KGgo="));
    assert!(result.html.contains("blob:https://example.com/f7c2"));
}

#[test]
fn test_document_without_head_is_not_linked() {
    let page = snapshot("<p>fragment only</p>", "https://example.com/", "");

    let result = capture::collect(&page).unwrap();

    assert!(result.html.starts_with("<!DOCTYPE html>\n"));
    assert!(!result.html.contains("stylesheet"));
}

#[test]
fn test_replacement_is_textual_not_structural() {
    // A registered spelling inside body text is rewritten along with the
    // markup. That is the documented behavior of the substitution pass.
    let page = snapshot(
        r#"<html><head></head><body>
          <img src="banner.png">
          <p>Get banner.png while supplies last</p>
        </body></html>"#,
        "https://example.com/",
        "",
    );

    let result = capture::collect(&page).unwrap();

    assert!(result.html.contains(r#"<img src="assets/img_0.png">"#));
    assert!(result
        .html
        .contains("Get assets/img_0.png while supplies last"));
}

#[test]
fn test_base_path_resolution() {
    let page = snapshot(
        r#"<img src="../up.png"><img src="./here.png">"#,
        "https://example.com/a/b/",
        "",
    );

    let result = capture::collect(&page).unwrap();

    let urls: Vec<&str> = result.assets.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(
        urls,
        ["https://example.com/a/up.png", "https://example.com/a/b/here.png"]
    );
}
