//! Chromium-based render session using chromiumoxide.

use super::{NavigationOutcome, RenderSession};
use crate::capture::RenderedPage;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Incremental scroll that walks the whole page so lazy loaders fire, then
/// jumps back to the top. Step count is capped so an infinite-scroll feed
/// cannot keep the capture alive forever.
const SCROLL_JS: &str = r#"
async () => {
  await new Promise((resolve) => {
    const step = 300;
    let total = 0;
    const timer = setInterval(() => {
      window.scrollBy(0, step);
      total += step;
      if (total >= document.body.scrollHeight || total >= step * 120) {
        clearInterval(timer);
        window.scrollTo(0, 0);
        resolve();
      }
    }, 100);
  });
}
"#;

/// Concatenate the rule text of every readable stylesheet. Cross-origin
/// sheets throw on cssRules access and are skipped.
const STYLE_TEXT_JS: &str = r#"
() => {
  let css = "";
  for (const sheet of document.styleSheets) {
    try {
      for (const rule of sheet.cssRules) {
        css += rule.cssText + "\n";
      }
    } catch (err) {
      // cross-origin stylesheet
    }
  }
  return css;
}
"#;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. SITEGRAB_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("SITEGRAB_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 3. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A headless Chromium instance pinned to a single page.
pub struct ChromiumSession {
    // Kept alive for the duration of the session; dropping it tears down
    // the child process.
    _browser: Browser,
    page: Page,
}

impl ChromiumSession {
    /// Launch headless Chromium with the given viewport and open a blank page.
    pub async fn launch(viewport: (u32, u32)) -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found. Install Chrome/Chromium or set SITEGRAB_CHROMIUM_PATH.")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(viewport.0, viewport.1)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        Ok(Self {
            _browser: browser,
            page,
        })
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationOutcome> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.page.goto(url),
        )
        .await;

        match result {
            Ok(Ok(_response)) => {
                // Give in-flight subresources the rest of the budget.
                let remaining = timeout_ms
                    .saturating_sub(start.elapsed().as_millis() as u64)
                    .max(1);
                let _ = tokio::time::timeout(
                    Duration::from_millis(remaining),
                    self.page.wait_for_navigation(),
                )
                .await;

                let final_url = self
                    .page
                    .url()
                    .await
                    .unwrap_or_default()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| url.to_string());

                Ok(NavigationOutcome {
                    final_url,
                    load_time_ms: start.elapsed().as_millis() as u64,
                })
            }
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {timeout_ms}ms"),
        }
    }

    async fn trigger_lazy_content(&self, settle_ms: u64) -> Result<()> {
        self.page
            .evaluate_function(SCROLL_JS)
            .await
            .context("scroll script failed")?;
        tokio::time::sleep(Duration::from_millis(settle_ms)).await;
        Ok(())
    }

    async fn snapshot(&self) -> Result<RenderedPage> {
        let html: String = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to get HTML")?
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))?;

        let base_url: String = self
            .page
            .evaluate("document.baseURI")
            .await
            .context("failed to get base URL")?
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert base URL result: {e:?}"))?;

        let css: String = self
            .page
            .evaluate_function(STYLE_TEXT_JS)
            .await
            .context("failed to read stylesheet text")?
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert stylesheet result: {e:?}"))?;

        Ok(RenderedPage {
            html,
            base_url,
            css,
        })
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let _ = self.page.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_chromium_navigate_and_snapshot() {
        let session = ChromiumSession::launch((1280, 720))
            .await
            .expect("failed to launch browser");
        let mut session: Box<dyn RenderSession> = Box::new(session);

        let nav = session
            .navigate("data:text/html,<h1>Hello</h1><p>World</p>", 10000)
            .await
            .expect("navigation failed");
        assert!(nav.load_time_ms < 10000);

        session
            .trigger_lazy_content(100)
            .await
            .expect("scroll failed");

        let page = session.snapshot().await.expect("snapshot failed");
        assert!(page.html.contains("<h1>Hello</h1>"));
        assert!(page.html.contains("<p>World</p>"));
        assert!(page.base_url.starts_with("data:"));

        session.close().await.expect("close failed");
    }
}
