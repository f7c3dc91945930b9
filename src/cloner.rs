//! The clone pipeline: navigate, settle, capture, rewrite, persist.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use url::Url;

use crate::capture::{self, STYLESHEET_RELPATH};
use crate::fetch::AssetFetcher;
use crate::output::{OutputLayout, DOCUMENT_FILENAME};
use crate::progress::{self, CloneEvent, ClonePhase, ProgressSender};
use crate::renderer::RenderSession;

pub const DEFAULT_NAV_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_SETTLE_MS: u64 = 2_000;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;
pub const DEFAULT_VIEWPORT: (u32, u32) = (1920, 1080);

/// Per-asset download timeout. Asset fetches are plain GETs; anything
/// slower than this is treated as failed rather than stalling the batch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to clone one page.
#[derive(Debug, Clone)]
pub struct CloneRequest {
    /// Target page, scheme optional (`https://` is assumed).
    pub url: String,
    /// Output directory override. Defaults to `cloned_<host>` in the
    /// working directory.
    pub output: Option<PathBuf>,
    pub nav_timeout_ms: u64,
    pub settle_ms: u64,
    pub fetch_concurrency: usize,
    pub viewport: (u32, u32),
}

impl CloneRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output: None,
            nav_timeout_ms: DEFAULT_NAV_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            viewport: DEFAULT_VIEWPORT,
        }
    }
}

/// What a finished clone produced.
#[derive(Debug, Clone)]
pub struct CloneReport {
    pub output_root: PathBuf,
    pub assets_total: usize,
    pub assets_fetched: usize,
    pub assets_failed: usize,
    pub elapsed_ms: u64,
}

/// Drives a render session through one full clone.
#[derive(Default)]
pub struct Cloner {
    progress: Option<ProgressSender>,
}

impl Cloner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cloner that reports progress on the given channel.
    pub fn with_progress(tx: ProgressSender) -> Self {
        Self { progress: Some(tx) }
    }

    /// Run the pipeline against an already-launched session.
    ///
    /// Navigation trouble is non-fatal: a timed-out page is captured in
    /// whatever state it reached. Everything after the snapshot operates
    /// on plain strings and local files.
    pub async fn run(
        &self,
        request: &CloneRequest,
        mut session: Box<dyn RenderSession>,
    ) -> Result<CloneReport> {
        let started = Instant::now();
        let target = normalize_target(&request.url)?;

        let layout = match &request.output {
            Some(root) => OutputLayout::at(root.clone()),
            None => OutputLayout::for_target(&target),
        };
        layout.prepare().await?;

        progress::emit(
            &self.progress,
            CloneEvent::PhaseStarted {
                phase: ClonePhase::Navigate,
                message: format!("Loading {target} ..."),
            },
        );
        match session.navigate(target.as_str(), request.nav_timeout_ms).await {
            Ok(nav) => info!(
                "page loaded: final_url={}, load_time={}ms",
                nav.final_url, nav.load_time_ms
            ),
            Err(err) => {
                warn!("navigation did not complete: {err:#}");
                progress::emit(
                    &self.progress,
                    CloneEvent::Warning {
                        message: format!("page load issue ({err}), continuing anyway..."),
                    },
                );
            }
        }

        progress::emit(
            &self.progress,
            CloneEvent::PhaseStarted {
                phase: ClonePhase::Scroll,
                message: "Scrolling page to load lazy content...".to_string(),
            },
        );
        if let Err(err) = session.trigger_lazy_content(request.settle_ms).await {
            debug!("lazy-content scroll failed: {err:#}");
        }

        progress::emit(
            &self.progress,
            CloneEvent::PhaseStarted {
                phase: ClonePhase::Collect,
                message: "Collecting page data...".to_string(),
            },
        );
        let page = session
            .snapshot()
            .await
            .context("could not snapshot the rendered page")?;
        let result = capture::collect(&page)?;
        info!("page data collected: {} assets registered", result.assets.len());

        progress::emit(
            &self.progress,
            CloneEvent::PhaseStarted {
                phase: ClonePhase::Fetch,
                message: format!("Downloading {} assets...", result.assets.len()),
            },
        );
        let fetch_report = AssetFetcher::new(FETCH_TIMEOUT)
            .fetch_all(
                &result.assets,
                layout.root(),
                request.fetch_concurrency,
                &self.progress,
            )
            .await;

        layout.write_stylesheet(&result.css).await?;
        progress::emit(
            &self.progress,
            CloneEvent::OutputSaved {
                path: STYLESHEET_RELPATH.to_string(),
            },
        );
        layout.write_document(&result.html).await?;
        progress::emit(
            &self.progress,
            CloneEvent::OutputSaved {
                path: DOCUMENT_FILENAME.to_string(),
            },
        );

        if let Err(err) = session.close().await {
            debug!("browser session close failed: {err:#}");
        }

        let output_root = layout
            .root()
            .canonicalize()
            .unwrap_or_else(|_| layout.root().to_path_buf());

        Ok(CloneReport {
            output_root,
            assets_total: result.assets.len(),
            assets_fetched: fetch_report.fetched,
            assets_failed: fetch_report.failed,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

/// Validate and complete a user-supplied target. A bare `host/path` gets
/// an `https://` prefix; an empty string is an error before any browser
/// or network activity starts.
pub fn normalize_target(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("no target URL provided");
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    Url::parse(&candidate).with_context(|| format!("invalid target URL `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefixes_bare_hosts() {
        let url = normalize_target("example.com/shop").unwrap();
        assert_eq!(url.as_str(), "https://example.com/shop");
    }

    #[test]
    fn test_normalize_keeps_explicit_schemes() {
        assert_eq!(
            normalize_target("http://example.com/").unwrap().as_str(),
            "http://example.com/"
        );
        assert_eq!(
            normalize_target("https://example.com/").unwrap().as_str(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_normalize_rejects_empty_input() {
        assert!(normalize_target("").is_err());
        assert!(normalize_target("   ").is_err());
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_target("https://[half-open").is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request = CloneRequest::new("example.com");
        assert_eq!(request.nav_timeout_ms, DEFAULT_NAV_TIMEOUT_MS);
        assert_eq!(request.settle_ms, DEFAULT_SETTLE_MS);
        assert_eq!(request.fetch_concurrency, DEFAULT_FETCH_CONCURRENCY);
        assert_eq!(request.viewport, DEFAULT_VIEWPORT);
        assert!(request.output.is_none());
    }
}
