//! Renderer abstraction for browser-based page capture.
//!
//! Defines the `RenderSession` trait that abstracts over the browser
//! engine (currently Chromium via chromiumoxide) so the clone pipeline
//! can be driven against a stub in tests.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capture::RenderedPage;

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationOutcome {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A live browser page the cloner drives through one capture.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationOutcome>;
    /// Scroll through the page so lazy-loaded content mounts, then give the
    /// page `settle_ms` to finish loading what the scroll triggered.
    async fn trigger_lazy_content(&self, settle_ms: u64) -> Result<()>;
    /// Snapshot the rendered document: serialized DOM, base URL, and the
    /// aggregate text of all same-origin stylesheets.
    async fn snapshot(&self) -> Result<RenderedPage>;
    /// Close this session.
    async fn close(self: Box<Self>) -> Result<()>;
}
