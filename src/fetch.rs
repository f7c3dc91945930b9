//! Parallel asset downloads over plain HTTP.
//!
//! Not a browser. Assets already rendered by the page are re-fetched
//! directly with reqwest and written under the output root.

use std::path::Path;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::debug;

use crate::capture::AssetEntry;
use crate::progress::{self, CloneEvent, ProgressSender};

/// Why a single asset download failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Tally of one download batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchReport {
    pub fetched: usize,
    pub failed: usize,
}

/// Downloads assets with a standard Chrome user-agent.
#[derive(Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
}

impl AssetFetcher {
    pub fn new(timeout: Duration) -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Download every asset with bounded concurrency, writing each to its
    /// local path under `out_root`. One failed asset never aborts the
    /// batch. Emitted event indices follow registry order, 1-based.
    pub async fn fetch_all(
        &self,
        assets: &[AssetEntry],
        out_root: &Path,
        concurrency: usize,
        progress: &Option<ProgressSender>,
    ) -> FetchReport {
        let total = assets.len();
        let mut downloads = stream::iter(assets.iter().enumerate())
            .map(|(i, entry)| {
                let fetcher = self.clone();
                let url = entry.url.clone();
                let local_path = entry.local_path.clone();
                let dest = out_root.join(&entry.local_path);
                async move {
                    let outcome = fetcher.fetch_one(&url, &dest).await;
                    (i + 1, url, local_path, outcome)
                }
            })
            .buffer_unordered(concurrency.max(1));

        let mut report = FetchReport::default();
        while let Some((index, url, local_path, outcome)) = downloads.next().await {
            match outcome {
                Ok(bytes) => {
                    report.fetched += 1;
                    progress::emit(
                        progress,
                        CloneEvent::AssetFetched {
                            index,
                            total,
                            local_path,
                            bytes,
                        },
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    debug!("fetch failed for {url}: {err}");
                    progress::emit(
                        progress,
                        CloneEvent::AssetFailed {
                            index,
                            total,
                            url,
                            reason: err.to_string(),
                        },
                    );
                }
            }
        }

        report
    }

    /// GET one URL and write the body to `dest`, creating parent
    /// directories as needed. Returns the byte count written.
    pub async fn fetch_one(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &body).await?;

        Ok(body.len() as u64)
    }
}
