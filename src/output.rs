//! On-disk layout of a cloned site.
//!
//! One directory per clone: `index.html` at the root, the extracted
//! stylesheet under `css/`, and every downloaded asset under `assets/`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::capture::{ASSET_SUBFOLDER, STYLESHEET_RELPATH};

const OUTPUT_TAG: &str = "cloned";

/// Filename of the rewritten document at the output root.
pub const DOCUMENT_FILENAME: &str = "index.html";

/// Resolved output directory for one clone.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Default layout next to the working directory, named after the
    /// target host. An explicit port joins the name with an underscore.
    pub fn for_target(target: &Url) -> Self {
        let host = target.host_str().unwrap_or_default();
        let root = match target.port() {
            Some(port) => PathBuf::from(format!("{OUTPUT_TAG}_{host}_{port}")),
            None => PathBuf::from(format!("{OUTPUT_TAG}_{host}")),
        };
        Self { root }
    }

    /// Layout rooted at a caller-chosen directory.
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and its `assets/` and `css/` subdirectories.
    pub async fn prepare(&self) -> Result<()> {
        let assets = self.root.join(ASSET_SUBFOLDER);
        tokio::fs::create_dir_all(&assets)
            .await
            .with_context(|| format!("failed to create {}", assets.display()))?;

        if let Some(css_dir) = Path::new(STYLESHEET_RELPATH).parent() {
            let css_dir = self.root.join(css_dir);
            tokio::fs::create_dir_all(&css_dir)
                .await
                .with_context(|| format!("failed to create {}", css_dir.display()))?;
        }

        Ok(())
    }

    /// Write the rewritten document to `index.html`.
    pub async fn write_document(&self, html: &str) -> Result<PathBuf> {
        let path = self.root.join(DOCUMENT_FILENAME);
        tokio::fs::write(&path, html)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write the rewritten stylesheet to `css/styles.css`.
    pub async fn write_stylesheet(&self, css: &str) -> Result<PathBuf> {
        let path = self.root.join(STYLESHEET_RELPATH);
        tokio::fs::write(&path, css)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
