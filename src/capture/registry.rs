//! Deduplicating asset table keyed by resolved URL.

use std::collections::HashMap;

use serde::Serialize;
use url::Url;

use crate::capture::{AssetCategory, ASSET_SUBFOLDER};

/// Fallback extension when the URL path carries no usable suffix.
const GENERIC_EXTENSION: &str = "bin";

/// One discovered asset: its canonical URL, the local path assigned at
/// first sighting, and every alternate literal the document used for it.
#[derive(Debug, Clone, Serialize)]
pub struct AssetRecord {
    pub resolved_url: String,
    pub local_path: String,
    pub category: AssetCategory,
    /// Alternate reference literals, insertion-ordered and duplicate-free so
    /// the rewrite pass is deterministic run to run.
    pub originals: Vec<String>,
}

/// Write-once-per-URL table populated during the scan pass and read-only
/// afterwards. The sequence counter is shared across all categories, so
/// local filenames never collide.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    records: Vec<AssetRecord>,
    by_url: HashMap<String, usize>,
    next_seq: usize,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sighting of `resolved_url`.
    ///
    /// The first sighting assigns `assets/<category>_<seq>.<ext>` and
    /// consumes a sequence number; later sightings only accumulate new
    /// alternate literals. The assigned local path is never changed, and a
    /// literal equal to the key itself is not stored as an alternate.
    pub fn register(
        &mut self,
        resolved_url: &str,
        original: Option<&str>,
        category: AssetCategory,
    ) -> &str {
        if let Some(&idx) = self.by_url.get(resolved_url) {
            if let Some(orig) = original {
                let record = &mut self.records[idx];
                if orig != resolved_url && !record.originals.iter().any(|o| o == orig) {
                    record.originals.push(orig.to_string());
                }
            }
            return &self.records[idx].local_path;
        }

        let ext = path_extension(resolved_url);
        let local_path = format!("{}/{}_{}.{}", ASSET_SUBFOLDER, category, self.next_seq, ext);
        self.next_seq += 1;

        let mut originals = Vec::new();
        if let Some(orig) = original {
            if orig != resolved_url {
                originals.push(orig.to_string());
            }
        }

        let idx = self.records.len();
        self.by_url.insert(resolved_url.to_string(), idx);
        self.records.push(AssetRecord {
            resolved_url: resolved_url.to_string(),
            local_path,
            category,
            originals,
        });
        &self.records[idx].local_path
    }

    /// Look up a record by its exact key.
    pub fn get(&self, resolved_url: &str) -> Option<&AssetRecord> {
        self.by_url.get(resolved_url).map(|&idx| &self.records[idx])
    }

    /// All records in first-registration order. This is also the fetch and
    /// progress-reporting order.
    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Last dot-delimited suffix of the URL's final path segment, or `bin`.
///
/// Query and fragment never contribute, and a suffix containing anything
/// other than ASCII alphanumerics is treated as absent.
fn path_extension(resolved_url: &str) -> String {
    let path = match Url::parse(resolved_url) {
        Ok(url) => url.path().to_string(),
        // Keys are normally parseable URLs; fall back to a plain strip.
        Err(_) => {
            let without_fragment = resolved_url.split('#').next().unwrap_or("");
            without_fragment.split('?').next().unwrap_or("").to_string()
        }
    };

    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ext.to_string()
        }
        _ => GENERIC_EXTENSION.to_string(),
    }
}
