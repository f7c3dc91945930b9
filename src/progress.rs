// Copyright 2026 Sitegrab Contributors
// SPDX-License-Identifier: Apache-2.0

//! Broadcast progress events for long-running clone operations.
//!
//! The cloner emits events as it works; the CLI subscribes and renders
//! them as console lines. Other frontends can subscribe to the same
//! channel. Emission never blocks and never fails: with no receivers the
//! events are simply dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffered events per subscriber before lag kicks in.
const CHANNEL_CAPACITY: usize = 256;

pub type ProgressSender = broadcast::Sender<CloneEvent>;
pub type ProgressReceiver = broadcast::Receiver<CloneEvent>;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClonePhase {
    Navigate,
    Scroll,
    Collect,
    Fetch,
}

impl std::fmt::Display for ClonePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClonePhase::Navigate => "Navigate",
            ClonePhase::Scroll => "Scroll",
            ClonePhase::Collect => "Collect",
            ClonePhase::Fetch => "Fetch",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CloneEvent {
    /// A pipeline phase began.
    PhaseStarted { phase: ClonePhase, message: String },
    /// Something non-fatal went wrong; the clone continues.
    Warning { message: String },
    /// One asset landed on disk. `index` is 1-based over `total`.
    AssetFetched {
        index: usize,
        total: usize,
        local_path: String,
        bytes: u64,
    },
    /// One asset could not be fetched.
    AssetFailed {
        index: usize,
        total: usize,
        url: String,
        reason: String,
    },
    /// An output file was written, path relative to the output root.
    OutputSaved { path: String },
}

/// New progress channel with the standard capacity.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    broadcast::channel(CHANNEL_CAPACITY)
}

/// Emit an event if a sender is wired up, ignoring closed-channel errors.
pub fn emit(tx: &Option<ProgressSender>, event: CloneEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event);
    }
}
