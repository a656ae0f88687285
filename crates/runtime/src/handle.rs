use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use core_sim::{AssetUpdate, MarketSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedMode {
    /// Synthetic ticks only.
    Sim,
    /// External updates only.
    Live,
    Hybrid,
}

impl FeedMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sim" => Some(Self::Sim),
            "live" => Some(Self::Live),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sim => "sim",
            Self::Live => "live",
            Self::Hybrid => "hybrid",
        }
    }

    pub fn ticks_enabled(self) -> bool {
        matches!(self, Self::Sim | Self::Hybrid)
    }

    pub fn accepts_feed(self) -> bool {
        matches!(self, Self::Live | Self::Hybrid)
    }
}

#[derive(Debug, Default)]
pub struct FeedStats {
    merged: AtomicU64,
    dropped: AtomicU64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct FeedCounts {
    pub merged: u64,
    pub dropped: u64,
}

impl FeedStats {
    pub fn record_merged(&self) {
        self.merged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn counts(&self) -> FeedCounts {
        FeedCounts {
            merged: self.merged.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SubmitError {
    #[error("feed updates are disabled in this mode")]
    FeedDisabled,
    #[error("market runtime is not running")]
    RuntimeStopped,
}

/// Cloneable reader/submitter side of a running market runtime.
#[derive(Clone, Debug)]
pub struct MarketHandle {
    snapshots: watch::Receiver<Arc<MarketSnapshot>>,
    updates: mpsc::Sender<AssetUpdate>,
    stats: Arc<FeedStats>,
    mode: FeedMode,
}

impl MarketHandle {
    pub(crate) fn new(
        snapshots: watch::Receiver<Arc<MarketSnapshot>>,
        updates: mpsc::Sender<AssetUpdate>,
        stats: Arc<FeedStats>,
        mode: FeedMode,
    ) -> Self {
        Self {
            snapshots,
            updates,
            stats,
            mode,
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<MarketSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<MarketSnapshot>> {
        self.snapshots.clone()
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn feed_counts(&self) -> FeedCounts {
        self.stats.counts()
    }

    pub fn record_dropped(&self, count: u64) {
        self.stats.record_dropped(count);
    }

    pub async fn submit(&self, update: AssetUpdate) -> Result<(), SubmitError> {
        if !self.mode.accepts_feed() {
            return Err(SubmitError::FeedDisabled);
        }

        self.updates
            .send(update)
            .await
            .map_err(|_| SubmitError::RuntimeStopped)
    }
}
