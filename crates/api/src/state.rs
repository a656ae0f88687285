use std::sync::Arc;

use core_sim::{Asset, MarketSnapshot, RiskLevel, Signal};
use runtime::{FeedMode, MarketHandle};

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct FeedHealthResponse {
    pub mode: FeedMode,
    pub tick: u64,
    pub revision: u64,
    pub merged: u64,
    pub dropped: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEntry {
    pub symbol: String,
    pub price: f64,
    pub signal: Signal,
    pub confidence: f64,
    pub risk: RiskLevel,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl From<&Asset> for SignalEntry {
    fn from(asset: &Asset) -> Self {
        Self {
            symbol: asset.symbol.clone(),
            price: asset.price,
            signal: asset.signal,
            confidence: asset.confidence,
            risk: asset.risk,
            stop_loss: asset.stop_loss,
            take_profit: asset.take_profit,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
pub struct FeedAcceptedResponse {
    pub accepted: usize,
    pub dropped: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Messages pushed over the market WebSocket.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum StreamEvent<'a> {
    Connected(&'a MarketSnapshot),
    MarketUpdate(&'a MarketSnapshot),
}

#[derive(Clone, Debug)]
pub struct AppState {
    market: MarketHandle,
}

impl AppState {
    pub fn new(market: MarketHandle) -> Self {
        Self { market }
    }

    pub fn market(&self) -> &MarketHandle {
        &self.market
    }

    pub fn snapshot(&self) -> Arc<MarketSnapshot> {
        self.market.snapshot()
    }

    pub fn signals(&self) -> Vec<SignalEntry> {
        self.snapshot().assets().iter().map(SignalEntry::from).collect()
    }

    pub fn feed_health(&self) -> FeedHealthResponse {
        let snapshot = self.snapshot();
        let counts = self.market.feed_counts();
        FeedHealthResponse {
            mode: self.market.mode(),
            tick: snapshot.tick(),
            revision: snapshot.revision(),
            merged: counts.merged,
            dropped: counts.dropped,
        }
    }
}
