use core_sim::{AssetUpdate, RiskLevel, Signal, Trend};
use serde_json::Value;
use thiserror::Error;

use crate::live::types::FeedMessage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFeedError {
    #[error("payload is not valid JSON")]
    InvalidJson,
    #[error("payload must be a JSON object or an array of objects")]
    UnsupportedPayload,
    #[error("feed message is not a valid market update")]
    InvalidMessage,
    #[error("feed message has no symbol")]
    MissingSymbol,
    #[error("unknown signal {0:?}")]
    UnknownSignal(String),
    #[error("unknown trend {0:?}")]
    UnknownTrend(String),
    #[error("unknown risk level {0:?}")]
    UnknownRiskLevel(String),
}

/// Result of parsing a feed payload. Malformed entries are dropped
/// individually; the rest of the batch still applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatch {
    pub updates: Vec<AssetUpdate>,
    pub rejected: Vec<ParseFeedError>,
}

/// Accepts a single message object or an array of them, as emitted by the
/// `market_update` stream.
pub fn parse_feed_payload(raw: &str) -> Result<FeedBatch, ParseFeedError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| ParseFeedError::InvalidJson)?;
    let entries = match value {
        Value::Array(entries) => entries,
        entry @ Value::Object(_) => vec![entry],
        _ => return Err(ParseFeedError::UnsupportedPayload),
    };

    let mut batch = FeedBatch::default();
    for entry in entries {
        match update_from_value(entry) {
            Ok(update) => batch.updates.push(update),
            Err(error) => {
                tracing::warn!(%error, "dropping malformed feed message");
                batch.rejected.push(error);
            }
        }
    }

    Ok(batch)
}

fn update_from_value(value: Value) -> Result<AssetUpdate, ParseFeedError> {
    let message: FeedMessage =
        serde_json::from_value(value).map_err(|_| ParseFeedError::InvalidMessage)?;
    update_from_message(message)
}

fn update_from_message(message: FeedMessage) -> Result<AssetUpdate, ParseFeedError> {
    let symbol = message
        .symbol
        .map(|symbol| symbol.trim().to_string())
        .filter(|symbol| !symbol.is_empty())
        .ok_or(ParseFeedError::MissingSymbol)?;

    let trend = message
        .trend
        .as_deref()
        .map(|label| Trend::parse(label).ok_or_else(|| ParseFeedError::UnknownTrend(label.into())))
        .transpose()?;

    let trade_signal = message.trade_signal.unwrap_or_default();
    let signal = trade_signal
        .signal
        .as_deref()
        .map(|label| {
            Signal::parse(label).ok_or_else(|| ParseFeedError::UnknownSignal(label.into()))
        })
        .transpose()?;
    let risk = message
        .risk_level
        .or(trade_signal.risk_level)
        .as_deref()
        .map(|label| {
            RiskLevel::parse(label).ok_or_else(|| ParseFeedError::UnknownRiskLevel(label.into()))
        })
        .transpose()?;
    let indicators = trade_signal.indicators.unwrap_or_default();
    let levels = trade_signal.levels.unwrap_or_default();

    Ok(AssetUpdate {
        symbol,
        price: message.current_price.or(trade_signal.current_price),
        predicted_price: message.predicted_price,
        trend,
        signal,
        confidence: trade_signal.confidence,
        risk,
        rsi: indicators.rsi,
        volume_ratio: indicators.volume_ratio,
        sma_20: indicators.sma_20,
        sma_50: indicators.sma_50,
        stop_loss: levels.stop_loss,
        take_profit: levels.take_profit,
    })
}
