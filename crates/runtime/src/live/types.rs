use serde::{Deserialize, Serialize};

/// One `market_update` entry as pushed by a live backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub symbol: Option<String>,
    pub current_price: Option<f64>,
    pub predicted_price: Option<f64>,
    pub trend: Option<String>,
    pub risk_level: Option<String>,
    pub trade_signal: Option<FeedTradeSignal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedTradeSignal {
    pub signal: Option<String>,
    pub confidence: Option<f64>,
    pub risk_level: Option<String>,
    pub current_price: Option<f64>,
    pub indicators: Option<FeedIndicators>,
    pub levels: Option<FeedLevels>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedIndicators {
    pub rsi: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedLevels {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FeedLevels, FeedMessage};

    #[test]
    fn deserializes_backend_payload_and_ignores_extra_indicators() {
        let json = json!({
            "symbol": "BTC-USD",
            "current_price": 43_612.5,
            "predicted_price": 44_001.0,
            "trend": "Bullish",
            "risk_level": "MEDIUM",
            "trade_signal": {
                "signal": "BUY",
                "confidence": 74,
                "risk_level": "MEDIUM",
                "current_price": 43_612.5,
                "indicators": {
                    "rsi": 48.3,
                    "volume_ratio": 1.12,
                    "sma_20": 43_120.4,
                    "sma_50": 42_870.9,
                    "macd": 12.5,
                    "bb_position": 0.44
                },
                "levels": { "stop_loss": 41_431.88, "take_profit": 47_973.75 }
            }
        });

        let message: FeedMessage = serde_json::from_value(json).unwrap();
        let signal = message.trade_signal.unwrap();

        assert_eq!(message.symbol.as_deref(), Some("BTC-USD"));
        assert_eq!(signal.confidence, Some(74.0));
        assert_eq!(signal.indicators.unwrap().sma_50, Some(42_870.9));
        assert_eq!(
            signal.levels,
            Some(FeedLevels {
                stop_loss: Some(41_431.88),
                take_profit: Some(47_973.75),
            })
        );
    }

    #[test]
    fn hold_levels_may_be_null() {
        let json = json!({
            "symbol": "ETH-USD",
            "trade_signal": { "signal": "HOLD", "levels": { "stop_loss": null, "take_profit": null } }
        });

        let message: FeedMessage = serde_json::from_value(json).unwrap();

        assert_eq!(
            message.trade_signal.unwrap().levels,
            Some(FeedLevels::default())
        );
    }
}
