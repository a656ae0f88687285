use serde::{Deserialize, Serialize};

use crate::{config::SimConfig, error::SimError, history::PriceHistory};

/// Smallest price a tick or merge may produce.
pub const MIN_PRICE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Buy, Signal::Sell, Signal::Hold];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            "HOLD" => Some(Self::Hold),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Neutral,
    Bearish,
}

impl Trend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bullish" => Some(Self::Bullish),
            "neutral" => Some(Self::Neutral),
            "bearish" => Some(Self::Bearish),
            _ => None,
        }
    }
}

/// Display-only indicator values. They are carried verbatim from the seed or
/// the last external update and never derived from `history`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub rsi: f64,
    pub volume_ratio: f64,
    pub sma: Trend,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
}

impl Indicators {
    pub fn new(rsi: f64, volume_ratio: f64, sma: Trend) -> Self {
        Self {
            rsi,
            volume_ratio,
            sma,
            sma_20: None,
            sma_50: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetSeed {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub volatility: f64,
    pub signal: Signal,
    pub confidence: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub indicators: Indicators,
    pub risk: RiskLevel,
}

impl AssetSeed {
    pub fn validate(&self, config: &SimConfig) -> Result<(), SimError> {
        if self.symbol.trim().is_empty() {
            return Err(SimError::invalid_seed(&self.symbol, "symbol must not be empty"));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(SimError::invalid_seed(
                &self.symbol,
                "price must be finite and positive",
            ));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(SimError::invalid_seed(
                &self.symbol,
                "volatility must be finite and non-negative",
            ));
        }
        if !self.confidence.is_finite()
            || self.confidence < config.confidence_min
            || self.confidence > config.confidence_max
        {
            return Err(SimError::invalid_seed(
                &self.symbol,
                "confidence must lie within the configured band",
            ));
        }
        if !self.stop_loss.is_finite() || !self.take_profit.is_finite() {
            return Err(SimError::invalid_seed(
                &self.symbol,
                "stop loss and take profit must be finite",
            ));
        }

        Ok(())
    }
}

/// Snapshot of one tracked instrument as published to readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub volatility: f64,
    pub history: PriceHistory,
    pub signal: Signal,
    pub confidence: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub indicators: Indicators,
    pub risk: RiskLevel,
    pub trend: Trend,
    pub predicted_price: Option<f64>,
}

impl Asset {
    pub(crate) fn from_seed(seed: AssetSeed, history: PriceHistory) -> Self {
        Self {
            trend: seed.indicators.sma,
            symbol: seed.symbol,
            name: seed.name,
            price: seed.price,
            volatility: seed.volatility,
            history,
            signal: seed.signal,
            confidence: seed.confidence,
            stop_loss: seed.stop_loss,
            take_profit: seed.take_profit,
            indicators: seed.indicators,
            risk: seed.risk,
            predicted_price: None,
        }
    }

    /// Writes every usable field of `update`. Absent or unusable fields keep
    /// their current value; `history`, `volatility` and `name` are never
    /// touched.
    pub(crate) fn apply_update(&mut self, update: &AssetUpdate, config: &SimConfig) {
        if let Some(price) = update.price.and_then(positive_price) {
            self.price = price;
        }
        if let Some(predicted) = update.predicted_price.and_then(positive_price) {
            self.predicted_price = Some(predicted);
        }
        if let Some(trend) = update.trend {
            self.trend = trend;
        }
        if let Some(signal) = update.signal {
            self.signal = signal;
        }
        if let Some(confidence) = update.confidence.filter(|value| value.is_finite()) {
            self.confidence = config.clamp_confidence(confidence);
        }
        if let Some(risk) = update.risk {
            self.risk = risk;
        }
        if let Some(rsi) = update.rsi.filter(|value| value.is_finite()) {
            self.indicators.rsi = rsi;
        }
        if let Some(ratio) = update.volume_ratio.filter(|value| value.is_finite()) {
            self.indicators.volume_ratio = ratio;
        }
        if let Some(sma_20) = update.sma_20.and_then(positive_price) {
            self.indicators.sma_20 = Some(sma_20);
        }
        if let Some(sma_50) = update.sma_50.and_then(positive_price) {
            self.indicators.sma_50 = Some(sma_50);
        }
        if let Some(stop_loss) = update.stop_loss.and_then(positive_price) {
            self.stop_loss = stop_loss;
        }
        if let Some(take_profit) = update.take_profit.and_then(positive_price) {
            self.take_profit = take_profit;
        }
    }
}

/// External update for one symbol. `None` fields are left unchanged by the
/// merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetUpdate {
    pub symbol: String,
    pub price: Option<f64>,
    pub predicted_price: Option<f64>,
    pub trend: Option<Trend>,
    pub signal: Option<Signal>,
    pub confidence: Option<f64>,
    pub risk: Option<RiskLevel>,
    pub rsi: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl AssetUpdate {
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn positive_price(value: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 {
        Some(round_to_cents(value).max(MIN_PRICE))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{round_to_cents, RiskLevel, Signal, Trend};

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!(Signal::parse("buy"), Some(Signal::Buy));
        assert_eq!(Signal::parse(" SELL "), Some(Signal::Sell));
        assert_eq!(Signal::parse("wait"), None);
        assert_eq!(RiskLevel::parse("MEDIUM"), Some(RiskLevel::Medium));
        assert_eq!(Trend::parse("Bearish"), Some(Trend::Bearish));
    }

    #[test]
    fn labels_serialize_in_dashboard_casing() {
        assert_eq!(serde_json::to_string(&Signal::Hold).unwrap(), "\"HOLD\"");
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Trend::Bullish).unwrap(), "\"Bullish\"");
    }

    #[test]
    fn rounds_prices_to_cents() {
        assert_eq!(round_to_cents(192.134), 192.13);
        assert_eq!(round_to_cents(192.136), 192.14);
    }
}
