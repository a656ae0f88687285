use crate::asset::{AssetSeed, Indicators, RiskLevel, Signal, Trend};

/// Seed records for the dashboard's tracked instruments, in display order.
pub fn default_catalog() -> Vec<AssetSeed> {
    vec![
        seed(
            "AAPL",
            "Apple Inc.",
            192.13,
            0.8,
            (Signal::Sell, 79.0),
            (183.40, 212.35),
            Indicators::new(66.6, 1.33, Trend::Bullish),
            RiskLevel::Low,
        ),
        seed(
            "MSFT",
            "Microsoft",
            406.50,
            0.7,
            (Signal::Buy, 72.0),
            (385.00, 430.00),
            Indicators::new(58.2, 1.20, Trend::Bullish),
            RiskLevel::Low,
        ),
        seed(
            "BTC-USD",
            "Bitcoin USD",
            43_570.02,
            2.5,
            (Signal::Buy, 85.0),
            (42_000.00, 46_000.00),
            Indicators::new(62.4, 1.50, Trend::Bullish),
            RiskLevel::Medium,
        ),
        seed(
            "ETH-USD",
            "Ethereum USD",
            2_316.17,
            2.0,
            (Signal::Hold, 65.0),
            (2_200.00, 2_500.00),
            Indicators::new(54.8, 1.25, Trend::Neutral),
            RiskLevel::Medium,
        ),
        seed(
            "META",
            "Meta Platforms",
            412.29,
            1.2,
            (Signal::Buy, 81.0),
            (390.00, 450.00),
            Indicators::new(59.7, 1.40, Trend::Bullish),
            RiskLevel::Low,
        ),
        seed(
            "ETC",
            "Ethereum Classic",
            2_325.62,
            1.8,
            (Signal::Sell, 68.0),
            (2_400.00, 2_150.00),
            Indicators::new(71.2, 0.90, Trend::Bearish),
            RiskLevel::High,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed(
    symbol: &str,
    name: &str,
    price: f64,
    volatility: f64,
    (signal, confidence): (Signal, f64),
    (stop_loss, take_profit): (f64, f64),
    indicators: Indicators,
    risk: RiskLevel,
) -> AssetSeed {
    AssetSeed {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price,
        volatility,
        signal,
        confidence,
        stop_loss,
        take_profit,
        indicators,
        risk,
    }
}
