mod asset;
mod catalog;
mod config;
mod engine;
mod error;
mod history;
mod random;

pub use asset::{
    round_to_cents, Asset, AssetSeed, AssetUpdate, Indicators, RiskLevel, Signal, Trend,
    MIN_PRICE,
};
pub use catalog::default_catalog;
pub use config::{SimConfig, DEFAULT_HISTORY_LEN};
pub use engine::{MarketEngine, MarketSnapshot, TickSummary};
pub use error::SimError;
pub use history::PriceHistory;
pub use random::{ConstantSource, ScriptedSource, UniformSource};
