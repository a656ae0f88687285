use std::{collections::HashMap, sync::Arc};

use serde::Serialize;

use crate::{
    asset::{round_to_cents, Asset, AssetSeed, AssetUpdate, Signal, MIN_PRICE},
    config::SimConfig,
    error::SimError,
    history::PriceHistory,
    random::UniformSource,
};

/// Immutable view of every tracked asset at one point of the timeline.
///
/// The engine never mutates a snapshot a reader still holds: each tick or
/// merge either edits a uniquely owned snapshot or clones it first, then
/// publishes the result as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    tick: u64,
    revision: u64,
    assets: Vec<Asset>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl MarketSnapshot {
    /// Number of synthetic ticks applied so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Bumped by every tick and every accepted external update.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, symbol: &str) -> Option<&Asset> {
        self.index.get(symbol).map(|&position| &self.assets[position])
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: u64,
    pub mutated_signals: Vec<String>,
}

pub struct MarketEngine<R> {
    config: SimConfig,
    rng: R,
    snapshot: Arc<MarketSnapshot>,
}

impl<R: UniformSource> MarketEngine<R> {
    /// Validates the catalog and back-fills `history_len` samples per asset,
    /// each scattered independently around the seed price.
    pub fn initialize(
        catalog: Vec<AssetSeed>,
        config: SimConfig,
        mut rng: R,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(SimError::InvalidConfig(
                "catalog must contain at least one asset",
            ));
        }

        let mut index = HashMap::with_capacity(catalog.len());
        let mut assets = Vec::with_capacity(catalog.len());
        for seed in catalog {
            seed.validate(&config)?;
            if index.contains_key(&seed.symbol) {
                return Err(SimError::invalid_seed(&seed.symbol, "duplicate symbol"));
            }

            let history = backfill_history(&seed, &config, &mut rng);
            index.insert(seed.symbol.clone(), assets.len());
            assets.push(Asset::from_seed(seed, history));
        }

        tracing::debug!(
            assets = assets.len(),
            history_len = config.history_len,
            "market engine initialized"
        );

        Ok(Self {
            config,
            rng,
            snapshot: Arc::new(MarketSnapshot {
                tick: 0,
                revision: 0,
                assets,
                index,
            }),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Advances every asset by one step.
    pub fn tick(&mut self) -> TickSummary {
        let config = self.config;
        let snapshot = Arc::make_mut(&mut self.snapshot);
        let mut mutated_signals = Vec::new();

        for asset in &mut snapshot.assets {
            if step_asset(asset, &config, &mut self.rng) {
                mutated_signals.push(asset.symbol.clone());
            }
        }

        snapshot.tick += 1;
        snapshot.revision += 1;

        TickSummary {
            tick: snapshot.tick,
            mutated_signals,
        }
    }

    /// Applies `ticks` steps back to back.
    pub fn advance(&mut self, ticks: u64) -> Vec<TickSummary> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// Last-write-wins merge of an external update for one symbol.
    pub fn merge_update(&mut self, update: &AssetUpdate) -> Result<(), SimError> {
        let position = *self
            .snapshot
            .index
            .get(&update.symbol)
            .ok_or_else(|| SimError::not_found(&update.symbol))?;

        let config = self.config;
        let snapshot = Arc::make_mut(&mut self.snapshot);
        snapshot.assets[position].apply_update(update, &config);
        snapshot.revision += 1;

        Ok(())
    }

    pub fn get_asset(&self, symbol: &str) -> Result<Asset, SimError> {
        self.snapshot
            .get(symbol)
            .cloned()
            .ok_or_else(|| SimError::not_found(symbol))
    }

    pub fn list_assets(&self) -> Vec<Asset> {
        self.snapshot.assets.clone()
    }

    /// Shared handle to the current state; later ticks do not affect it.
    pub fn snapshot(&self) -> Arc<MarketSnapshot> {
        Arc::clone(&self.snapshot)
    }
}

fn backfill_history<R: UniformSource>(
    seed: &AssetSeed,
    config: &SimConfig,
    rng: &mut R,
) -> PriceHistory {
    let spread = seed.price * (seed.volatility / 100.0);
    PriceHistory::from_samples(
        config.history_len,
        (0..config.history_len).map(|_| seed.price + rng.next_centered() * spread),
    )
}

/// Returns whether the signal was re-drawn.
fn step_asset<R: UniformSource>(asset: &mut Asset, config: &SimConfig, rng: &mut R) -> bool {
    let mut change = rng.next_centered() * asset.volatility;
    if let Some(momentum) = asset.history.momentum(config.momentum_lookback) {
        change += momentum * config.momentum_weight;
    }
    change += rng.next_centered() * config.micro_fluctuation;

    let next_price = round_to_cents(asset.price + change).max(MIN_PRICE);
    asset.price = next_price;
    asset.history.push(next_price);

    if rng.next_unit() <= config.mutation_threshold() {
        return false;
    }

    asset.signal = Signal::ALL[rng.next_index(Signal::ALL.len())];
    asset.confidence =
        config.clamp_confidence(asset.confidence + rng.next_centered() * config.confidence_jitter);
    true
}
