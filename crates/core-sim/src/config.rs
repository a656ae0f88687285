use crate::error::SimError;

pub const DEFAULT_HISTORY_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub history_len: usize,
    pub momentum_lookback: usize,
    pub momentum_weight: f64,
    pub micro_fluctuation: f64,
    pub signal_mutation_probability: f64,
    pub confidence_min: f64,
    pub confidence_max: f64,
    pub confidence_jitter: f64,
    pub tick_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            history_len: DEFAULT_HISTORY_LEN,
            momentum_lookback: 5,
            momentum_weight: 0.05,
            micro_fluctuation: 0.3,
            signal_mutation_probability: 0.05,
            confidence_min: 60.0,
            confidence_max: 90.0,
            confidence_jitter: 10.0,
            tick_interval_ms: 2_000,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.history_len == 0 {
            return Err(SimError::InvalidConfig("history_len must be at least 1"));
        }
        if self.momentum_lookback < 2 {
            return Err(SimError::InvalidConfig(
                "momentum_lookback must be at least 2",
            ));
        }
        if !self.momentum_weight.is_finite() || !self.micro_fluctuation.is_finite() {
            return Err(SimError::InvalidConfig(
                "momentum_weight and micro_fluctuation must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.signal_mutation_probability) {
            return Err(SimError::InvalidConfig(
                "signal_mutation_probability must be within [0, 1]",
            ));
        }
        if !self.confidence_min.is_finite()
            || !self.confidence_max.is_finite()
            || self.confidence_min > self.confidence_max
        {
            return Err(SimError::InvalidConfig(
                "confidence band must be finite with min <= max",
            ));
        }
        if !self.confidence_jitter.is_finite() || self.confidence_jitter < 0.0 {
            return Err(SimError::InvalidConfig(
                "confidence_jitter must be finite and non-negative",
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(SimError::InvalidConfig("tick_interval_ms must be positive"));
        }

        Ok(())
    }

    pub fn clamp_confidence(&self, confidence: f64) -> f64 {
        confidence.clamp(self.confidence_min, self.confidence_max)
    }

    /// `U(0,1)` draws above this value fire the signal mutation.
    pub(crate) fn mutation_threshold(&self) -> f64 {
        1.0 - self.signal_mutation_probability
    }
}
