use std::collections::VecDeque;

use serde::{Serialize, Serializer};

/// Fixed-capacity FIFO window of recent prices, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl PriceHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");

        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_samples(capacity: usize, samples: impl IntoIterator<Item = f64>) -> Self {
        let mut history = Self::with_capacity(capacity);
        for sample in samples {
            history.push(sample);
        }
        history
    }

    pub fn push(&mut self, price: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(price);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Difference between the newest sample and the one `lookback - 1`
    /// positions before it. `None` until the window holds more than
    /// `lookback` samples.
    pub fn momentum(&self, lookback: usize) -> Option<f64> {
        let len = self.samples.len();
        if lookback < 2 || len <= lookback {
            return None;
        }

        let newest = self.samples[len - 1];
        let reference = self.samples[len - lookback];
        Some(newest - reference)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl Serialize for PriceHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.samples.iter())
    }
}
