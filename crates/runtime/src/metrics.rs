use std::time::Duration;

/// Distribution of tick latencies over one reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencySummary {
    pub samples: usize,
    pub mean_micros: u64,
    pub p50_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
    pub max_micros: u64,
}

/// Wall-clock cost of applying and publishing one tick.
#[derive(Debug, Default, Clone)]
pub struct TickLatencyMetrics {
    samples_micros: Vec<u64>,
    total_micros: u128,
}

impl TickLatencyMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one tick and returns the latency in whole microseconds.
    pub fn record(&mut self, elapsed: Duration) -> u64 {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.samples_micros.push(micros);
        self.total_micros += u128::from(micros);
        micros
    }

    pub fn len(&self) -> usize {
        self.samples_micros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples_micros.is_empty()
    }

    pub fn summary(&self) -> Option<LatencySummary> {
        if self.samples_micros.is_empty() {
            return None;
        }

        let mut sorted = self.samples_micros.clone();
        sorted.sort_unstable();
        let samples = sorted.len();
        let mean = self.total_micros / samples as u128;

        Some(LatencySummary {
            samples,
            mean_micros: u64::try_from(mean).unwrap_or(u64::MAX),
            p50_micros: nearest_rank(&sorted, 50),
            p95_micros: nearest_rank(&sorted, 95),
            p99_micros: nearest_rank(&sorted, 99),
            max_micros: sorted[samples - 1],
        })
    }

    /// Summarizes the current window and starts a new one.
    pub fn drain_summary(&mut self) -> Option<LatencySummary> {
        let summary = self.summary();
        self.samples_micros.clear();
        self.total_micros = 0;
        summary
    }
}

fn nearest_rank(sorted: &[u64], percentile: usize) -> u64 {
    let rank = (percentile * sorted.len()).div_ceil(100);
    sorted[rank.saturating_sub(1)]
}
