use std::{sync::Arc, time::Duration};

use core_sim::{AssetUpdate, MarketEngine, UniformSource};
use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant, Interval, MissedTickBehavior},
};

use crate::{
    events::{RuntimeEvent, RuntimeStage},
    handle::{FeedMode, FeedStats, MarketHandle},
    logging::{RunLogEvent, RunLogEventKind, RunLogWriter, TracingRunLogWriter},
    metrics::TickLatencyMetrics,
};

pub const DEFAULT_FEED_BUFFER: usize = 256;
const LATENCY_REPORT_EVERY_TICKS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub mode: FeedMode,
    pub feed_buffer: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            mode: FeedMode::Sim,
            feed_buffer: DEFAULT_FEED_BUFFER,
        }
    }
}

/// Single writer for the market state: applies synthetic ticks on a fixed
/// period and merges queued external updates, publishing a fresh snapshot
/// after each step.
pub struct MarketRuntime<R> {
    engine: MarketEngine<R>,
    options: RuntimeOptions,
    snapshots_tx: watch::Sender<Arc<core_sim::MarketSnapshot>>,
    updates_rx: mpsc::Receiver<AssetUpdate>,
    stats: Arc<FeedStats>,
    metrics: TickLatencyMetrics,
    log: Box<dyn RunLogWriter + Send>,
}

impl<R: UniformSource> MarketRuntime<R> {
    pub fn new(engine: MarketEngine<R>, options: RuntimeOptions) -> (Self, MarketHandle) {
        let (snapshots_tx, snapshots_rx) = watch::channel(engine.snapshot());
        let (updates_tx, updates_rx) = mpsc::channel(options.feed_buffer.max(1));
        let stats = Arc::new(FeedStats::default());
        let handle = MarketHandle::new(snapshots_rx, updates_tx, Arc::clone(&stats), options.mode);

        let runtime = Self {
            engine,
            options,
            snapshots_tx,
            updates_rx,
            stats,
            metrics: TickLatencyMetrics::new(),
            log: Box::new(TracingRunLogWriter),
        };

        (runtime, handle)
    }

    pub fn with_log_writer(mut self, log: Box<dyn RunLogWriter + Send>) -> Self {
        self.log = log;
        self
    }

    pub fn metrics(&self) -> &TickLatencyMetrics {
        &self.metrics
    }

    pub fn step_once(&mut self) -> Vec<RuntimeEvent> {
        let started = std::time::Instant::now();
        let summary = self.engine.tick();
        let snapshot = self.engine.snapshot();
        let revision = snapshot.revision();

        let mut events = vec![RuntimeEvent::new(revision, RuntimeStage::TickApplied)];
        if !summary.mutated_signals.is_empty() {
            for symbol in &summary.mutated_signals {
                if let Some(asset) = snapshot.get(symbol) {
                    tracing::debug!(
                        %symbol,
                        signal = asset.signal.as_str(),
                        confidence = asset.confidence,
                        "signal mutated"
                    );
                }
            }
            events.push(RuntimeEvent::new(revision, RuntimeStage::SignalsMutated));
        }

        self.snapshots_tx.send_replace(snapshot);
        events.push(RuntimeEvent::new(revision, RuntimeStage::SnapshotPublished));

        let latency_micros = self.metrics.record(started.elapsed());
        self.write_log(&events);
        self.log.write(RunLogEvent::new(
            revision,
            RunLogEventKind::TickLatencyRecorded,
            Some(latency_micros),
        ));
        self.report_latency_if_due();

        events
    }

    pub fn apply_update(&mut self, update: AssetUpdate) -> Vec<RuntimeEvent> {
        let events = match self.engine.merge_update(&update) {
            Ok(()) => {
                self.stats.record_merged();
                let snapshot = self.engine.snapshot();
                let revision = snapshot.revision();
                self.snapshots_tx.send_replace(snapshot);
                vec![
                    RuntimeEvent::new(revision, RuntimeStage::FeedMerged),
                    RuntimeEvent::new(revision, RuntimeStage::SnapshotPublished),
                ]
            }
            Err(error) => {
                tracing::warn!(symbol = %update.symbol, %error, "dropping feed update");
                self.stats.record_dropped(1);
                let revision = self.engine.snapshot().revision();
                vec![RuntimeEvent::new(revision, RuntimeStage::FeedRejected)]
            }
        };

        self.write_log(&events);
        events
    }

    /// Drives the runtime until `shutdown` flips to `true` or its sender is
    /// dropped. Ticks only run when the mode enables them, at the engine's
    /// configured `tick_interval_ms`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let tick_interval_ms = self.engine.config().tick_interval_ms;
        let mut interval = self
            .options
            .mode
            .ticks_enabled()
            .then(|| tick_interval(Duration::from_millis(tick_interval_ms)));
        let mut feed_open = true;

        tracing::info!(
            mode = self.options.mode.as_str(),
            tick_interval_ms,
            assets = self.engine.snapshot().len(),
            "market runtime started"
        );

        loop {
            tokio::select! {
                _ = next_tick(&mut interval) => {
                    self.step_once();
                }
                update = self.updates_rx.recv(), if feed_open => {
                    match update {
                        Some(update) => {
                            self.apply_update(update);
                        }
                        None => feed_open = false,
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            tick = self.engine.snapshot().tick(),
            "market runtime stopped"
        );
    }

    fn write_log(&mut self, events: &[RuntimeEvent]) {
        for event in events {
            self.log.write(RunLogEvent::from(event));
        }
    }

    fn report_latency_if_due(&mut self) {
        if self.metrics.len() < LATENCY_REPORT_EVERY_TICKS {
            return;
        }

        if let Some(report) = self.metrics.drain_summary() {
            tracing::info!(
                samples = report.samples,
                mean_micros = report.mean_micros,
                p50_micros = report.p50_micros,
                p95_micros = report.p95_micros,
                p99_micros = report.p99_micros,
                max_micros = report.max_micros,
                "tick latency"
            );
        }
    }
}

/// `period` must be non-zero; `SimConfig::validate` guarantees it.
fn tick_interval(period: Duration) -> Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
