use crate::events::{RuntimeEvent, RuntimeStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    TickApplied,
    SignalsMutated,
    FeedMerged,
    FeedRejected,
    SnapshotPublished,
    TickLatencyRecorded,
}

impl From<RuntimeStage> for RunLogEventKind {
    fn from(stage: RuntimeStage) -> Self {
        match stage {
            RuntimeStage::TickApplied => Self::TickApplied,
            RuntimeStage::SignalsMutated => Self::SignalsMutated,
            RuntimeStage::FeedMerged => Self::FeedMerged,
            RuntimeStage::FeedRejected => Self::FeedRejected,
            RuntimeStage::SnapshotPublished => Self::SnapshotPublished,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogEvent {
    pub revision: u64,
    pub kind: RunLogEventKind,
    pub tick_latency_micros: Option<u64>,
}

impl RunLogEvent {
    pub fn new(revision: u64, kind: RunLogEventKind, tick_latency_micros: Option<u64>) -> Self {
        Self {
            revision,
            kind,
            tick_latency_micros,
        }
    }
}

impl From<&RuntimeEvent> for RunLogEvent {
    fn from(event: &RuntimeEvent) -> Self {
        Self::new(event.revision, event.stage.into(), None)
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// Forwards run log events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunLogWriter;

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        match event.tick_latency_micros {
            Some(latency_micros) => tracing::debug!(
                revision = event.revision,
                kind = ?event.kind,
                latency_micros,
                "run log"
            ),
            None => tracing::debug!(revision = event.revision, kind = ?event.kind, "run log"),
        }
    }
}
