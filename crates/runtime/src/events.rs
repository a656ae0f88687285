#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStage {
    TickApplied,
    SignalsMutated,
    FeedMerged,
    FeedRejected,
    SnapshotPublished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEvent {
    pub revision: u64,
    pub stage: RuntimeStage,
}

impl RuntimeEvent {
    pub fn new(revision: u64, stage: RuntimeStage) -> Self {
        Self { revision, stage }
    }
}
