//! Per-item observation hooks for pipeline runs.

use crate::lanes::LaneKey;
use crate::stages::Item;
use dashmap::DashMap;
use std::sync::Arc;

/// Receives a callback for every item a stage finishes with.
///
/// Callbacks run on the stage's task, inline with the pipeline, so
/// implementations must stay cheap.
pub trait PipelineObserver: Send + Sync {
    /// A transform in `lane` forwarded `item`
    fn on_transform(&self, _lane: LaneKey, _item: Item) {}

    /// Sink number `sink` consumed `item`
    fn on_sink(&self, _sink: usize, _item: Item) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

pub fn noop() -> Arc<dyn PipelineObserver> {
    Arc::new(NoopObserver)
}

/// Records every callback, keyed by lane and by sink
#[derive(Debug, Default)]
pub struct RecordingObserver {
    transformed: DashMap<LaneKey, Vec<Item>>,
    sunk: DashMap<usize, Vec<Item>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items a lane's transform forwarded, in processing order
    pub fn lane_items(&self, lane: LaneKey) -> Vec<Item> {
        self.transformed
            .get(&lane)
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// Lanes that processed at least one item, ascending
    pub fn lanes(&self) -> Vec<LaneKey> {
        let mut lanes: Vec<LaneKey> = self.transformed.iter().map(|entry| *entry.key()).collect();
        lanes.sort_unstable();
        lanes
    }

    /// Items one sink consumed, in processing order
    pub fn sink_items(&self, sink: usize) -> Vec<Item> {
        self.sunk
            .get(&sink)
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// Every item consumed by any sink, sorted
    pub fn sunk_items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .sunk
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        items.sort_unstable();
        items
    }

    pub fn sunk_count(&self) -> usize {
        self.sunk.iter().map(|entry| entry.value().len()).sum()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_transform(&self, lane: LaneKey, item: Item) {
        self.transformed.entry(lane).or_default().push(item);
    }

    fn on_sink(&self, sink: usize, item: Item) {
        self.sunk.entry(sink).or_default().push(item);
    }
}
