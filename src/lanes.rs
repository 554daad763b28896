//! # Lane Registry
//!
//! Lanes are created the first time their partition key is seen and reused
//! for every later item with that key. [`LaneRegistry::get_or_create`] runs
//! the whole check-then-build under the map's entry lock, so concurrent
//! producers can never build two lanes for one key.

use crate::error::Result;
use crate::stages::Item;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Partition key identifying a lane
pub type LaneKey = u64;

/// Route an item to its lane: `item % partitions`.
///
/// `partitions` must be at least 1; run configs are validated before any
/// routing happens.
pub fn partition_key(item: Item, partitions: u64) -> LaneKey {
    item % partitions
}

/// Memoized lanes of one pipeline run
#[derive(Debug)]
pub struct LaneRegistry<L> {
    lanes: DashMap<LaneKey, Arc<L>>,
    created: AtomicUsize,
}

impl<L> Default for LaneRegistry<L> {
    fn default() -> Self {
        Self {
            lanes: DashMap::new(),
            created: AtomicUsize::new(0),
        }
    }
}

impl<L> LaneRegistry<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lane for `key`, building it with `create` if absent.
    ///
    /// `create` runs at most once per key. If it fails nothing is inserted.
    pub fn get_or_create<F>(&self, key: LaneKey, create: F) -> Result<Arc<L>>
    where
        F: FnOnce(LaneKey) -> Result<L>,
    {
        match self.lanes.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let lane = Arc::new(create(key)?);
                entry.insert(Arc::clone(&lane));
                let created = self.created.fetch_add(1, Ordering::AcqRel) + 1;
                debug!(lane = key, lanes = created, "lane created");
                Ok(lane)
            }
        }
    }

    pub fn get(&self, key: LaneKey) -> Option<Arc<L>> {
        self.lanes.get(&key).map(|lane| Arc::clone(lane.value()))
    }

    /// Number of lanes built so far
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Acquire)
    }

    /// Snapshot of every lane, ordered by key
    pub fn lanes(&self) -> Vec<(LaneKey, Arc<L>)> {
        let mut lanes: Vec<(LaneKey, Arc<L>)> = self
            .lanes
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        lanes.sort_unstable_by_key(|(key, _)| *key);
        lanes
    }
}
