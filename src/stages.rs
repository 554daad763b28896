//! # Pipeline Stages
//!
//! The three stage primitives every topology is assembled from. Each stage
//! receives its delay and queue handles as explicit parameters when it is
//! built, so lanes created in a loop never share captured state.

use crate::config::PacingPolicy;
use crate::error::{PipelineError, Result};
use crate::lanes::LaneKey;
use crate::observer::PipelineObserver;
use crate::queue::{Queue, QueueReader, QueueWriter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// One unit of work: the item's index in the source sequence
pub type Item = u64;

/// What a finished stage task reports back to its join-barrier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageOutcome {
    pub processed: u64,
}

/// Sleep for simulated work; zero delays don't touch the timer
pub async fn simulate_work(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Emits `0..work_size`, pacing each emission
#[derive(Debug, Clone, Copy)]
pub struct Source {
    work_size: u64,
    delay: Duration,
    pacing: PacingPolicy,
}

impl Source {
    pub fn new(work_size: u64, delay: Duration, pacing: PacingPolicy) -> Self {
        Self {
            work_size,
            delay,
            pacing,
        }
    }

    /// Feed every item to `emit` in order and return how many were emitted.
    ///
    /// `emit` routes the item to its queue; the first error stops the feed.
    pub async fn drive<F>(&self, mut emit: F) -> Result<u64>
    where
        F: FnMut(Item) -> Result<()>,
    {
        for item in 0..self.work_size {
            if self.pacing == PacingPolicy::DelayBeforeEnqueue {
                simulate_work(self.delay).await;
            }

            emit(item)?;

            if self.pacing == PacingPolicy::DelayAfterEnqueue {
                simulate_work(self.delay).await;
            }
        }

        Ok(self.work_size)
    }
}

/// Who completes a transform's output queue once its input is exhausted
pub enum OutputCompletion {
    /// The transform is the output's only writer and completes it itself
    OnDrain(Queue),
    /// The output is shared; a join-barrier over all writers completes it
    Deferred,
}

/// Read, delay, forward
pub struct Transform {
    lane: LaneKey,
    delay: Duration,
    fault: Option<Item>,
    observer: Arc<dyn PipelineObserver>,
}

impl Transform {
    pub fn new(lane: LaneKey, delay: Duration, observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            lane,
            delay,
            fault: None,
            observer,
        }
    }

    /// Fail when `item` arrives instead of forwarding it
    pub fn with_fault(mut self, fault: Option<Item>) -> Self {
        self.fault = fault;
        self
    }

    pub async fn run(
        self,
        input: QueueReader,
        output: QueueWriter,
        completion: OutputCompletion,
    ) -> Result<StageOutcome> {
        let mut processed = 0;

        while let Some(item) = input.read().await {
            simulate_work(self.delay).await;

            if self.fault == Some(item) {
                error!(lane = self.lane, item, "transform fault injected");
                return Err(PipelineError::InjectedFault {
                    lane: self.lane,
                    item,
                });
            }

            output.write(item)?;
            self.observer.on_transform(self.lane, item);
            processed += 1;
        }

        if let OutputCompletion::OnDrain(queue) = completion {
            queue.complete();
        }

        debug!(
            lane = self.lane,
            input = input.queue_name(),
            output = output.queue_name(),
            processed,
            "transform drained"
        );

        Ok(StageOutcome { processed })
    }
}

/// Read, delay, discard
pub struct Sink {
    id: usize,
    delay: Duration,
    observer: Arc<dyn PipelineObserver>,
}

impl Sink {
    pub fn new(id: usize, delay: Duration, observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            id,
            delay,
            observer,
        }
    }

    pub async fn run(self, input: QueueReader) -> Result<StageOutcome> {
        let mut processed = 0;

        while let Some(item) = input.read().await {
            simulate_work(self.delay).await;
            self.observer.on_sink(self.id, item);
            processed += 1;
        }

        debug!(sink = self.id, input = input.queue_name(), processed, "sink drained");

        Ok(StageOutcome { processed })
    }
}
