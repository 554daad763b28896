//! Partitioned transforms fanning into one shared sink queue.

use super::StageCounts;
use crate::config::RunConfig;
use crate::error::Result;
use crate::lanes::{partition_key, LaneRegistry};
use crate::observer::PipelineObserver;
use crate::queue::{Queue, QueueOptions, QueueWriter};
use crate::stages::{OutputCompletion, Sink, Source, Transform};
use crate::tasks::TaskGroup;
use std::sync::Arc;
use tracing::debug;

struct PartitionLane {
    queue: Queue,
    writer: QueueWriter,
}

pub(super) async fn run(
    config: &RunConfig,
    observer: Arc<dyn PipelineObserver>,
) -> Result<StageCounts> {
    let allow_sync = config.allow_synchronous_continuations;
    let shared = Queue::unbounded("shared", QueueOptions::fan_in(config.readers, allow_sync));

    let sinks = TaskGroup::new("sinks");
    for id in 0..config.readers {
        sinks.spawn(Sink::new(id, config.delays.sink, Arc::clone(&observer)).run(shared.reader()?));
    }

    let transforms = TaskGroup::new("transforms");
    let lanes: LaneRegistry<PartitionLane> = LaneRegistry::new();

    // Build lanes on first sight of their key while feeding
    let produced = Source::new(config.work_size, config.delays.source, config.pacing)
        .drive(|item| {
            let key = partition_key(item, config.partitions);
            let lane = lanes.get_or_create(key, |key| {
                let queue = Queue::unbounded(format!("lane-{key}"), QueueOptions::exclusive(allow_sync));
                transforms.spawn(
                    Transform::new(key, config.delays.transform, Arc::clone(&observer))
                        .with_fault(config.transform_fault)
                        .run(queue.reader()?, shared.writer()?, OutputCompletion::Deferred),
                );
                let writer = queue.writer()?;
                Ok(PartitionLane { queue, writer })
            })?;
            lane.writer.write(item)
        })
        .await?;

    for (_, lane) in lanes.lanes() {
        lane.queue.complete();
    }

    // The shared queue has one writer per lane; it may only complete once all of them are done
    let transformed = transforms.join_all().await?;
    shared.complete();
    debug!(lanes = lanes.created(), "all partition transforms drained");

    let sunk = sinks.join_all().await?;

    Ok(StageCounts {
        produced,
        transformed: transformed.processed,
        sunk: sunk.processed,
        lanes: lanes.created(),
    })
}
