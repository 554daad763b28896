//! Private transform → sink pair per partition key.

use super::StageCounts;
use crate::config::RunConfig;
use crate::error::Result;
use crate::lanes::{partition_key, LaneRegistry};
use crate::observer::PipelineObserver;
use crate::queue::{Queue, QueueOptions, QueueWriter};
use crate::stages::{OutputCompletion, Sink, Source, Transform};
use crate::tasks::TaskGroup;
use std::sync::Arc;

struct IsolatedLane {
    first: Queue,
    first_writer: QueueWriter,
    second: Queue,
}

pub(super) async fn run(
    config: &RunConfig,
    observer: Arc<dyn PipelineObserver>,
) -> Result<StageCounts> {
    let options = QueueOptions::exclusive(config.allow_synchronous_continuations);
    let transforms = TaskGroup::new("transforms");
    let sinks = TaskGroup::new("sinks");
    let lanes: LaneRegistry<IsolatedLane> = LaneRegistry::new();

    let produced = Source::new(config.work_size, config.delays.source, config.pacing)
        .drive(|item| {
            let key = partition_key(item, config.partitions);
            let lane = lanes.get_or_create(key, |key| {
                let first = Queue::unbounded(format!("lane-{key}-stage-1"), options);
                let second = Queue::unbounded(format!("lane-{key}-stage-2"), options);

                transforms.spawn(
                    Transform::new(key, config.delays.transform, Arc::clone(&observer))
                        .with_fault(config.transform_fault)
                        .run(first.reader()?, second.writer()?, OutputCompletion::Deferred),
                );
                sinks.spawn(
                    Sink::new(key as usize, config.delays.sink, Arc::clone(&observer))
                        .run(second.reader()?),
                );

                let first_writer = first.writer()?;
                Ok(IsolatedLane {
                    first,
                    first_writer,
                    second,
                })
            })?;
            lane.first_writer.write(item)
        })
        .await?;

    let lanes_snapshot = lanes.lanes();

    for (_, lane) in &lanes_snapshot {
        lane.first.complete();
    }
    let transformed = transforms.join_all().await?;

    for (_, lane) in &lanes_snapshot {
        lane.second.complete();
    }
    let sunk = sinks.join_all().await?;

    Ok(StageCounts {
        produced,
        transformed: transformed.processed,
        sunk: sunk.processed,
        lanes: lanes.created(),
    })
}
