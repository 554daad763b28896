//! Source → transform → sink with one queue per hop.

use super::StageCounts;
use crate::config::RunConfig;
use crate::error::Result;
use crate::observer::PipelineObserver;
use crate::queue::{Queue, QueueOptions};
use crate::stages::{OutputCompletion, Sink, Source, Transform};
use crate::tasks::TaskGroup;
use std::sync::Arc;

pub(super) async fn run(
    config: &RunConfig,
    observer: Arc<dyn PipelineObserver>,
) -> Result<StageCounts> {
    let options = QueueOptions::exclusive(config.allow_synchronous_continuations);
    let first = Queue::unbounded("stage-1", options);
    let second = Queue::unbounded("stage-2", options);

    // Build
    let transforms = TaskGroup::new("transforms");
    transforms.spawn(
        Transform::new(0, config.delays.transform, Arc::clone(&observer))
            .with_fault(config.transform_fault)
            .run(
                first.reader()?,
                second.writer()?,
                OutputCompletion::OnDrain(second.clone()),
            ),
    );

    let sinks = TaskGroup::new("sinks");
    sinks.spawn(Sink::new(0, config.delays.sink, observer).run(second.reader()?));

    // Feed
    let writer = first.writer()?;
    let produced = Source::new(config.work_size, config.delays.source, config.pacing)
        .drive(|item| writer.write(item))
        .await?;

    // Close and drain: the transform completes stage 2 itself once stage 1 runs dry
    first.complete();
    let transformed = transforms.join_all().await?;
    let sunk = sinks.join_all().await?;

    Ok(StageCounts {
        produced,
        transformed: transformed.processed,
        sunk: sunk.processed,
        lanes: 1,
    })
}
