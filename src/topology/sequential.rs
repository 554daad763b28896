//! Inline baseline: no queues, both delays back to back per item.

use super::StageCounts;
use crate::config::RunConfig;
use crate::error::Result;
use crate::observer::PipelineObserver;
use crate::stages::simulate_work;
use std::sync::Arc;

pub(super) async fn run(
    config: &RunConfig,
    observer: Arc<dyn PipelineObserver>,
) -> Result<StageCounts> {
    for item in 0..config.work_size {
        simulate_work(config.delays.transform).await;
        observer.on_transform(0, item);
        simulate_work(config.delays.sink).await;
        observer.on_sink(0, item);
    }

    Ok(StageCounts {
        produced: config.work_size,
        transformed: config.work_size,
        sunk: config.work_size,
        lanes: 0,
    })
}
