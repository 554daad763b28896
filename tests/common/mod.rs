//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod strategies;

use channel_topologies::{RecordingObserver, RunConfig, RunReport, StageDelays, Topology};
use std::sync::Arc;

/// Topologies that move items through queues
pub const QUEUED_TOPOLOGIES: [Topology; 3] = [
    Topology::Unpartitioned,
    Topology::OneLevelPartitioned,
    Topology::FullyPartitioned,
];

/// Run config with every delay set to zero
pub fn instant_config(work_size: u64, partitions: u64) -> RunConfig {
    RunConfig::new(work_size, partitions).with_delays(StageDelays::ZERO)
}

/// Run `topology` with a fresh recorder and hand both back
pub async fn run_recorded(
    topology: Topology,
    config: &RunConfig,
) -> (RunReport, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let report = topology
        .run_observed(config, observer.clone())
        .await
        .unwrap_or_else(|err| panic!("{topology} run failed: {err}"));
    (report, observer)
}
