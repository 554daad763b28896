//! # Pipeline Topologies
//!
//! Every topology drives the same [`Source`](crate::stages::Source) →
//! [`Transform`](crate::stages::Transform) → [`Sink`](crate::stages::Sink)
//! chain through a different arrangement of queues:
//!
//! - [`Topology::Sequential`]: no queues; both delays run inline per item.
//! - [`Topology::Unpartitioned`]: one queue per hop.
//! - [`Topology::OneLevelPartitioned`]: a private queue and transform per
//!   partition key, all fanning into one shared queue read by `readers` sinks.
//! - [`Topology::FullyPartitioned`]: a private transform → sink pair per key.
//!
//! A run goes through four phases in order: build (lazily, while feeding),
//! feed, close-and-drain the first hop, close-and-drain the second hop.
//! The first failure aborts the run and is returned to the caller.

mod fully_partitioned;
mod one_level;
mod sequential;
mod unpartitioned;

use crate::config::RunConfig;
use crate::constants::labels;
use crate::error::Result;
use crate::observer::{self, PipelineObserver};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// Pipeline arrangement under measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    Sequential,
    Unpartitioned,
    OneLevelPartitioned,
    FullyPartitioned,
}

impl Topology {
    /// Console sweep order
    pub const ALL: [Topology; 4] = [
        Topology::Sequential,
        Topology::Unpartitioned,
        Topology::OneLevelPartitioned,
        Topology::FullyPartitioned,
    ];

    /// Label used in console output
    pub fn label(&self) -> &'static str {
        match self {
            Topology::Sequential => labels::SEQUENTIAL,
            Topology::Unpartitioned => labels::UNPARTITIONED,
            Topology::OneLevelPartitioned => labels::ONE_LEVEL_PARTITIONED,
            Topology::FullyPartitioned => labels::FULLY_PARTITIONED,
        }
    }

    pub async fn run(&self, config: &RunConfig) -> Result<RunReport> {
        self.run_observed(config, observer::noop()).await
    }

    /// Run once, reporting every transformed and sunk item to `observer`
    pub async fn run_observed(
        &self,
        config: &RunConfig,
        observer: Arc<dyn PipelineObserver>,
    ) -> Result<RunReport> {
        config.validate()?;

        let started = Instant::now();
        let counts = match self {
            Topology::Sequential => sequential::run(config, observer).await?,
            Topology::Unpartitioned => unpartitioned::run(config, observer).await?,
            Topology::OneLevelPartitioned => one_level::run(config, observer).await?,
            Topology::FullyPartitioned => fully_partitioned::run(config, observer).await?,
        };

        let report = RunReport {
            topology: *self,
            items_produced: counts.produced,
            items_transformed: counts.transformed,
            items_sunk: counts.sunk,
            lanes_created: counts.lanes,
            elapsed: started.elapsed(),
        };

        info!(
            topology = %self,
            work_size = config.work_size,
            partitions = config.partitions,
            lanes = report.lanes_created,
            items_sunk = report.items_sunk,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "pipeline run completed"
        );

        Ok(report)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub topology: Topology,
    pub items_produced: u64,
    pub items_transformed: u64,
    pub items_sunk: u64,
    pub lanes_created: usize,
    pub elapsed: Duration,
}

/// Item counts each topology hands back to [`Topology::run_observed`]
#[derive(Debug, Clone, Copy, Default)]
struct StageCounts {
    produced: u64,
    transformed: u64,
    sunk: u64,
    lanes: usize,
}
