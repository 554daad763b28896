//! # Console Sweep
//!
//! Runs every topology for each `(transform, sink)` delay pair of a
//! [`SweepConfig`] and renders one line per run:
//!
//! ```text
//! Channels(4, 6) = 00:00:06.8421337
//! ```

use crate::config::SweepConfig;
use crate::error::Result;
use crate::topology::{RunReport, Topology};
use std::fmt;
use std::time::Duration;
use tracing::info;

/// One printed result of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepLine {
    pub first_delay_ms: u64,
    pub second_delay_ms: u64,
    pub report: RunReport,
}

impl fmt::Display for SweepLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.report.topology.label(),
            self.first_delay_ms,
            self.second_delay_ms,
            format_elapsed(self.report.elapsed)
        )
    }
}

/// Render a duration as `[d.]hh:mm:ss.fffffff` with 100ns precision
pub fn format_elapsed(elapsed: Duration) -> String {
    const TICKS_PER_SECOND: u64 = 10_000_000;

    let ticks = elapsed.as_nanos() / 100;
    let ticks = u64::try_from(ticks).unwrap_or(u64::MAX);

    let fraction = ticks % TICKS_PER_SECOND;
    let total_seconds = ticks / TICKS_PER_SECOND;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = (total_seconds / 3600) % 24;
    let days = total_seconds / 86_400;

    if days > 0 {
        format!("{days}.{hours:02}:{minutes:02}:{seconds:02}.{fraction:07}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{fraction:07}")
    }
}

/// Run `topologies` for every delay pair, handing each line to `emit` as soon
/// as its run finishes. Stops at the first failed run.
pub async fn run_sweep<F>(
    sweep: &SweepConfig,
    topologies: &[Topology],
    mut emit: F,
) -> Result<Vec<SweepLine>>
where
    F: FnMut(&SweepLine),
{
    sweep.validate()?;

    let pairs = sweep.delay_pairs();
    info!(
        work_size = sweep.work_size,
        partitions = sweep.partitions,
        pairs = pairs.len(),
        topologies = topologies.len(),
        "starting sweep"
    );

    let mut lines = Vec::with_capacity(pairs.len() * topologies.len());

    for (first_delay_ms, second_delay_ms) in pairs {
        let config = sweep.run_config(first_delay_ms, second_delay_ms);

        for topology in topologies {
            let report = topology.run(&config).await?;
            let line = SweepLine {
                first_delay_ms,
                second_delay_ms,
                report,
            };
            emit(&line);
            lines.push(line);
        }
    }

    Ok(lines)
}
