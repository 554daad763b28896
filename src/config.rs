//! # Harness Configuration
//!
//! [`RunConfig`] describes one pipeline run. [`SweepConfig`] describes the
//! console sweep and is loaded from `CHANNEL_BENCH_*` environment variables;
//! no configuration file is ever read.

use crate::constants::{defaults, ENV_PREFIX};
use crate::error::{PipelineError, Result};
use crate::stages::Item;
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the source places its pacing delay relative to each enqueue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingPolicy {
    /// Sleep, then enqueue
    #[default]
    DelayBeforeEnqueue,
    /// Enqueue, then sleep
    DelayAfterEnqueue,
}

/// Simulated per-item work for each stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDelays {
    pub source: Duration,
    pub transform: Duration,
    pub sink: Duration,
}

impl StageDelays {
    pub const ZERO: StageDelays = StageDelays {
        source: Duration::ZERO,
        transform: Duration::ZERO,
        sink: Duration::ZERO,
    };

    pub fn from_millis(source: u64, transform: u64, sink: u64) -> Self {
        Self {
            source: Duration::from_millis(source),
            transform: Duration::from_millis(transform),
            sink: Duration::from_millis(sink),
        }
    }
}

impl Default for StageDelays {
    fn default() -> Self {
        Self::from_millis(defaults::SOURCE_DELAY_MS, 6, 6)
    }
}

/// Parameters of a single pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of items the source produces
    pub work_size: u64,
    /// Number of partition keys; items route to `index % partitions`
    pub partitions: u64,
    /// Sink instances reading the shared queue (one-level topology only)
    pub readers: usize,
    pub delays: StageDelays,
    pub pacing: PacingPolicy,
    /// Let queue consumers continue inline instead of yielding after each dequeue
    pub allow_synchronous_continuations: bool,
    /// Fail the transform that receives this item
    pub transform_fault: Option<Item>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            work_size: defaults::WORK_SIZE,
            partitions: defaults::PARTITIONS,
            readers: defaults::READERS,
            delays: StageDelays::default(),
            pacing: PacingPolicy::default(),
            allow_synchronous_continuations: defaults::ALLOW_SYNCHRONOUS_CONTINUATIONS,
            transform_fault: None,
        }
    }
}

impl RunConfig {
    pub fn new(work_size: u64, partitions: u64) -> Self {
        Self {
            work_size,
            partitions,
            ..Self::default()
        }
    }

    pub fn with_readers(mut self, readers: usize) -> Self {
        self.readers = readers;
        self
    }

    pub fn with_delays(mut self, delays: StageDelays) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_synchronous_continuations(mut self, allow: bool) -> Self {
        self.allow_synchronous_continuations = allow;
        self
    }

    pub fn with_transform_fault(mut self, item: Item) -> Self {
        self.transform_fault = Some(item);
        self
    }

    /// Reject partition and reader counts below one
    pub fn validate(&self) -> Result<()> {
        if self.partitions == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "partitions must be at least 1".to_string(),
            ));
        }
        if self.readers == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "readers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Console sweep settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub work_size: u64,
    pub partitions: u64,
    pub readers: usize,
    pub source_delay_ms: u64,
    /// Values crossed with themselves to form `(transform, sink)` delay pairs
    pub delays_ms: Vec<u64>,
    pub allow_synchronous_continuations: bool,
    pub pacing: PacingPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            work_size: defaults::WORK_SIZE,
            partitions: defaults::PARTITIONS,
            readers: defaults::READERS,
            source_delay_ms: defaults::SOURCE_DELAY_MS,
            delays_ms: defaults::DELAYS_MS.to_vec(),
            allow_synchronous_continuations: defaults::ALLOW_SYNCHRONOUS_CONTINUATIONS,
            pacing: PacingPolicy::default(),
        }
    }
}

impl SweepConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(None)
    }

    /// Load from an explicit variable map, or the process environment when `None`
    pub fn from_vars(vars: Option<config::Map<String, String>>) -> Result<Self> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("delays_ms")
            .source(vars);

        let settings = Config::builder()
            .set_default("work_size", defaults::WORK_SIZE)?
            .set_default("partitions", defaults::PARTITIONS)?
            .set_default("readers", defaults::READERS as u64)?
            .set_default("source_delay_ms", defaults::SOURCE_DELAY_MS)?
            .set_default("delays_ms", defaults::DELAYS_MS.to_vec())?
            .set_default(
                "allow_synchronous_continuations",
                defaults::ALLOW_SYNCHRONOUS_CONTINUATIONS,
            )?
            .set_default("pacing", "delay_before_enqueue")?
            .add_source(environment)
            .build()?;

        let sweep: SweepConfig = settings.try_deserialize()?;
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delays_ms.is_empty() {
            return Err(PipelineError::InvalidConfiguration(
                "delays_ms must list at least one value".to_string(),
            ));
        }
        self.run_config(0, 0).validate()
    }

    /// `(transform_ms, sink_ms)` pairs in sweep order
    pub fn delay_pairs(&self) -> Vec<(u64, u64)> {
        self.delays_ms
            .iter()
            .flat_map(|&first| self.delays_ms.iter().map(move |&second| (first, second)))
            .collect()
    }

    pub fn run_config(&self, transform_ms: u64, sink_ms: u64) -> RunConfig {
        RunConfig {
            work_size: self.work_size,
            partitions: self.partitions,
            readers: self.readers,
            delays: StageDelays::from_millis(self.source_delay_ms, transform_ms, sink_ms),
            pacing: self.pacing,
            allow_synchronous_continuations: self.allow_synchronous_continuations,
            transform_fault: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_run_config_validation() {
        assert!(RunConfig::default().validate().is_ok());
        assert!(RunConfig::new(10, 0).validate().is_err());
        assert!(RunConfig::new(10, 1).with_readers(0).validate().is_err());
        assert!(RunConfig::new(0, 1).validate().is_ok());
    }

    #[test]
    fn test_sweep_defaults_without_variables() {
        let sweep = SweepConfig::from_vars(Some(config::Map::new())).unwrap();
        assert_eq!(sweep, SweepConfig::default());
    }

    #[test]
    fn test_sweep_reads_prefixed_variables() {
        let sweep = SweepConfig::from_vars(Some(vars(&[
            ("CHANNEL_BENCH_WORK_SIZE", "50"),
            ("CHANNEL_BENCH_PARTITIONS", "2"),
            ("CHANNEL_BENCH_DELAYS_MS", "1,3"),
            ("CHANNEL_BENCH_ALLOW_SYNCHRONOUS_CONTINUATIONS", "true"),
            ("CHANNEL_BENCH_PACING", "delay_after_enqueue"),
        ])))
        .unwrap();

        assert_eq!(sweep.work_size, 50);
        assert_eq!(sweep.partitions, 2);
        assert_eq!(sweep.delays_ms, vec![1, 3]);
        assert!(sweep.allow_synchronous_continuations);
        assert_eq!(sweep.pacing, PacingPolicy::DelayAfterEnqueue);
        assert_eq!(sweep.readers, defaults::READERS);
    }

    #[test]
    fn test_sweep_rejects_zero_partitions() {
        let result = SweepConfig::from_vars(Some(vars(&[("CHANNEL_BENCH_PARTITIONS", "0")])));
        assert!(matches!(
            result,
            Err(PipelineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_delay_pairs_cross_product() {
        let sweep = SweepConfig {
            delays_ms: vec![4, 6],
            ..SweepConfig::default()
        };
        assert_eq!(sweep.delay_pairs(), vec![(4, 4), (4, 6), (6, 4), (6, 6)]);
    }
}
