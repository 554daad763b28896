#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Channel Topologies
//!
//! Microbenchmark harness for pipelines built from unbounded async queues.
//!
//! ## Overview
//!
//! Every pipeline chains the same three stages: a paced source producing
//! `0..N`, a transform that delays and forwards each item, and a sink that
//! delays and discards it. What varies is how queues connect them:
//!
//! - **Unpartitioned**: one queue per hop.
//! - **One-level partitioned**: items route by `index % K` into lazily created
//!   transform lanes that all feed one shared sink queue.
//! - **Fully partitioned**: each lane owns a private transform → sink pair.
//!
//! A sequential baseline with no queues at all runs alongside them.
//!
//! ## Module Organization
//!
//! - [`queue`] - Unbounded queues with explicit completion
//! - [`stages`] - Source, transform and sink primitives
//! - [`lanes`] - Partition routing and the lazy lane registry
//! - [`tasks`] - Join-barriers over stage tasks
//! - [`topology`] - Run orchestration for each arrangement
//! - [`sweep`] - Console sweep over delay configurations
//! - [`config`] - Run and sweep configuration
//! - [`observer`] - Per-item observation hooks
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use channel_topologies::{RunConfig, StageDelays, Topology};
//!
//! # async fn example() -> channel_topologies::Result<()> {
//! let config = RunConfig::new(1000, 4)
//!     .with_readers(4)
//!     .with_delays(StageDelays::from_millis(1, 6, 6));
//!
//! let report = Topology::OneLevelPartitioned.run(&config).await?;
//! println!("{} items in {:?}", report.items_sunk, report.elapsed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                          # Unit, integration and property tests
//! cargo bench --features benchmarks   # Criterion benchmarks
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod lanes;
pub mod logging;
pub mod observer;
pub mod queue;
pub mod stages;
pub mod sweep;
pub mod tasks;
pub mod topology;

pub use config::{PacingPolicy, RunConfig, StageDelays, SweepConfig};
pub use error::{PipelineError, Result};
pub use lanes::{partition_key, LaneKey, LaneRegistry};
pub use observer::{NoopObserver, PipelineObserver, RecordingObserver};
pub use queue::{Queue, QueueOptions, QueueReader, QueueWriter};
pub use stages::{Item, OutputCompletion, Sink, Source, StageOutcome, Transform};
pub use sweep::{format_elapsed, run_sweep, SweepLine};
pub use tasks::TaskGroup;
pub use topology::{RunReport, Topology};
