//! # Topology Sweep
//!
//! Times every pipeline topology across a cross product of transform and
//! sink delays and prints one line per run to stdout. Runs with no
//! arguments; `CHANNEL_BENCH_*` environment variables and the flags below
//! override the defaults.

use anyhow::Context;
use channel_topologies::logging::{init_structured_logging, log_error, log_run_report};
use channel_topologies::{run_sweep, PacingPolicy, SweepConfig, Topology};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "topology-sweep")]
#[command(about = "Time channel pipeline topologies across delay configurations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Items produced per run
    #[arg(long)]
    work_size: Option<u64>,

    /// Partition keys for the partitioned topologies
    #[arg(long)]
    partitions: Option<u64>,

    /// Sinks reading the shared queue in the one-level topology
    #[arg(long)]
    readers: Option<usize>,

    /// Source pacing delay in milliseconds
    #[arg(long)]
    source_delay_ms: Option<u64>,

    /// Delay values crossed into (transform, sink) pairs, comma-separated
    #[arg(long, value_delimiter = ',')]
    delays_ms: Option<Vec<u64>>,

    /// Let consumers continue inline after a dequeue
    #[arg(long)]
    allow_synchronous_continuations: Option<bool>,

    /// Where the source sleeps relative to each enqueue
    #[arg(long, value_enum)]
    pacing: Option<PacingArg>,

    /// Restrict the sweep to these topologies (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    topologies: Vec<TopologyArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum PacingArg {
    /// Sleep, then enqueue
    Before,
    /// Enqueue, then sleep
    After,
}

impl From<PacingArg> for PacingPolicy {
    fn from(arg: PacingArg) -> Self {
        match arg {
            PacingArg::Before => PacingPolicy::DelayBeforeEnqueue,
            PacingArg::After => PacingPolicy::DelayAfterEnqueue,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum TopologyArg {
    Sequential,
    Unpartitioned,
    OneLevel,
    Fully,
}

impl From<TopologyArg> for Topology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Sequential => Topology::Sequential,
            TopologyArg::Unpartitioned => Topology::Unpartitioned,
            TopologyArg::OneLevel => Topology::OneLevelPartitioned,
            TopologyArg::Fully => Topology::FullyPartitioned,
        }
    }
}

impl Cli {
    fn apply(self, mut sweep: SweepConfig) -> (SweepConfig, Vec<Topology>) {
        if let Some(work_size) = self.work_size {
            sweep.work_size = work_size;
        }
        if let Some(partitions) = self.partitions {
            sweep.partitions = partitions;
        }
        if let Some(readers) = self.readers {
            sweep.readers = readers;
        }
        if let Some(source_delay_ms) = self.source_delay_ms {
            sweep.source_delay_ms = source_delay_ms;
        }
        if let Some(delays_ms) = self.delays_ms {
            sweep.delays_ms = delays_ms;
        }
        if let Some(allow) = self.allow_synchronous_continuations {
            sweep.allow_synchronous_continuations = allow;
        }
        if let Some(pacing) = self.pacing {
            sweep.pacing = pacing.into();
        }

        let topologies = if self.topologies.is_empty() {
            Topology::ALL.to_vec()
        } else {
            self.topologies.into_iter().map(Topology::from).collect()
        };

        (sweep, topologies)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let sweep = SweepConfig::from_env().context("loading sweep configuration")?;
    let (sweep, topologies) = cli.apply(sweep);

    let result = run_sweep(&sweep, &topologies, |line| {
        println!("{line}");
        log_run_report(&line.report, line.first_delay_ms, line.second_delay_ms);
    })
    .await;

    if let Err(err) = &result {
        log_error("topology-sweep", "run_sweep", &err.to_string());
    }

    result.context("sweep aborted")?;
    Ok(())
}
