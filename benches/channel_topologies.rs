//! Channel Topology Benchmarks
//!
//! Wall-clock cost of pushing a work set through each pipeline topology with
//! fixed per-stage delays, with and without synchronous continuations.

use channel_topologies::constants::bench_rows;
use channel_topologies::{RunConfig, StageDelays, Topology};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
}

fn bench_topology(c: &mut Criterion, group_name: &str, topology: Topology, rows: &[(String, RunConfig)]) {
    let rt = runtime();
    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(30));

    for (parameter, config) in rows {
        group.throughput(Throughput::Elements(config.work_size));
        group.bench_with_input(BenchmarkId::from_parameter(parameter), config, |b, config| {
            b.to_async(&rt).iter(|| async {
                topology.run(config).await.expect("pipeline run failed")
            });
        });
    }

    group.finish();
}

fn benchmark_unpartitioned(c: &mut Criterion) {
    let rows: Vec<(String, RunConfig)> = bench_rows::UNPARTITIONED
        .iter()
        .map(|&(work_size, source, transform, sink, sync)| {
            (
                format!("n={work_size}/sync={sync}"),
                RunConfig::new(work_size, 1)
                    .with_delays(StageDelays::from_millis(source, transform, sink))
                    .with_synchronous_continuations(sync),
            )
        })
        .collect();

    bench_topology(c, "unpartitioned", Topology::Unpartitioned, &rows);
}

fn benchmark_one_level_partitioned(c: &mut Criterion) {
    let rows: Vec<(String, RunConfig)> = bench_rows::ONE_LEVEL_PARTITIONED
        .iter()
        .map(|&(work_size, partitions, readers, source, transform, sink, sync)| {
            (
                format!("n={work_size}/k={partitions}/r={readers}/sync={sync}"),
                RunConfig::new(work_size, partitions)
                    .with_readers(readers)
                    .with_delays(StageDelays::from_millis(source, transform, sink))
                    .with_synchronous_continuations(sync),
            )
        })
        .collect();

    bench_topology(c, "one_level_partitioned", Topology::OneLevelPartitioned, &rows);
}

fn benchmark_fully_partitioned(c: &mut Criterion) {
    let rows: Vec<(String, RunConfig)> = bench_rows::FULLY_PARTITIONED
        .iter()
        .map(|&(work_size, partitions, source, transform, sink, sync)| {
            (
                format!("n={work_size}/k={partitions}/sync={sync}"),
                RunConfig::new(work_size, partitions)
                    .with_delays(StageDelays::from_millis(source, transform, sink))
                    .with_synchronous_continuations(sync),
            )
        })
        .collect();

    bench_topology(c, "fully_partitioned", Topology::FullyPartitioned, &rows);
}

criterion_group!(
    benches,
    benchmark_unpartitioned,
    benchmark_one_level_partitioned,
    benchmark_fully_partitioned
);
criterion_main!(benches);
