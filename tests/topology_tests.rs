//! Topology Integration Tests
//!
//! End-to-end runs of every topology: item accounting, lane routing,
//! completion ordering and failure propagation.

mod common;

use channel_topologies::{PacingPolicy, PipelineError, RunConfig, StageDelays, Topology};
use common::{instant_config, run_recorded, QUEUED_TOPOLOGIES};
use std::time::Duration;

#[tokio::test]
async fn single_partition_preserves_order() {
    let config = instant_config(3, 1);

    for topology in QUEUED_TOPOLOGIES {
        let (report, observer) = run_recorded(topology, &config).await;

        assert_eq!(report.lanes_created, 1, "{topology}");
        assert_eq!(observer.lanes(), vec![0], "{topology}");
        assert_eq!(observer.lane_items(0), vec![0, 1, 2], "{topology}");
        assert_eq!(observer.sink_items(0), vec![0, 1, 2], "{topology}");
        assert_eq!(report.items_sunk, 3, "{topology}");
    }
}

#[tokio::test]
async fn two_partitions_split_by_modulo() {
    let config = instant_config(4, 2);

    for topology in [Topology::OneLevelPartitioned, Topology::FullyPartitioned] {
        let (report, observer) = run_recorded(topology, &config).await;

        assert_eq!(report.lanes_created, 2, "{topology}");
        assert_eq!(observer.lane_items(0), vec![0, 2], "{topology}");
        assert_eq!(observer.lane_items(1), vec![1, 3], "{topology}");
        assert_eq!(observer.sunk_items(), vec![0, 1, 2, 3], "{topology}");
        assert_eq!(report.items_sunk, 4, "{topology}");
    }
}

#[tokio::test]
async fn fully_partitioned_sinks_are_private_to_their_lane() {
    let config = instant_config(9, 3);
    let (_, observer) = run_recorded(Topology::FullyPartitioned, &config).await;

    assert_eq!(observer.sink_items(0), vec![0, 3, 6]);
    assert_eq!(observer.sink_items(1), vec![1, 4, 7]);
    assert_eq!(observer.sink_items(2), vec![2, 5, 8]);
}

#[tokio::test]
async fn empty_run_creates_no_lanes() {
    let config = instant_config(0, 4);

    for topology in Topology::ALL {
        let (report, observer) = run_recorded(topology, &config).await;

        assert_eq!(report.items_produced, 0, "{topology}");
        assert_eq!(report.items_sunk, 0, "{topology}");
        assert_eq!(observer.sunk_count(), 0, "{topology}");
        assert!(observer.lanes().is_empty(), "{topology}");
    }

    for topology in [Topology::OneLevelPartitioned, Topology::FullyPartitioned] {
        let report = topology.run(&config).await.unwrap();
        assert_eq!(report.lanes_created, 0, "{topology}");
    }
}

#[tokio::test]
async fn shared_queue_with_several_readers_delivers_everything() {
    let config = instant_config(200, 5).with_readers(3);
    let (report, observer) = run_recorded(Topology::OneLevelPartitioned, &config).await;

    assert_eq!(report.lanes_created, 5);
    assert_eq!(report.items_transformed, 200);
    assert_eq!(report.items_sunk, 200);
    assert_eq!(observer.sunk_items(), (0..200).collect::<Vec<_>>());
}

#[tokio::test]
async fn more_partitions_than_items_only_builds_seen_lanes() {
    let config = instant_config(3, 10);

    for topology in [Topology::OneLevelPartitioned, Topology::FullyPartitioned] {
        let (report, observer) = run_recorded(topology, &config).await;
        assert_eq!(report.lanes_created, 3, "{topology}");
        assert_eq!(observer.lanes(), vec![0, 1, 2], "{topology}");
    }
}

#[tokio::test]
async fn continuation_mode_and_pacing_do_not_change_results() {
    for sync in [false, true] {
        for pacing in [PacingPolicy::DelayBeforeEnqueue, PacingPolicy::DelayAfterEnqueue] {
            let config = instant_config(50, 4)
                .with_readers(2)
                .with_synchronous_continuations(sync)
                .with_pacing(pacing);

            for topology in Topology::ALL {
                let (report, observer) = run_recorded(topology, &config).await;
                assert_eq!(report.items_sunk, 50, "{topology} sync={sync} {pacing:?}");
                assert_eq!(observer.sunk_items(), (0..50).collect::<Vec<_>>());
            }
        }
    }
}

#[tokio::test]
async fn sequential_baseline_runs_every_item_inline() {
    let (report, observer) = run_recorded(Topology::Sequential, &instant_config(5, 1)).await;

    assert_eq!(report.lanes_created, 0);
    assert_eq!(report.items_transformed, 5);
    assert_eq!(observer.sink_items(0), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn transform_fault_aborts_the_run() {
    let config = instant_config(20, 4).with_transform_fault(6);

    for topology in QUEUED_TOPOLOGIES {
        let err = topology.run(&config).await.unwrap_err();
        assert!(
            matches!(err, PipelineError::InjectedFault { item: 6, .. }),
            "{topology}: {err}"
        );
    }
}

#[tokio::test]
async fn zero_readers_is_rejected() {
    let config = instant_config(10, 2).with_readers(0);
    let err = Topology::OneLevelPartitioned.run(&config).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidConfiguration(_)));
}

#[tokio::test(start_paused = true)]
async fn pipelining_beats_the_sequential_baseline() {
    let config = RunConfig::new(8, 4).with_delays(StageDelays::from_millis(0, 10, 10));

    let sequential = Topology::Sequential.run(&config).await.unwrap();
    let unpartitioned = Topology::Unpartitioned.run(&config).await.unwrap();
    let fully = Topology::FullyPartitioned.run(&config).await.unwrap();

    assert!(sequential.elapsed >= Duration::from_millis(160));
    assert!(unpartitioned.elapsed < sequential.elapsed);
    assert!(fully.elapsed < unpartitioned.elapsed);
}
