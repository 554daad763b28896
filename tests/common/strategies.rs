use channel_topologies::{PacingPolicy, RunConfig, StageDelays};
use proptest::prelude::*;

/// Strategy for work sizes, including the empty run
pub fn work_size_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1u64..64, 64u64..400]
}

/// Strategy for partition counts
pub fn partitions_strategy() -> impl Strategy<Value = u64> {
    1u64..9
}

/// Strategy for zero-delay run configs across every knob
pub fn run_config_strategy() -> impl Strategy<Value = RunConfig> {
    (
        work_size_strategy(),
        partitions_strategy(),
        1usize..5,
        any::<bool>(),
        prop_oneof![
            Just(PacingPolicy::DelayBeforeEnqueue),
            Just(PacingPolicy::DelayAfterEnqueue)
        ],
    )
        .prop_map(|(work_size, partitions, readers, sync, pacing)| {
            RunConfig::new(work_size, partitions)
                .with_readers(readers)
                .with_delays(StageDelays::ZERO)
                .with_synchronous_continuations(sync)
                .with_pacing(pacing)
        })
}
