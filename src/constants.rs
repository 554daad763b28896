//! # Harness Constants
//!
//! Default sweep values, output labels and the benchmark argument rows used by
//! the criterion benches.

/// Environment variable prefix for every harness setting
pub const ENV_PREFIX: &str = "CHANNEL_BENCH";

/// Default sweep parameters
pub mod defaults {
    pub const WORK_SIZE: u64 = 1000;
    pub const PARTITIONS: u64 = 4;
    pub const READERS: usize = 1;
    pub const SOURCE_DELAY_MS: u64 = 1;
    pub const DELAYS_MS: [u64; 3] = [4, 6, 12];
    pub const ALLOW_SYNCHRONOUS_CONTINUATIONS: bool = false;
}

/// Labels printed by the console sweep, one per topology
pub mod labels {
    pub const SEQUENTIAL: &str = "Normal";
    pub const UNPARTITIONED: &str = "Channels";
    pub const ONE_LEVEL_PARTITIONED: &str = "One level partitioned channels";
    pub const FULLY_PARTITIONED: &str = "Fully partitioned channels";
}

/// Argument rows for the criterion benches.
///
/// Delays are in milliseconds: `(source, transform, sink)`.
pub mod bench_rows {
    /// `(work_size, source_ms, transform_ms, sink_ms, allow_synchronous_continuations)`
    pub const UNPARTITIONED: [(u64, u64, u64, u64, bool); 6] = [
        (100, 1, 6, 6, false),
        (1000, 1, 6, 6, false),
        (10000, 1, 6, 6, false),
        (100, 1, 6, 6, true),
        (1000, 1, 6, 6, true),
        (10000, 1, 6, 6, true),
    ];

    /// `(work_size, partitions, readers, source_ms, transform_ms, sink_ms, allow_synchronous_continuations)`
    pub const ONE_LEVEL_PARTITIONED: [(u64, u64, usize, u64, u64, u64, bool); 6] = [
        (100, 4, 4, 1, 6, 6, false),
        (1000, 4, 4, 1, 6, 6, false),
        (10000, 8, 8, 1, 6, 6, false),
        (100, 4, 4, 1, 6, 6, true),
        (1000, 4, 4, 1, 6, 6, true),
        (10000, 8, 8, 1, 6, 6, true),
    ];

    /// `(work_size, partitions, source_ms, transform_ms, sink_ms, allow_synchronous_continuations)`
    pub const FULLY_PARTITIONED: [(u64, u64, u64, u64, u64, bool); 6] = [
        (100, 4, 1, 6, 6, false),
        (1000, 4, 1, 6, 6, false),
        (10000, 8, 1, 6, 6, false),
        (100, 4, 1, 6, 6, true),
        (1000, 4, 1, 6, 6, true),
        (10000, 8, 1, 6, 6, true),
    ];
}
