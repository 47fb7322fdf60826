//! Fixed ranges and defaults for the simulated fleet.

/// Default number of assets per generation pass.
pub const DEFAULT_ASSET_COUNT: usize = 12;

/// Default fleet tick period in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2000;

/// Default cap on the in-memory event log.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Grouping key used for operations without a target.
///
/// Untargeted operations of the same type land in the same bucket and are
/// therefore reported as conflicting with each other.
pub const NO_TARGET_KEY: &str = "no_target";

/// Status assignment buckets one uniform draw in [0, 1).
pub const STATUS_RUNNING_THRESHOLD: f64 = 0.70;
pub const STATUS_STARTING_THRESHOLD: f64 = 0.85;
pub const STATUS_STOPPED_THRESHOLD: f64 = 0.95;

/// Health metric ranges.
pub const CPU_PCT_RANGE: (f64, f64) = (10.0, 90.0);
pub const MEMORY_PCT_RANGE: (f64, f64) = (20.0, 95.0);
pub const THROUGHPUT_MBPS_RANGE: (f64, f64) = (5.0, 500.0);
pub const ERROR_RATE_RANGE: (f64, f64) = (0.0, 5.0);

/// Per-tick bounds for the random-walk mutation step.
pub const WALK_METRIC_MAX_DELTA: f64 = 5.0;
pub const WALK_POSITION_MAX_DELTA_DEG: f64 = 2.0;

/// Orbit altitude band in kilometres (LEO shell).
pub const ALTITUDE_KM_RANGE: (f64, f64) = (400.0, 1200.0);

/// Filename prefix for exported snapshots.
pub const SNAPSHOT_FILE_PREFIX: &str = "orbitops-snapshot";
