//! OrbitOps simulation engine.
//!
//! Produces the synthetic fleet telemetry behind the console: a generator
//! for randomized asset records, a bounded random-walk mutator, the
//! interval sampler that drives both on a timer, and the conflict scanner
//! that flags colliding in-flight operations.

pub mod export;
pub mod generator;
pub mod sampler;
pub mod scanner;
pub mod state;

pub use export::{export_snapshot, write_snapshot, FleetSnapshot};
pub use generator::{generate_fleet, random_walk};
pub use sampler::{Sampler, SamplerHandle, SamplerOptions, SampleMode};
pub use scanner::scan_conflicts;
pub use state::{FleetState, LogCategory, LogEntry};
