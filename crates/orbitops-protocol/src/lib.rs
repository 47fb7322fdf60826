//! OrbitOps protocol - core types for the simulated constellation console.
//!
//! Defines the asset, operation, and conflict records shared by the
//! telemetry simulator and the operator console.

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::*;
pub use types::*;
