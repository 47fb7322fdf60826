use thiserror::Error;

/// Errors surfaced by the OrbitOps core.
///
/// The generator and scanner are total functions and never return these;
/// errors arise only at the boundaries: configuration parsing, operator
/// input, and snapshot export.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("snapshot export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
