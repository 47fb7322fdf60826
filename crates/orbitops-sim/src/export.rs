//! One-way JSON snapshot export.
//!
//! Serializes the current in-memory fleet collection to a pretty-printed
//! JSON file with a date-stamped name. Best-effort convenience: there is
//! no import path, but the written shape is lossless for the fleet types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use orbitops_protocol::{
    Asset, ConflictRecord, FleetStats, ProtocolError, SNAPSHOT_FILE_PREFIX,
};

use crate::state::FleetState;

/// Serialized form of the fleet at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub exported_at: chrono::DateTime<chrono::Utc>,
    pub tick_count: u64,
    pub assets: Vec<Asset>,
    pub conflicts: Vec<ConflictRecord>,
    pub stats: FleetStats,
}

impl FleetSnapshot {
    pub fn capture(state: &FleetState) -> Self {
        Self {
            exported_at: chrono::Utc::now(),
            tick_count: state.tick_count,
            assets: state.assets.clone(),
            conflicts: state.conflicts.clone(),
            stats: state.stats,
        }
    }
}

/// Export the current fleet to `<dir>/orbitops-snapshot-YYYYMMDD-HHMMSS.json`.
/// Returns the path written.
pub fn export_snapshot(state: &FleetState, dir: &Path) -> Result<PathBuf, ProtocolError> {
    let snapshot = FleetSnapshot::capture(state);
    let stamp = snapshot.exported_at.format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{SNAPSHOT_FILE_PREFIX}-{stamp}.json"));
    write_snapshot(&snapshot, &path)?;
    Ok(path)
}

/// Write a snapshot to an explicit path.
pub fn write_snapshot(snapshot: &FleetSnapshot, path: &Path) -> Result<(), ProtocolError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Fleet snapshot exported");
    Ok(())
}
