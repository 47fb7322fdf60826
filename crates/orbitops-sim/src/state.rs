//! Explicitly-owned fleet state shared between the sampler and the console.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use orbitops_protocol::{Asset, AssetStatus, ConflictRecord, FleetStats};

use crate::scanner::scan_conflicts;

/// Category of an event log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogCategory {
    System,
    Telemetry,
    Conflict,
    Command,
    Error,
}

/// One entry in the bounded in-memory event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub category: LogCategory,
    pub message: String,
}

/// The live fleet collection plus everything derived from it.
///
/// Owned explicitly and passed into the generator/scanner pair; the only
/// shared handle is the `Arc<RwLock<FleetState>>` held by the sampler task
/// and the console loop.
pub struct FleetState {
    pub assets: Vec<Asset>,
    /// Conflicts from the latest scan, minus any the operator resolved.
    pub conflicts: Vec<ConflictRecord>,
    pub stats: FleetStats,
    pub event_log: Vec<LogEntry>,
    log_capacity: usize,
    /// Number of completed sampler ticks since start.
    pub tick_count: u64,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl FleetState {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            assets: Vec::new(),
            conflicts: Vec::new(),
            stats: FleetStats::default(),
            event_log: Vec::new(),
            log_capacity,
            tick_count: 0,
            started_at: chrono::Utc::now(),
        }
    }

    /// Push a log entry, dropping the oldest once the cap is reached.
    pub fn push_log(&mut self, category: LogCategory, message: String) {
        if self.event_log.len() >= self.log_capacity {
            self.event_log.remove(0);
        }
        self.event_log.push(LogEntry {
            timestamp: chrono::Utc::now(),
            category,
            message,
        });
    }

    /// Replace the whole asset collection with a fresh generation pass.
    pub fn replace_assets(&mut self, assets: Vec<Asset>) {
        self.assets = assets;
    }

    /// Recompute conflicts and aggregates from the current collection.
    ///
    /// Assets implicated in a conflict are flagged with the derived
    /// `Conflict` status; everything else keeps its generated status.
    pub fn rescan(&mut self) {
        self.conflicts = scan_conflicts(&self.assets);

        let conflicted: HashSet<&str> = self
            .conflicts
            .iter()
            .flat_map(|c| c.participants.iter().map(|p| p.asset_id.as_str()))
            .collect();
        for asset in &mut self.assets {
            if conflicted.contains(asset.asset_id.as_str()) {
                asset.status = AssetStatus::Conflict;
            }
        }

        self.stats = FleetStats::compute(&self.assets, &self.conflicts);
    }

    /// Remove a conflict from local state only. Returns whether a record
    /// with that id existed. The next scan recomputes from the collection,
    /// so an equivalent conflict reappears if the underlying operations
    /// still collide.
    pub fn resolve_conflict(&mut self, conflict_id: &str) -> bool {
        let before = self.conflicts.len();
        self.conflicts.retain(|c| c.id() != conflict_id);
        let removed = self.conflicts.len() < before;
        if removed {
            self.stats = FleetStats::compute(&self.assets, &self.conflicts);
        }
        removed
    }

    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
            .max(0)
    }
}
