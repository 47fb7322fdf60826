use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::NO_TARGET_KEY;
use crate::error::ProtocolError;

/// Kind of infrastructure asset shown in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Satellite,
    GroundStation,
    Relay,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Satellite => "satellite",
            Self::GroundStation => "ground_station",
            Self::Relay => "relay",
        };
        write!(f, "{s}")
    }
}

/// Current status of an asset.
///
/// The generator only assigns the first four variants; `Conflict` is
/// applied after a scan pass to assets implicated in a conflict record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssetStatus {
    #[default]
    Running,
    Starting,
    Stopped,
    Error,
    Conflict,
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Starting => "starting",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Conflict => "conflict",
        };
        write!(f, "{s}")
    }
}

/// Synthetic health metrics attached to every asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub throughput_mbps: f64,
    pub error_rate: f64,
}

/// Simulated orbital (or site) position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Type of an in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    LaserFire,
    ThrusterBurn,
    Downlink,
    Imaging,
    SensorSweep,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LaserFire => "laser_fire",
            Self::ThrusterBurn => "thruster_burn",
            Self::Downlink => "downlink",
            Self::Imaging => "imaging",
            Self::SensorSweep => "sensor_sweep",
        }
    }

    /// Parse an operator-typed label.
    pub fn parse(label: &str) -> Result<Self, ProtocolError> {
        match label {
            "laser_fire" => Ok(Self::LaserFire),
            "thruster_burn" => Ok(Self::ThrusterBurn),
            "downlink" => Ok(Self::Downlink),
            "imaging" => Ok(Self::Imaging),
            "sensor_sweep" => Ok(Self::SensorSweep),
            other => Err(ProtocolError::UnknownLabel(other.to_string())),
        }
    }

    /// Whether simultaneous execution of this operation type against the
    /// same target is treated as a critical conflict.
    pub fn is_hazardous(&self) -> bool {
        matches!(self, Self::LaserFire)
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of an in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum OpPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// A mock in-flight action attributed to exactly one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveOperation {
    pub op_id: String,
    pub op_type: OperationType,
    /// Target asset or ground contact, if any.
    pub target: Option<String>,
    pub priority: OpPriority,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub estimated_end: chrono::DateTime<chrono::Utc>,
}

impl ActiveOperation {
    pub fn new(op_type: OperationType, target: Option<String>) -> Self {
        let started_at = chrono::Utc::now();
        Self {
            op_id: Uuid::new_v4().to_string(),
            op_type,
            target,
            priority: OpPriority::Normal,
            started_at,
            estimated_end: started_at + chrono::Duration::seconds(60),
        }
    }

    /// Grouping key for conflict scanning: operation type plus target,
    /// with untargeted operations sharing the `no_target` bucket.
    pub fn group_key(&self) -> String {
        let target = self.target.as_deref().unwrap_or(NO_TARGET_KEY);
        format!("{}:{}", self.op_type.as_str(), target)
    }
}

/// A mock record representing one simulated piece of infrastructure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: String,
    pub name: String,
    pub kind: AssetKind,
    pub status: AssetStatus,
    pub metrics: HealthMetrics,
    pub position: OrbitalPosition,
    pub active_ops: Vec<ActiveOperation>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Asset {
    pub fn new(name: String, kind: AssetKind) -> Self {
        Self {
            asset_id: Uuid::new_v4().to_string(),
            name,
            kind,
            status: AssetStatus::Running,
            metrics: HealthMetrics {
                cpu_pct: 0.0,
                memory_pct: 0.0,
                throughput_mbps: 0.0,
                error_rate: 0.0,
            },
            position: OrbitalPosition {
                latitude_deg: 0.0,
                longitude_deg: 0.0,
                altitude_km: 0.0,
            },
            active_ops: Vec::new(),
            updated_at: chrono::Utc::now(),
        }
    }
}

/// Severity of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    /// Simultaneous hazardous operations (laser fire) on one target.
    Critical,
    /// Generic resource overlap.
    Error,
}

impl std::fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Critical => "critical",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// One `(asset, operation)` pair implicated in a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictParticipant {
    pub asset_id: String,
    pub op_id: String,
}

/// A derived flag raised when two or more operations share a grouping key.
///
/// Recomputed from scratch on every scan; never stored authoritatively.
/// The record carries no timestamp and no generated id so that scanning the
/// same input twice yields identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Grouping key: `<op_type>:<target|no_target>`.
    pub key: String,
    pub op_type: OperationType,
    pub severity: ConflictSeverity,
    /// Participants in asset iteration order.
    pub participants: Vec<ConflictParticipant>,
    pub description: String,
}

impl ConflictRecord {
    /// Stable identifier, equal across scans of the same colliding data.
    pub fn id(&self) -> &str {
        &self.key
    }
}

/// Aggregate counts rendered in the console header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FleetStats {
    pub total_assets: usize,
    pub running: usize,
    pub starting: usize,
    pub stopped: usize,
    pub errored: usize,
    pub conflicted: usize,
    pub total_ops: usize,
    pub critical_conflicts: usize,
    pub error_conflicts: usize,
}

impl FleetStats {
    pub fn compute(assets: &[Asset], conflicts: &[ConflictRecord]) -> Self {
        let mut stats = Self {
            total_assets: assets.len(),
            ..Self::default()
        };
        for asset in assets {
            match asset.status {
                AssetStatus::Running => stats.running += 1,
                AssetStatus::Starting => stats.starting += 1,
                AssetStatus::Stopped => stats.stopped += 1,
                AssetStatus::Error => stats.errored += 1,
                AssetStatus::Conflict => stats.conflicted += 1,
            }
            stats.total_ops += asset.active_ops.len();
        }
        for conflict in conflicts {
            match conflict.severity {
                ConflictSeverity::Critical => stats.critical_conflicts += 1,
                ConflictSeverity::Error => stats.error_conflicts += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_creation() {
        let asset = Asset::new("SAT-1".into(), AssetKind::Satellite);
        assert_eq!(asset.status, AssetStatus::Running);
        assert!(asset.active_ops.is_empty());
        assert_eq!(asset.kind, AssetKind::Satellite);
    }

    #[test]
    fn test_operation_group_key_with_target() {
        let op = ActiveOperation::new(OperationType::LaserFire, Some("SAT-2".into()));
        assert_eq!(op.group_key(), "laser_fire:SAT-2");
    }

    #[test]
    fn test_operation_group_key_without_target() {
        let op = ActiveOperation::new(OperationType::Imaging, None);
        assert_eq!(op.group_key(), "imaging:no_target");
    }

    #[test]
    fn test_operation_type_parse_roundtrip() {
        for op_type in [
            OperationType::LaserFire,
            OperationType::ThrusterBurn,
            OperationType::Downlink,
            OperationType::Imaging,
            OperationType::SensorSweep,
        ] {
            assert_eq!(OperationType::parse(op_type.as_str()).unwrap(), op_type);
        }
    }

    #[test]
    fn test_operation_type_parse_unknown() {
        let err = OperationType::parse("warp_drive").unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownLabel(label) if label == "warp_drive"));
    }

    #[test]
    fn test_only_laser_fire_is_hazardous() {
        assert!(OperationType::LaserFire.is_hazardous());
        assert!(!OperationType::ThrusterBurn.is_hazardous());
        assert!(!OperationType::Downlink.is_hazardous());
    }

    #[test]
    fn test_asset_serialization_roundtrip() {
        let mut asset = Asset::new("GS-BERLIN".into(), AssetKind::GroundStation);
        asset.metrics = HealthMetrics {
            cpu_pct: 42.5,
            memory_pct: 63.0,
            throughput_mbps: 120.0,
            error_rate: 0.4,
        };
        asset
            .active_ops
            .push(ActiveOperation::new(OperationType::Downlink, Some("SAT-7".into())));

        let json = serde_json::to_string(&asset).unwrap();
        let restored: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, asset);
    }

    #[test]
    fn test_conflict_record_serialization_roundtrip() {
        let record = ConflictRecord {
            key: "laser_fire:SAT-1".to_string(),
            op_type: OperationType::LaserFire,
            severity: ConflictSeverity::Critical,
            participants: vec![
                ConflictParticipant {
                    asset_id: "a1".into(),
                    op_id: "o1".into(),
                },
                ConflictParticipant {
                    asset_id: "a2".into(),
                    op_id: "o2".into(),
                },
            ],
            description: "2 simultaneous laser_fire operations on SAT-1".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let restored: ConflictRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.id(), "laser_fire:SAT-1");
    }

    #[test]
    fn test_fleet_stats_counts() {
        let mut a = Asset::new("SAT-1".into(), AssetKind::Satellite);
        a.status = AssetStatus::Running;
        a.active_ops
            .push(ActiveOperation::new(OperationType::Imaging, None));
        let mut b = Asset::new("SAT-2".into(), AssetKind::Satellite);
        b.status = AssetStatus::Error;
        let mut c = Asset::new("GS-1".into(), AssetKind::GroundStation);
        c.status = AssetStatus::Conflict;
        c.active_ops
            .push(ActiveOperation::new(OperationType::Downlink, Some("SAT-1".into())));
        c.active_ops
            .push(ActiveOperation::new(OperationType::Downlink, Some("SAT-2".into())));

        let conflicts = vec![ConflictRecord {
            key: "downlink:SAT-1".into(),
            op_type: OperationType::Downlink,
            severity: ConflictSeverity::Error,
            participants: Vec::new(),
            description: String::new(),
        }];

        let stats = FleetStats::compute(&[a, b, c], &conflicts);
        assert_eq!(stats.total_assets, 3);
        assert_eq!(stats.running, 1);
        assert_eq!(stats.errored, 1);
        assert_eq!(stats.conflicted, 1);
        assert_eq!(stats.total_ops, 3);
        assert_eq!(stats.error_conflicts, 1);
        assert_eq!(stats.critical_conflicts, 0);
    }

    #[test]
    fn test_status_display_labels() {
        assert_eq!(AssetStatus::Running.to_string(), "running");
        assert_eq!(AssetStatus::Conflict.to_string(), "conflict");
        assert_eq!(ConflictSeverity::Critical.to_string(), "critical");
    }
}
