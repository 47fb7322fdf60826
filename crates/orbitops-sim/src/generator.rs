//! Synthetic fleet generator and bounded random-walk mutation.
//!
//! Both entry points are generic over [`rand::Rng`] so callers can drive
//! them with a seeded RNG. Neither can fail: inputs are not validated and
//! every field is drawn from a fixed range.

use rand::Rng;

use orbitops_protocol::{
    ActiveOperation, Asset, AssetKind, AssetStatus, HealthMetrics, OpPriority, OperationType,
    OrbitalPosition, ALTITUDE_KM_RANGE, CPU_PCT_RANGE, ERROR_RATE_RANGE, MEMORY_PCT_RANGE,
    STATUS_RUNNING_THRESHOLD, STATUS_STARTING_THRESHOLD, STATUS_STOPPED_THRESHOLD,
    THROUGHPUT_MBPS_RANGE, WALK_METRIC_MAX_DELTA, WALK_POSITION_MAX_DELTA_DEG,
};

const OPERATION_TYPES: [OperationType; 5] = [
    OperationType::LaserFire,
    OperationType::ThrusterBurn,
    OperationType::Downlink,
    OperationType::Imaging,
    OperationType::SensorSweep,
];

const PRIORITIES: [OpPriority; 4] = [
    OpPriority::Low,
    OpPriority::Normal,
    OpPriority::High,
    OpPriority::Critical,
];

/// Produce exactly `count` asset records with independently randomized
/// fields. Replaces the caller's whole collection; ids do not survive
/// across generation passes.
pub fn generate_fleet<R: Rng>(rng: &mut R, count: usize) -> Vec<Asset> {
    (0..count).map(|i| generate_asset(rng, i)).collect()
}

fn generate_asset<R: Rng>(rng: &mut R, index: usize) -> Asset {
    let kind = match index % 4 {
        0..=1 => AssetKind::Satellite,
        2 => AssetKind::GroundStation,
        _ => AssetKind::Relay,
    };
    let name = match kind {
        AssetKind::Satellite => format!("SAT-{}", index + 1),
        AssetKind::GroundStation => format!("GS-{}", index + 1),
        AssetKind::Relay => format!("RLY-{}", index + 1),
    };

    let mut asset = Asset::new(name, kind);
    asset.status = draw_status(rng);
    asset.metrics = HealthMetrics {
        cpu_pct: rng.gen_range(CPU_PCT_RANGE.0..=CPU_PCT_RANGE.1),
        memory_pct: rng.gen_range(MEMORY_PCT_RANGE.0..=MEMORY_PCT_RANGE.1),
        throughput_mbps: rng.gen_range(THROUGHPUT_MBPS_RANGE.0..=THROUGHPUT_MBPS_RANGE.1),
        error_rate: rng.gen_range(ERROR_RATE_RANGE.0..=ERROR_RATE_RANGE.1),
    };
    asset.position = OrbitalPosition {
        latitude_deg: rng.gen_range(-90.0..=90.0),
        longitude_deg: rng.gen_range(-180.0..=180.0),
        altitude_km: rng.gen_range(ALTITUDE_KM_RANGE.0..=ALTITUDE_KM_RANGE.1),
    };

    // 0-2 in-flight operations per asset.
    let op_count = rng.gen_range(0..=2);
    for _ in 0..op_count {
        asset.active_ops.push(draw_operation(rng, index));
    }

    asset
}

/// One uniform draw bucketed into the fixed status distribution.
fn draw_status<R: Rng>(rng: &mut R) -> AssetStatus {
    let draw: f64 = rng.gen();
    if draw < STATUS_RUNNING_THRESHOLD {
        AssetStatus::Running
    } else if draw < STATUS_STARTING_THRESHOLD {
        AssetStatus::Starting
    } else if draw < STATUS_STOPPED_THRESHOLD {
        AssetStatus::Stopped
    } else {
        AssetStatus::Error
    }
}

fn draw_operation<R: Rng>(rng: &mut R, owner_index: usize) -> ActiveOperation {
    let op_type = OPERATION_TYPES[rng.gen_range(0..OPERATION_TYPES.len())];
    // Half the operations target a nearby satellite slot; the rest are
    // untargeted and land in the shared no_target bucket when scanned.
    let target = if rng.gen_bool(0.5) {
        let slot = (owner_index + rng.gen_range(1..=3)) % 16;
        Some(format!("SAT-{}", slot + 1))
    } else {
        None
    };
    let mut op = ActiveOperation::new(op_type, target);
    op.priority = PRIORITIES[rng.gen_range(0..PRIORITIES.len())];
    op.estimated_end = op.started_at + chrono::Duration::seconds(rng.gen_range(30..=300));
    op
}

/// Mutate the fleet in place with bounded random deltas, clamping every
/// metric to its declared range. Statuses and operations are left alone;
/// only telemetry drifts between full regenerations.
pub fn random_walk<R: Rng>(rng: &mut R, assets: &mut [Asset]) {
    for asset in assets.iter_mut() {
        let m = &mut asset.metrics;
        m.cpu_pct = step(rng, m.cpu_pct, WALK_METRIC_MAX_DELTA, CPU_PCT_RANGE);
        m.memory_pct = step(rng, m.memory_pct, WALK_METRIC_MAX_DELTA, MEMORY_PCT_RANGE);
        m.throughput_mbps = step(
            rng,
            m.throughput_mbps,
            WALK_METRIC_MAX_DELTA * 4.0,
            THROUGHPUT_MBPS_RANGE,
        );
        m.error_rate = step(rng, m.error_rate, 0.5, ERROR_RATE_RANGE);

        let p = &mut asset.position;
        p.latitude_deg = step(rng, p.latitude_deg, WALK_POSITION_MAX_DELTA_DEG, (-90.0, 90.0));
        p.longitude_deg = wrap_longitude(
            p.longitude_deg + rng.gen_range(-WALK_POSITION_MAX_DELTA_DEG..=WALK_POSITION_MAX_DELTA_DEG),
        );

        asset.updated_at = chrono::Utc::now();
    }
}

fn step<R: Rng>(rng: &mut R, value: f64, max_delta: f64, range: (f64, f64)) -> f64 {
    (value + rng.gen_range(-max_delta..=max_delta)).clamp(range.0, range.1)
}

fn wrap_longitude(deg: f64) -> f64 {
    if deg > 180.0 {
        deg - 360.0
    } else if deg < -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generator_cardinality() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in [0, 1, 12, 64] {
            assert_eq!(generate_fleet(&mut rng, count).len(), count);
        }
    }

    #[test]
    fn test_generator_fields_within_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let fleet = generate_fleet(&mut rng, 100);
        for asset in &fleet {
            let m = &asset.metrics;
            assert!((CPU_PCT_RANGE.0..=CPU_PCT_RANGE.1).contains(&m.cpu_pct));
            assert!((MEMORY_PCT_RANGE.0..=MEMORY_PCT_RANGE.1).contains(&m.memory_pct));
            assert!(
                (THROUGHPUT_MBPS_RANGE.0..=THROUGHPUT_MBPS_RANGE.1).contains(&m.throughput_mbps)
            );
            assert!((ERROR_RATE_RANGE.0..=ERROR_RATE_RANGE.1).contains(&m.error_rate));
            assert!((-90.0..=90.0).contains(&asset.position.latitude_deg));
            assert!((-180.0..=180.0).contains(&asset.position.longitude_deg));
            assert!(asset.active_ops.len() <= 2);
            // Generator never assigns the derived Conflict status.
            assert_ne!(asset.status, AssetStatus::Conflict);
        }
    }

    #[test]
    fn test_generator_assigns_unique_ids() {
        let mut rng = StdRng::seed_from_u64(3);
        let fleet = generate_fleet(&mut rng, 50);
        let mut ids: Vec<&str> = fleet.iter().map(|a| a.asset_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_status_distribution_covers_enum() {
        // With a large sample every generated status bucket should appear.
        let mut rng = StdRng::seed_from_u64(11);
        let fleet = generate_fleet(&mut rng, 500);
        let mut seen = [false; 4];
        for asset in &fleet {
            match asset.status {
                AssetStatus::Running => seen[0] = true,
                AssetStatus::Starting => seen[1] = true,
                AssetStatus::Stopped => seen[2] = true,
                AssetStatus::Error => seen[3] = true,
                AssetStatus::Conflict => unreachable!("generator assigned conflict status"),
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_random_walk_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut fleet = generate_fleet(&mut rng, 20);
        for _ in 0..200 {
            random_walk(&mut rng, &mut fleet);
        }
        for asset in &fleet {
            let m = &asset.metrics;
            assert!((CPU_PCT_RANGE.0..=CPU_PCT_RANGE.1).contains(&m.cpu_pct));
            assert!((MEMORY_PCT_RANGE.0..=MEMORY_PCT_RANGE.1).contains(&m.memory_pct));
            assert!((ERROR_RATE_RANGE.0..=ERROR_RATE_RANGE.1).contains(&m.error_rate));
            assert!((-180.0..=180.0).contains(&asset.position.longitude_deg));
        }
    }

    #[test]
    fn test_random_walk_preserves_identity_and_ops() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fleet = generate_fleet(&mut rng, 10);
        let ids: Vec<String> = fleet.iter().map(|a| a.asset_id.clone()).collect();
        let op_counts: Vec<usize> = fleet.iter().map(|a| a.active_ops.len()).collect();

        random_walk(&mut rng, &mut fleet);

        let ids_after: Vec<String> = fleet.iter().map(|a| a.asset_id.clone()).collect();
        let op_counts_after: Vec<usize> = fleet.iter().map(|a| a.active_ops.len()).collect();
        assert_eq!(ids, ids_after);
        assert_eq!(op_counts, op_counts_after);
    }
}
