use orbitops_protocol::{
    ActiveOperation, Asset, AssetKind, OperationType, DEFAULT_LOG_CAPACITY, SNAPSHOT_FILE_PREFIX,
};
use orbitops_sim::{export_snapshot, write_snapshot, FleetSnapshot, FleetState};

fn populated_state() -> FleetState {
    let mut state = FleetState::new(DEFAULT_LOG_CAPACITY);
    let mut a = Asset::new("SAT-1".into(), AssetKind::Satellite);
    a.active_ops.push(ActiveOperation::new(
        OperationType::LaserFire,
        Some("SAT-3".into()),
    ));
    let mut b = Asset::new("SAT-2".into(), AssetKind::Satellite);
    b.active_ops.push(ActiveOperation::new(
        OperationType::LaserFire,
        Some("SAT-3".into()),
    ));
    state.replace_assets(vec![a, b]);
    state.rescan();
    state.tick_count = 17;
    state
}

#[test]
fn test_export_writes_date_stamped_file() {
    let state = populated_state();
    let dir = tempfile::tempdir().unwrap();

    let path = export_snapshot(&state, dir.path()).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with(SNAPSHOT_FILE_PREFIX));
    assert!(name.ends_with(".json"));
    assert!(path.exists());
}

#[test]
fn test_export_round_trip_is_lossless() {
    let state = populated_state();
    let dir = tempfile::tempdir().unwrap();

    let path = export_snapshot(&state, dir.path()).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let restored: FleetSnapshot = serde_json::from_str(&raw).unwrap();

    assert_eq!(restored.tick_count, 17);
    assert_eq!(restored.assets, state.assets);
    assert_eq!(restored.conflicts, state.conflicts);
    assert_eq!(restored.stats, state.stats);
}

#[test]
fn test_write_snapshot_to_explicit_path_creates_parents() {
    let state = populated_state();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out/fleet.json");

    let snapshot = FleetSnapshot::capture(&state);
    write_snapshot(&snapshot, &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let restored: FleetSnapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored.assets.len(), 2);
    assert_eq!(restored.conflicts.len(), 1);
}

#[test]
fn test_export_into_unwritable_location_fails_cleanly() {
    let state = populated_state();
    let dir = tempfile::tempdir().unwrap();
    // A plain file where the target directory should be.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = export_snapshot(&state, &blocker).unwrap_err();
    assert!(matches!(err, orbitops_protocol::ProtocolError::Io(_)));
}
