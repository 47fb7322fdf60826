//! Conflict scanner over the current asset collection.
//!
//! Pure and deterministic: recomputes every conflict from scratch on each
//! call, with no internal counters, clocks, or randomness. Scanning the
//! same input twice yields identical output.

use std::collections::HashMap;

use orbitops_protocol::{
    Asset, ConflictParticipant, ConflictRecord, ConflictSeverity, OperationType, NO_TARGET_KEY,
};

/// Group all in-flight operations across all assets by
/// `(operation type, target)` and emit one conflict record for every group
/// with more than one member.
///
/// Severity is `Critical` when the colliding operation type is hazardous
/// (laser fire), `Error` for generic resource overlap. Record order follows
/// asset iteration order (first appearance of each colliding key). An asset
/// with no operations contributes nothing.
///
/// Untargeted operations of the same type share the `no_target` bucket and
/// are reported as mutually conflicting even when unrelated. Known false
/// positive, kept until intent for untargeted operations is settled.
pub fn scan_conflicts(assets: &[Asset]) -> Vec<ConflictRecord> {
    let mut groups: HashMap<String, (OperationType, Vec<ConflictParticipant>)> = HashMap::new();
    let mut key_order: Vec<String> = Vec::new();

    for asset in assets {
        for op in &asset.active_ops {
            let key = op.group_key();
            let entry = groups.entry(key.clone()).or_insert_with(|| {
                key_order.push(key);
                (op.op_type, Vec::new())
            });
            entry.1.push(ConflictParticipant {
                asset_id: asset.asset_id.clone(),
                op_id: op.op_id.clone(),
            });
        }
    }

    key_order
        .into_iter()
        .filter_map(|key| {
            let (op_type, participants) = groups.remove(&key)?;
            if participants.len() < 2 {
                return None;
            }
            let severity = if op_type.is_hazardous() {
                ConflictSeverity::Critical
            } else {
                ConflictSeverity::Error
            };
            let target = key
                .split_once(':')
                .map(|(_, t)| t)
                .unwrap_or(NO_TARGET_KEY)
                .to_string();
            let description = format!(
                "{} simultaneous {} operations on {}",
                participants.len(),
                op_type.as_str(),
                target
            );
            Some(ConflictRecord {
                key,
                op_type,
                severity,
                participants,
                description,
            })
        })
        .collect()
}
