//! Simulated command uplink.
//!
//! Purely cosmetic pacing: an artificial delay followed by a synthetic
//! success/failure draw. A failure flips the record's badge and logs a
//! warning; nothing retries and nothing propagates past the console.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use orbitops_protocol::OperationType;
use orbitops_sim::{FleetState, LogCategory};

/// Synthetic uplink delay.
pub const UPLINK_DELAY: Duration = Duration::from_millis(400);

/// Probability that a simulated uplink fails.
pub const UPLINK_FAILURE_RATE: f64 = 0.15;

#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("no acknowledgement from {0}")]
    NoAck(String),
}

/// Lifecycle of a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Dispatched,
    Succeeded,
    Failed,
}

/// One operator-issued command and its badge state.
#[derive(Debug, Clone)]
pub struct CommandRecord {
    pub command_id: String,
    pub asset_name: String,
    pub op_type: OperationType,
    pub state: CommandState,
    pub detail: String,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}

/// Shared command history rendered by the console.
pub type CommandLog = Arc<RwLock<Vec<CommandRecord>>>;

/// Wait out the artificial delay, then draw success or failure.
pub async fn simulate_uplink<R: Rng>(
    rng: &mut R,
    delay: Duration,
    failure_rate: f64,
    asset_name: &str,
) -> Result<(), UplinkError> {
    tokio::time::sleep(delay).await;
    if rng.gen_bool(failure_rate) {
        Err(UplinkError::NoAck(asset_name.to_string()))
    } else {
        Ok(())
    }
}

/// Dispatch a command in the background and update its record when the
/// simulated uplink settles. Cancelling the task mid-flight only leaves
/// the record in `Dispatched`; no other state depends on its completion.
pub fn dispatch_command(
    state: Arc<RwLock<FleetState>>,
    log: CommandLog,
    asset_name: String,
    op_type: OperationType,
) -> String {
    let command_id = Uuid::new_v4().to_string();
    let record = CommandRecord {
        command_id: command_id.clone(),
        asset_name: asset_name.clone(),
        op_type,
        state: CommandState::Dispatched,
        detail: String::new(),
        issued_at: chrono::Utc::now(),
    };

    let task_id = command_id.clone();
    tokio::spawn(async move {
        {
            let mut log = log.write().await;
            log.push(record);
            // Keep the command history short.
            if log.len() > 100 {
                log.remove(0);
            }
        }

        let mut rng = StdRng::from_entropy();
        let outcome =
            simulate_uplink(&mut rng, UPLINK_DELAY, UPLINK_FAILURE_RATE, &asset_name).await;

        let (new_state, detail) = match outcome {
            Ok(()) => (CommandState::Succeeded, "acknowledged".to_string()),
            Err(e) => {
                tracing::warn!(asset = %asset_name, error = %e, "Uplink failed");
                (CommandState::Failed, e.to_string())
            }
        };

        {
            let mut log = log.write().await;
            if let Some(record) = log.iter_mut().find(|r| r.command_id == task_id) {
                record.state = new_state;
                record.detail = detail.clone();
            }
        }

        let mut state = state.write().await;
        match new_state {
            CommandState::Failed => state.push_log(
                LogCategory::Error,
                format!("{} {} failed: {}", asset_name, op_type, detail),
            ),
            _ => state.push_log(
                LogCategory::Command,
                format!("{} {} {}", asset_name, op_type, detail),
            ),
        }
    });

    command_id
}
