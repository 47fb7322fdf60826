//! Interval sampler: the repeating timer that drives the fleet simulation.
//!
//! One tokio task owns the timer. Pausing skips future ticks without
//! tearing the task down; stopping signals shutdown over a watch channel
//! and awaits the task, so the timer is never leaked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

use orbitops_protocol::{DEFAULT_ASSET_COUNT, DEFAULT_TICK_INTERVAL_MS};

use crate::generator::{generate_fleet, random_walk};
use crate::state::{FleetState, LogCategory};

/// What a tick does to the previous collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    /// Recreate every asset wholesale.
    Regenerate,
    /// Mutate telemetry in place with bounded random deltas.
    RandomWalk,
}

/// Sampler configuration.
#[derive(Debug, Clone)]
pub struct SamplerOptions {
    pub tick_interval: Duration,
    pub mode: SampleMode,
    pub asset_count: usize,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            mode: SampleMode::Regenerate,
            asset_count: DEFAULT_ASSET_COUNT,
            seed: None,
        }
    }
}

/// Handle to a running sampler task.
pub struct SamplerHandle {
    paused: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SamplerHandle {
    /// Stop future ticks. A tick already executing under the state lock
    /// runs to completion.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Signal shutdown and wait for the timer task to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.join.await;
    }
}

/// The interval sampler.
pub struct Sampler;

impl Sampler {
    /// Populate the fleet once, then spawn the timer task.
    ///
    /// The first timed tick fires one full period after spawn; the initial
    /// population below does not count as a tick.
    pub async fn spawn(
        state: Arc<RwLock<FleetState>>,
        options: SamplerOptions,
        start_paused: bool,
    ) -> SamplerHandle {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        {
            let mut state = state.write().await;
            let assets = generate_fleet(&mut rng, options.asset_count);
            state.replace_assets(assets);
            state.rescan();
            let conflicts = state.conflicts.len();
            state.push_log(
                LogCategory::System,
                format!(
                    "Sampler started ({} assets, {:?} every {}ms)",
                    options.asset_count,
                    options.mode,
                    options.tick_interval.as_millis()
                ),
            );
            tracing::info!(
                assets = options.asset_count,
                conflicts,
                "Initial fleet populated"
            );
        }

        let paused = Arc::new(AtomicBool::new(start_paused));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task_paused = paused.clone();
        // Anchor the first tick one full period after spawn.
        let start = tokio::time::Instant::now() + options.tick_interval;
        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, options.tick_interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if task_paused.load(Ordering::SeqCst) {
                            tracing::trace!("Sampler tick skipped (paused)");
                            continue;
                        }
                        Self::tick(&state, &mut rng, &options).await;
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::debug!("Sampler shutting down");
                        break;
                    }
                }
            }
        });

        SamplerHandle {
            paused,
            shutdown_tx,
            join,
        }
    }

    async fn tick(state: &Arc<RwLock<FleetState>>, rng: &mut StdRng, options: &SamplerOptions) {
        let mut state = state.write().await;
        match options.mode {
            SampleMode::Regenerate => {
                let assets = generate_fleet(rng, options.asset_count);
                state.replace_assets(assets);
            }
            SampleMode::RandomWalk => {
                random_walk(rng, &mut state.assets);
            }
        }
        state.rescan();
        state.tick_count += 1;

        let conflicts = state.conflicts.len();
        tracing::debug!(tick = state.tick_count, conflicts, "Fleet tick");
        if conflicts > 0 {
            let summary: Vec<&str> = state.conflicts.iter().map(|c| c.id()).collect();
            let message = format!("{} active conflicts: {}", conflicts, summary.join(", "));
            tracing::info!(%message);
            state.push_log(LogCategory::Conflict, message);
        }
    }
}
