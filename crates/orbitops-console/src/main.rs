//! OrbitOps console binary.

mod commands;
mod config;
mod console;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use orbitops_sim::{export_snapshot, generate_fleet, write_snapshot, FleetSnapshot, FleetState};

use crate::config::ConsoleConfig;

#[derive(Parser)]
#[command(name = "orbitops-console", about = "Operations console for a simulated constellation fleet", version)]
struct Cli {
    /// Path to a TOML config file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive console (default).
    Run,
    /// Generate one fleet pass and write a JSON snapshot.
    Export {
        /// Explicit output file; defaults to a date-stamped name in the
        /// current directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    PrintConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr so the TUI owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => console::run_console(config).await,
        Command::Export { output } => export_once(&config, output),
        Command::PrintConfig => {
            let toml = toml::to_string_pretty(&config)?;
            println!("{toml}");
            Ok(())
        }
    }
}

/// One-shot export: generate a fleet pass, scan it, write the snapshot.
fn export_once(config: &ConsoleConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let mut state = FleetState::new(config.console.log_capacity);
    let mut rng = StdRng::from_entropy();
    state.replace_assets(generate_fleet(&mut rng, config.fleet.asset_count));
    state.rescan();

    let path = match output {
        Some(path) => {
            let snapshot = FleetSnapshot::capture(&state);
            write_snapshot(&snapshot, &path)?;
            path
        }
        None => export_snapshot(&state, std::path::Path::new("."))?,
    };

    println!(
        "Exported {} assets ({} conflicts) to {}",
        state.assets.len(),
        state.conflicts.len(),
        path.display()
    );
    Ok(())
}
