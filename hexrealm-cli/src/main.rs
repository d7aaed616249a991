//! HEXREALM CLI - Command-line interface
//!
//! Commands:
//! - map: Generate a board and print it
//! - simulate: Play one headless game and report what happened
//! - batch: Play many seeded AI-only games in parallel

mod batch;
mod map_cmd;
mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hexrealm_core::GameConfig;

#[derive(Parser)]
#[command(name = "hexrealm")]
#[command(about = "HEXREALM turn-based exploration simulator", version)]
struct Cli {
    /// Random seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Game config JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a board and print it
    Map(map_cmd::MapArgs),
    /// Play one game headless
    Simulate(simulate::SimulateArgs),
    /// Play many AI-only games in parallel
    Batch(batch::BatchArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Map(args) => map_cmd::run(args, config),
        Commands::Simulate(args) => simulate::run(args, config),
        Commands::Batch(args) => batch::run(args, config),
    }
}

/// Config file (or defaults), with the seed override applied.
/// Without either a seed is drawn at random and logged.
fn load_config(path: Option<&std::path::Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(p) => GameConfig::load(p)
            .with_context(|| format!("Failed to load config: {}", p.display()))?,
        None => GameConfig::default().with_seed(rand::random()),
    };

    if let Some(s) = seed {
        config.seed = s;
    }
    tracing::debug!("Using seed {}", config.seed);
    Ok(config)
}
