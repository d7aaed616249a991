//! Map command - generate a board and print it
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_spec(), report()
//! - Level 3: compute_stats()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use hexrealm_core::{terrain, GameConfig, HexGrid, MapSpec};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MapArgs {
    /// Board width in hexes (even rows)
    #[arg(long)]
    pub width: Option<i32>,

    /// Board height in rows
    #[arg(long)]
    pub height: Option<i32>,

    /// Number of continents
    #[arg(long)]
    pub continents: Option<i32>,

    /// Minimum stop roll for continent growth
    #[arg(long)]
    pub min_width: Option<i32>,

    /// Maximum stop roll for continent growth (exclusive)
    #[arg(long)]
    pub max_width: Option<i32>,

    /// Output stats and rows as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, Serialize)]
struct MapStats {
    seed: u64,
    width: i32,
    height: i32,
    hexes: usize,
    land: usize,
    land_fraction: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: MapArgs, config: GameConfig) -> Result<()> {
    let spec = build_spec(&args, &config.map);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let grid = terrain::generate(&spec, &mut rng)?;
    let stats = compute_stats(&grid, config.seed);

    tracing::info!(
        "Generated {}x{} board: {} of {} hexes are land",
        stats.width,
        stats.height,
        stats.land,
        stats.hexes
    );

    report(&grid, &stats, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Command-line values override the config's map section
fn build_spec(args: &MapArgs, base: &MapSpec) -> MapSpec {
    MapSpec::new(
        args.width.unwrap_or(base.width),
        args.height.unwrap_or(base.height),
        args.continents.unwrap_or(base.num_continents),
        args.min_width.unwrap_or(base.min_continent_width),
        args.max_width.unwrap_or(base.max_continent_width),
    )
}

fn report(grid: &HexGrid, stats: &MapStats, json: bool) -> Result<()> {
    if json {
        print_json(grid, stats)
    } else {
        print_text(grid, stats);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn compute_stats(grid: &HexGrid, seed: u64) -> MapStats {
    let hexes = grid.hex_count();
    let land = grid.land_count();
    MapStats {
        seed,
        width: grid.width(),
        height: grid.height(),
        hexes,
        land,
        land_fraction: if hexes > 0 { land as f32 / hexes as f32 } else { 0.0 },
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_json(grid: &HexGrid, stats: &MapStats) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        #[serde(flatten)]
        stats: &'a MapStats,
        rows: Vec<String>,
    }

    let rendered = grid.render_ascii(|_| None);
    let output = JsonOutput {
        stats,
        rows: rendered.lines().map(str::to_string).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(grid: &HexGrid, stats: &MapStats) {
    print!("{}", grid.render_ascii(|_| None));
    println!();
    println!("Seed:  {}", stats.seed);
    println!(
        "Land:  {} / {} ({:.1}%)",
        stats.land,
        stats.hexes,
        stats.land_fraction * 100.0
    );
}
