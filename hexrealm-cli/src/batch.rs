//! Batch command - many seeded AI-only games in parallel
//!
//! Game `i` uses seed `base + i`, so any single game can be replayed with
//! `hexrealm simulate --seed <base + i> --humans 0`.

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;

use hexrealm_core::{GameConfig, NullUi, TurnController};

use crate::simulate::{play_game, GameStats};

#[derive(Args)]
pub struct BatchArgs {
    /// Number of games
    #[arg(long, default_value = "32")]
    pub games: usize,

    /// Turns per game
    #[arg(long, default_value = "100")]
    pub turns: usize,

    /// Players per game (all AI)
    #[arg(long)]
    pub players: Option<usize>,

    /// AI policy: random, first or frontier
    #[arg(long)]
    pub policy: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One finished game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    seed: u64,
    land: usize,
    stats: GameStats,
    /// Mean share of the board each player has discovered
    explored: f32,
}

#[derive(Clone, Debug, Default, Serialize)]
struct BatchSummary {
    games: usize,
    avg_land: f32,
    avg_moves: f32,
    avg_structures: f32,
    avg_meetings: f32,
    avg_auto_passes: f32,
    avg_explored: f32,
    /// Games in which every pair of players met
    full_contact_games: usize,
}

pub fn run(args: BatchArgs, mut config: GameConfig) -> Result<()> {
    if let Some(players) = args.players {
        config.players = players;
    }
    if let Some(policy) = &args.policy {
        config.ai_policy = policy.clone();
    }
    config.human_players = 0;
    config.validate()?;

    tracing::info!(
        "Running {} games of {} turns ({} players, {} policy, base seed {})",
        args.games,
        args.turns,
        config.players,
        config.ai_policy,
        config.seed
    );

    let records = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed.wrapping_add(i as u64);
            play_one(&config, seed, args.turns)
        })
        .collect::<Result<Vec<_>>>()?;

    let summary = summarize(&records, config.players);

    if args.json {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            summary: &'a BatchSummary,
            games: &'a [GameRecord],
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOutput {
                summary: &summary,
                games: &records,
            })?
        );
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn play_one(base: &GameConfig, seed: u64, turns: usize) -> Result<GameRecord> {
    let config = base.clone().with_seed(seed);
    let mut game = TurnController::from_config(&config, NullUi)?;
    let stats = play_game(&mut game, turns, seed)?;

    let hexes = game.grid().hex_count().max(1) as f32;
    let players = game.players();
    let explored = players
        .iter()
        .map(|p| p.vision.discovered().len() as f32 / hexes)
        .sum::<f32>()
        / players.len().max(1) as f32;

    tracing::debug!("Seed {}: {} moves, {} meetings", seed, stats.moves, stats.meetings);

    Ok(GameRecord {
        seed,
        land: game.grid().land_count(),
        stats,
        explored,
    })
}

fn summarize(records: &[GameRecord], players: usize) -> BatchSummary {
    if records.is_empty() {
        return BatchSummary::default();
    }

    let n = records.len() as f32;
    let avg = |f: &dyn Fn(&GameRecord) -> f32| records.iter().map(f).sum::<f32>() / n;
    let pairs = players * players.saturating_sub(1) / 2;

    BatchSummary {
        games: records.len(),
        avg_land: avg(&|r| r.land as f32),
        avg_moves: avg(&|r| r.stats.moves as f32),
        avg_structures: avg(&|r| r.stats.structures as f32),
        avg_meetings: avg(&|r| r.stats.meetings as f32),
        avg_auto_passes: avg(&|r| r.stats.auto_passes as f32),
        avg_explored: avg(&|r| r.explored),
        full_contact_games: records.iter().filter(|r| r.stats.meetings >= pairs).count(),
    }
}

fn print_summary(summary: &BatchSummary) {
    println!("\n=== Batch Results ===");
    println!("Games:            {}", summary.games);
    println!("Avg land hexes:   {:.1}", summary.avg_land);
    println!("Avg moves:        {:.1}", summary.avg_moves);
    println!("Avg structures:   {:.1}", summary.avg_structures);
    println!("Avg meetings:     {:.2}", summary.avg_meetings);
    println!("Avg auto-passes:  {:.1}", summary.avg_auto_passes);
    println!("Avg explored:     {:.1}%", summary.avg_explored * 100.0);
    println!("Full contact:     {}", summary.full_contact_games);
}
