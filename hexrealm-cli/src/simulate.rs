//! Simulate command - play one headless game
//!
//! Human seats are driven by a scripted clicker so the whole turn machine,
//! input validation included, gets exercised without a display.
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_game(), report_results()
//! - Level 3: drive_human(), GameStats::record()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use hexrealm_core::{
    Controller, GameConfig, GameEvent, Notice, Phase, Player, PlayerId, TokenKind,
    TurnController, TurnProgress, UiPort,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of turns to play (one turn = one player's go)
    #[arg(long, default_value = "40")]
    pub turns: usize,

    /// Total players
    #[arg(long)]
    pub players: Option<usize>,

    /// How many of them are (scripted) humans
    #[arg(long)]
    pub humans: Option<usize>,

    /// AI policy: random, first or frontier
    #[arg(long)]
    pub policy: Option<String>,

    /// Print the final board with tokens
    #[arg(long)]
    pub show_map: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Terminal stand-in for the game's dialogs
#[derive(Default)]
pub struct LogUi {
    pub greetings: usize,
    pub notices: usize,
}

impl UiPort for LogUi {
    fn show_greeting(&mut self, stranger: &Player) {
        self.greetings += 1;
        tracing::info!("Greetings from {} ({})", stranger.name, stranger.id());
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notices += 1;
        match notice {
            Notice::InsufficientEnergy { required, available } => {
                tracing::info!("Not enough energy: need {}, have {}", required, available)
            }
        }
    }
}

/// Tallies over a game's event log
#[derive(Clone, Debug, Default, Serialize)]
pub struct GameStats {
    pub turns: u64,
    pub moves: usize,
    pub structures: usize,
    pub evictions: usize,
    pub meetings: usize,
    pub auto_passes: usize,
    pub rejections: usize,
    pub energy_spent: i64,
}

impl GameStats {
    pub fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::TurnEnded { .. } => self.turns += 1,
                GameEvent::Moved { cost, .. } => {
                    self.moves += 1;
                    self.energy_spent += *cost as i64;
                }
                GameEvent::StructurePlaced { .. } => {
                    self.structures += 1;
                    self.energy_spent += hexrealm_core::PLACEMENT_COST as i64;
                }
                GameEvent::TokenEvicted { .. } => self.evictions += 1,
                GameEvent::PlayersMet { .. } => self.meetings += 1,
                GameEvent::AutoPassed { .. } => self.auto_passes += 1,
                GameEvent::ActionRejected { .. } => self.rejections += 1,
                GameEvent::TurnStarted { .. } | GameEvent::TokenDestroyed { .. } => {}
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct PlayerSummary {
    name: String,
    human: bool,
    discovered: usize,
    met: usize,
    tokens: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: SimulateArgs, config: GameConfig) -> Result<()> {
    let config = build_config(&args, config);

    tracing::info!(
        "Simulating {} turns: {} players ({} human), seed {}",
        args.turns,
        config.players,
        config.human_players,
        config.seed
    );

    let mut game = TurnController::from_config(&config, LogUi::default())?;
    let stats = play_game(&mut game, args.turns, config.seed)?;

    report_results(&game, &stats, &args);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &SimulateArgs, mut config: GameConfig) -> GameConfig {
    if let Some(players) = args.players {
        config.players = players;
    }
    if let Some(humans) = args.humans {
        config.human_players = humans;
    }
    config.human_players = config.human_players.min(config.players);
    if let Some(policy) = &args.policy {
        config.ai_policy = policy.clone();
    }
    config
}

/// Play `turns` turns, clicking for humans with a second seeded stream
pub fn play_game<U: UiPort>(
    game: &mut TurnController<U>,
    turns: usize,
    seed: u64,
) -> Result<GameStats> {
    let mut clicker = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut stats = GameStats::default();

    for _ in 0..turns {
        if let TurnProgress::AwaitingInput(player) = game.play_turn()? {
            drive_human(game, player, &mut clicker)?;
        }
        stats.record(&game.drain_events());
    }

    Ok(stats)
}

fn report_results(game: &TurnController<LogUi>, stats: &GameStats, args: &SimulateArgs) {
    let players: Vec<PlayerSummary> = game
        .players()
        .iter()
        .map(|p| PlayerSummary {
            name: p.name.clone(),
            human: p.controller == Controller::Human,
            discovered: p.vision.discovered().len(),
            met: p.met_players().count(),
            tokens: p.tokens().len(),
        })
        .collect();

    if args.json {
        print_json_results(stats, &players, game.ui());
    } else {
        print_text_results(stats, &players, game.ui());
    }

    if args.show_map {
        println!();
        print!("{}", render_with_tokens(game));
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Click random legal hexes until the turn is over. Now and then the
/// clicker switches to placing structures; a declined click ends the turn.
fn drive_human<U: UiPort>(
    game: &mut TurnController<U>,
    player: PlayerId,
    clicker: &mut ChaCha8Rng,
) -> Result<()> {
    while game.phase() == Phase::AwaitInput && game.active_player() == player {
        let options = game.reachable().as_slice();
        if options.is_empty() {
            game.pass_turn()?;
            break;
        }
        let target = options[clicker.gen_range(0..options.len())];

        if clicker.gen_bool(0.25) {
            game.toggle_interaction_mode(player)?;
        }

        let outcome = game.validate_and_make_move(target.row, target.col)?;
        if outcome.is_rejected() {
            game.pass_turn()?;
            break;
        }
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Board picture with player digits on units and `#` on structures
fn render_with_tokens<U: UiPort>(game: &TurnController<U>) -> String {
    game.grid().render_ascii(|hex| {
        let token = game.tokens().get(hex.occupant()?).ok()?;
        match token.kind {
            TokenKind::Structure => Some('#'),
            TokenKind::Unit { .. } => {
                let owner = token.owner?;
                char::from_digit((owner.0 % 10) as u32, 10)
            }
        }
    })
}

fn print_json_results(stats: &GameStats, players: &[PlayerSummary], ui: &LogUi) {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        stats: &'a GameStats,
        greetings: usize,
        notices: usize,
        players: &'a [PlayerSummary],
    }

    let output = JsonOutput {
        stats,
        greetings: ui.greetings,
        notices: ui.notices,
        players,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(stats: &GameStats, players: &[PlayerSummary], ui: &LogUi) {
    println!("\n=== Simulation Results ===");
    println!("Turns played:  {}", stats.turns);
    println!("Moves:         {}", stats.moves);
    println!("Structures:    {}", stats.structures);
    println!("Evictions:     {}", stats.evictions);
    println!("Meetings:      {}", stats.meetings);
    println!("Auto-passes:   {}", stats.auto_passes);
    println!("Rejections:    {}", stats.rejections);
    println!("Greetings:     {}", ui.greetings);

    println!("\n{:<12} {:>6} {:>11} {:>4} {:>7}", "Player", "Human", "Discovered", "Met", "Tokens");
    for p in players {
        println!(
            "{:<12} {:>6} {:>11} {:>4} {:>7}",
            p.name,
            if p.human { "yes" } else { "no" },
            p.discovered,
            p.met,
            p.tokens
        );
    }
}
