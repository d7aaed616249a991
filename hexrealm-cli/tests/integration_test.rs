//! Integration tests for the HEXREALM engine
//!
//! Tests the full stack: terrain, movement search, vision, diplomacy and
//! the turn state machine driven the way the CLI drives it

use hexrealm_core::{
    board::{Coord, HexGrid},
    game::{GameEvent, NullUi, Phase, TurnController, TurnProgress, UiPort},
    pieces::{PieceFactory, PieceKind, Token, TokenKind},
    player::{Controller, Player, PlayerId},
    reach::{min_cost, reachable_set, PathCost},
    terrain::{self, MapSpec},
    tile::{Color, TileType},
    visibility::Vision,
    FirstOptionPolicy, FrontierPolicy, GameConfig, Tokens,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Counts greetings by the id of the player being greeted
#[derive(Default)]
struct GreetingCounter {
    greeted: Vec<PlayerId>,
}

impl UiPort for GreetingCounter {
    fn show_greeting(&mut self, stranger: &Player) {
        self.greeted.push(stranger.id());
    }
}

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn mountains() -> TileType {
    TileType::land("Mountains", Color::new(120, 120, 120), 2.0, 6).unwrap()
}

fn count<F: Fn(&GameEvent) -> bool>(events: &[GameEvent], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

fn ai_config(seed: u64, players: usize) -> GameConfig {
    GameConfig::default().with_seed(seed).with_players(players, 0)
}

// ============================================================================
// END-TO-END SCENARIOS
// ============================================================================

#[test]
fn test_scenario_a_two_hex_board() {
    let spec = MapSpec::new(2, 1, 1, 0, 1);
    for seed in 0..10 {
        let grid = terrain::generate(&spec, &mut rng(seed)).unwrap();
        let seed_hex = Coord::new(0, 1);
        let other = Coord::new(0, 0);

        assert_eq!(*grid.get(seed_hex).unwrap().tile(), TileType::PLAINS);
        assert_eq!(*grid.get(other).unwrap().tile(), TileType::OCEAN);
        assert!(grid.adjacent(seed_hex).any(|c| c == other));
        assert!(grid.adjacent(other).any(|c| c == seed_hex));
    }
}

#[test]
fn test_scenario_b_fog_gates_reachability() {
    let mut grid = HexGrid::new(2, 1).unwrap();
    let plains = Coord::new(0, 0);
    let ocean = Coord::new(0, 1);
    grid.set_type(plains, TileType::PLAINS).unwrap();

    let seen = reachable_set(&grid, plains, 5, |_| true).unwrap();
    assert_eq!(seen.as_slice(), &[ocean]);

    let fogged = reachable_set(&grid, plains, 5, |c| c != ocean).unwrap();
    assert!(fogged.is_empty());
}

#[test]
fn test_scenario_c_first_contact() {
    let grid = HexGrid::new(10, 1).unwrap();
    let mut game = TurnController::new(grid, rng(1), GreetingCounter::default());
    let a = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
    let b = game.add_player(Controller::Human, Coord::new(0, 3)).unwrap();

    // three full rounds standing still: out of each other's sight
    for _ in 0..6 {
        assert!(matches!(game.play_turn().unwrap(), TurnProgress::AwaitingInput(_)));
        assert!(game.pass_turn().unwrap());
    }
    assert_eq!(count(game.events(), |e| matches!(e, GameEvent::PlayersMet { .. })), 0);
    assert!(game.ui().greeted.is_empty());

    // one step east puts b two hexes away
    assert_eq!(game.play_turn().unwrap(), TurnProgress::AwaitingInput(a));
    let outcome = game.validate_and_make_move(0, 1).unwrap();
    assert!(!outcome.is_rejected());

    assert_eq!(game.ui().greeted, vec![b]);
    assert!(game.player(a).unwrap().has_met(b));
    assert!(game.player(b).unwrap().has_met(a));

    // b sees a on its own turn; nothing new happens
    game.pass_turn().unwrap();
    assert_eq!(game.play_turn().unwrap(), TurnProgress::AwaitingInput(b));
    assert_eq!(count(game.events(), |e| matches!(e, GameEvent::PlayersMet { .. })), 1);
    assert_eq!(game.ui().greeted.len(), 1);
}

#[test]
fn test_ai_players_meet_silently() {
    let grid = HexGrid::new(10, 1).unwrap();
    let mut game = TurnController::new(grid, rng(2), GreetingCounter::default())
        .with_policy(Box::new(FirstOptionPolicy));
    game.add_player(Controller::Ai, Coord::new(0, 0)).unwrap();
    game.add_player(Controller::Ai, Coord::new(0, 2)).unwrap();

    game.play_turn().unwrap();
    assert_eq!(count(game.events(), |e| matches!(e, GameEvent::PlayersMet { .. })), 1);
    assert!(game.ui().greeted.is_empty());
}

#[test]
fn test_scenario_d_no_moves_auto_passes() {
    let grid = HexGrid::filled(2, 1, mountains()).unwrap();
    let mut game = TurnController::new(grid, rng(3), NullUi);
    let p = game.add_player(Controller::Ai, Coord::new(0, 0)).unwrap();

    assert_eq!(game.play_turn().unwrap(), TurnProgress::Completed(p));
    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::TurnStarted { player: p, turn: 0 },
            GameEvent::AutoPassed { player: p },
            GameEvent::TurnEnded { player: p },
        ]
    );
}

#[test]
fn test_human_without_moves_is_not_asked() {
    let grid = HexGrid::filled(2, 1, mountains()).unwrap();
    let mut game = TurnController::new(grid, rng(3), NullUi);
    let p = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();

    assert_eq!(game.play_turn().unwrap(), TurnProgress::Completed(p));
    assert_eq!(game.phase(), Phase::TurnStart);
}

#[test]
fn test_evicted_unit_is_auto_passed() {
    let grid = HexGrid::new(10, 1).unwrap();
    let mut game = TurnController::new(grid, rng(4), NullUi);
    let a = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
    let b = game.add_player(Controller::Human, Coord::new(0, 1)).unwrap();
    let a_piece = game.player(a).unwrap().main_piece().unwrap();
    let b_piece = game.player(b).unwrap().main_piece().unwrap();

    assert_eq!(game.play_turn().unwrap(), TurnProgress::AwaitingInput(a));
    assert!(game.reachable().contains(Coord::new(0, 1)));
    let outcome = game.validate_and_make_move(0, 1).unwrap();
    assert!(!outcome.is_rejected());

    assert!(game.events().contains(&GameEvent::TokenEvicted {
        token: b_piece,
        from: Coord::new(0, 1),
    }));
    assert_eq!(game.token(b_piece).unwrap().hex, None);
    assert_eq!(game.token(a_piece).unwrap().hex, Some(Coord::new(0, 1)));
    assert_eq!(game.grid().get(Coord::new(0, 1)).unwrap().occupant(), Some(a_piece));

    assert!(game.pass_turn().unwrap());
    game.drain_events();

    // b still owns the piece but it is off the board, so b never gets asked
    assert_eq!(game.play_turn().unwrap(), TurnProgress::Completed(b));
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::AutoPassed { player: b }));
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Moved { .. })), 0);
    assert_eq!(game.player(b).unwrap().main_piece(), Some(b_piece));
    assert_eq!(game.token(b_piece).unwrap().hex, None);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_adjacency_is_symmetric() {
    for (w, h) in [(2, 1), (3, 4), (7, 7), (12, 5)] {
        let grid = HexGrid::new(w, h).unwrap();
        for hex in grid.hexes() {
            let c = hex.coord();
            for n in grid.adjacent(c) {
                assert!(grid.adjacent(n).any(|back| back == c), "{c} -> {n} is one-way on {w}x{h}");
            }
        }
    }
}

#[test]
fn test_continent_seeds_are_land() {
    let specs = [
        MapSpec::default(),
        MapSpec::new(9, 4, 4, 0, 2),
        MapSpec::new(40, 25, 6, 2, 9),
    ];
    for spec in &specs {
        for seed in 0..20 {
            let grid = terrain::generate(spec, &mut rng(seed)).unwrap();
            for c in spec.continent_seeds() {
                assert!(grid.get(c).unwrap().is_land(), "seed hex {c} is ocean (seed {seed})");
            }
        }
    }
}

#[test]
fn test_reachable_hexes_are_affordable() {
    let spec = MapSpec::new(16, 12, 3, 1, 5);
    for seed in 0..8 {
        let grid = terrain::generate(&spec, &mut rng(seed)).unwrap();
        let origin = Coord::new(6, 5);

        let mut vision = Vision::new();
        vision
            .reveal(PlayerId(0), &grid, &Tokens::new(), origin, 3)
            .unwrap();
        let filter = |c: Coord| vision.has_discovered(c);

        for energy in [0, 2, 5, 9] {
            let set = reachable_set(&grid, origin, energy, filter).unwrap();
            assert!(!set.contains(origin));
            for dest in set.iter() {
                match min_cost(&grid, origin, dest, filter).unwrap() {
                    PathCost::Reachable(cost) => assert!(cost <= energy),
                    PathCost::Unreachable => panic!("{dest} offered but unreachable"),
                }
            }
        }
    }
}

#[test]
fn test_reset_seen_keeps_discoveries() {
    let config = ai_config(5, 3);
    let mut game = TurnController::from_config(&config, NullUi).unwrap();
    game.run_until_input(9).unwrap();

    for player in game.players() {
        let mut vision = player.vision.clone();
        assert!(vision.seen().is_subset(vision.discovered()));
        let before = vision.discovered().clone();
        vision.reset_seen();
        assert!(vision.seen().is_empty());
        assert_eq!(vision.discovered(), &before);
    }
}

#[test]
fn test_contact_is_symmetric_after_long_game() {
    let mut config = ai_config(8, 4);
    config.map = MapSpec::new(12, 6, 2, 1, 4);
    let mut game = TurnController::from_config(&config, NullUi).unwrap();
    game.run_until_input(200).unwrap();

    let players = game.players();
    for a in players {
        for b in players {
            assert_eq!(a.has_met(b.id()), b.has_met(a.id()));
        }
    }
    let met = count(game.events(), |e| matches!(e, GameEvent::PlayersMet { .. }));
    let pairs = players.iter().map(|p| p.met_players().count()).sum::<usize>() / 2;
    assert_eq!(met, pairs);
}

#[test]
fn test_energy_never_negative() {
    for seed in 0..6 {
        let config = ai_config(seed, 4);
        let mut game = TurnController::from_config(&config, NullUi).unwrap();

        for _ in 0..3000 {
            game.step().unwrap();
            for (id, token) in game.tokens().iter() {
                if let Some(energy) = token.remaining_energy() {
                    assert!(energy >= 0, "{id} has {energy} energy (seed {seed})");
                }
            }
        }
    }
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_same_seed_same_game() {
    let config = ai_config(77, 3);
    let run = || {
        let mut game = TurnController::from_config(&config, NullUi).unwrap();
        game.run_until_input(60).unwrap();
        game.drain_events()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_ai_only_game_never_waits() {
    let config = ai_config(4, 3);
    let mut game = TurnController::from_config(&config, NullUi).unwrap();
    assert_eq!(game.run_until_input(90).unwrap(), None);
    assert_eq!(game.turn(), 90);
    assert_eq!(
        count(game.events(), |e| matches!(e, GameEvent::TurnEnded { .. })),
        90
    );
}

#[test]
fn test_human_seat_waits_for_input() {
    let config = GameConfig::default().with_seed(6).with_players(3, 1);
    let mut game = TurnController::from_config(&config, NullUi).unwrap();
    assert_eq!(game.run_until_input(10).unwrap(), Some(PlayerId(0)));
    assert_eq!(game.phase(), Phase::AwaitInput);
    assert!(!game.reachable().is_empty());
}

#[test]
fn test_frontier_explores_more_than_standing_still() {
    let mut config = ai_config(10, 2);
    config.ai_policy = "frontier".to_string();
    let mut game = TurnController::from_config(&config, NullUi).unwrap();
    let start = game.player(PlayerId(0)).unwrap().vision.discovered().len();
    game.run_until_input(20).unwrap();
    assert!(game.player(PlayerId(0)).unwrap().vision.discovered().len() > start);

    // explicit policy object works the same way
    let grid = HexGrid::new(8, 5).unwrap();
    let mut game = TurnController::new(grid, rng(10), NullUi).with_policy(Box::new(FrontierPolicy));
    game.add_player(Controller::Ai, Coord::new(2, 3)).unwrap();
    assert_eq!(game.run_until_input(4).unwrap(), None);
}

#[test]
fn test_unknown_policy_is_rejected() {
    let mut config = ai_config(1, 2);
    config.ai_policy = "minimax".to_string();
    assert!(TurnController::from_config(&config, NullUi).is_err());
}

/// Units with twice the usual energy
struct Marathon;

impl PieceFactory for Marathon {
    fn make(&mut self, kind: PieceKind) -> Token {
        match kind {
            PieceKind::Unit => {
                let mut unit = Token::unit();
                unit.kind = TokenKind::Unit {
                    remaining_energy: 10,
                    max_energy: 10,
                };
                unit
            }
            PieceKind::Structure => Token::structure(),
        }
    }
}

#[test]
fn test_custom_factory_changes_reach() {
    let grid = HexGrid::new(12, 1).unwrap();
    let mut game = TurnController::new(grid, rng(0), NullUi).with_factory(Box::new(Marathon));
    let p = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
    game.play_turn().unwrap();

    assert_eq!(game.remaining_energy(p).unwrap(), Some(10));
    // only the sight radius is discovered, so fog still caps the reach
    assert_eq!(game.reachable().as_slice(), &[Coord::new(0, 1), Coord::new(0, 2)]);
    game.validate_and_make_move(0, 2).unwrap();
    assert!(game.reachable().contains(Coord::new(0, 4)));
}
