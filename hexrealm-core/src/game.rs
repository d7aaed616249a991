//! Turn sequencing and action validation
//!
//! The controller owns the board, the tokens and the players, and is the
//! only thing that mutates them. Each turn runs
//!
//! ```text
//! TurnStart -> ComputeVisibility -> ComputeReachableMoves
//!     -> AwaitInput (human) | AiActs (AI) -> ApplyAction
//!     -> ComputeReachableMoves (energy left) | TurnEnd -> TurnStart (next)
//! ```
//!
//! There is no terminal state. Human turns park in `AwaitInput` until
//! [`TurnController::validate_and_make_move`] or
//! [`TurnController::pass_turn`] is called; AI turns run to completion
//! inside [`TurnController::play_turn`].

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::{policy_by_name, AiPolicy, PolicyView, RandomPolicy};
use crate::board::{Coord, HexGrid};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::pieces::{PieceFactory, PieceKind, StandardFactory, Token, TokenId, Tokens};
use crate::player::{self, Controller, InteractionMode, Player, PlayerId};
use crate::reach::{self, PathCost, ReachableSet};
use crate::terrain;
use crate::tile::Color;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Energy spent to put a structure down
pub const PLACEMENT_COST: i32 = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// State machine phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    TurnStart,
    ComputeVisibility,
    ComputeReachableMoves,
    AwaitInput,
    AiActs,
    ApplyAction(Coord),
    TurnEnd,
}

/// Why an action was declined. Declined actions change nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotAwaitingInput,
    NoActivePiece,
    OutOfBounds(Coord),
    NotReachable(Coord),
    InsufficientEnergy { required: i32, available: i32 },
}

/// Result of a submitted action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Moved {
        token: TokenId,
        from: Coord,
        to: Coord,
        cost: i32,
    },
    Placed {
        token: TokenId,
        at: Coord,
    },
    Rejected(Rejection),
}

impl ActionOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ActionOutcome::Rejected(_))
    }
}

/// Everything that happened, in order. Drained by rendering adapters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    TurnStarted {
        player: PlayerId,
        turn: u64,
    },
    AutoPassed {
        player: PlayerId,
    },
    Moved {
        player: PlayerId,
        token: TokenId,
        from: Coord,
        to: Coord,
        cost: i32,
    },
    StructurePlaced {
        player: PlayerId,
        token: TokenId,
        at: Coord,
    },
    TokenEvicted {
        token: TokenId,
        from: Coord,
    },
    ActionRejected {
        player: PlayerId,
        rejection: Rejection,
    },
    PlayersMet {
        a: PlayerId,
        b: PlayerId,
    },
    TokenDestroyed {
        token: TokenId,
        owner: Option<PlayerId>,
    },
    TurnEnded {
        player: PlayerId,
    },
}

/// User-facing notices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    InsufficientEnergy { required: i32, available: i32 },
}

/// Hooks into whatever presents the game to a human
pub trait UiPort {
    /// A human player just met `stranger`
    fn show_greeting(&mut self, _stranger: &Player) {}

    fn show_notice(&mut self, _notice: Notice) {}

    /// The info panel was opened or closed
    fn show_panel(&mut self, _visible: bool) {}
}

/// Headless UI
#[derive(Clone, Copy, Debug, Default)]
pub struct NullUi;

impl UiPort for NullUi {}

/// Where [`TurnController::play_turn`] stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnProgress {
    AwaitingInput(PlayerId),
    Completed(PlayerId),
}

// ============================================================================
// TURN CONTROLLER
// ============================================================================

pub struct TurnController<U: UiPort = NullUi> {
    grid: HexGrid,
    tokens: Tokens,
    players: Vec<Player>,
    turn_index: usize,
    turn: u64,
    phase: Phase,
    reachable: ReachableSet,
    rng: ChaCha8Rng,
    policy: Box<dyn AiPolicy + Send>,
    factory: Box<dyn PieceFactory + Send>,
    ui: U,
    events: Vec<GameEvent>,
    started: bool,
    panel_visible: bool,
}

impl<U: UiPort> TurnController<U> {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty game on an existing board. Add players before the first step.
    pub fn new(grid: HexGrid, rng: ChaCha8Rng, ui: U) -> Self {
        Self {
            grid,
            tokens: Tokens::new(),
            players: Vec::new(),
            turn_index: 0,
            turn: 0,
            phase: Phase::TurnStart,
            reachable: ReachableSet::empty(),
            rng,
            policy: Box::new(RandomPolicy),
            factory: Box::new(StandardFactory),
            ui,
            events: Vec::new(),
            started: false,
            panel_visible: false,
        }
    }

    /// Generate a board and seat every player from `config`
    pub fn from_config(config: &GameConfig, ui: U) -> Result<Self, GameError> {
        config.validate()?;

        let policy = policy_by_name(&config.ai_policy)
            .ok_or_else(|| GameError::UnknownPolicy(config.ai_policy.clone()))?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = terrain::generate(&config.map, &mut rng)?;

        let mut game = Self::new(grid, rng, ui).with_policy(policy);

        let spacing = config.map.width / (config.players as i32 + 1);
        let row = config.map.height / 2;
        for i in 0..config.players {
            let controller = if i < config.human_players {
                Controller::Human
            } else {
                Controller::Ai
            };
            let col = (i as i32 * spacing).min(game.grid.row_len(row) - 1);
            game.add_player(controller, Coord::new(row, col))?;
        }

        tracing::info!(
            "New game: {}x{} board, {} players ({} human), seed {}",
            config.map.width,
            config.map.height,
            config.players,
            config.human_players,
            config.seed
        );

        Ok(game)
    }

    pub fn with_policy(mut self, policy: Box<dyn AiPolicy + Send>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_factory(mut self, factory: Box<dyn PieceFactory + Send>) -> Self {
        self.factory = factory;
        self
    }

    /// Seat a new player with a fresh main unit on `start`
    pub fn add_player(&mut self, controller: Controller, start: Coord) -> Result<PlayerId, GameError> {
        if self.started {
            return Err(GameError::SetupClosed);
        }
        if self.grid.get(start)?.occupant().is_some() {
            return Err(GameError::Occupied(start));
        }

        let id = PlayerId(self.players.len());
        let color = Color::random(&mut self.rng);
        let mut player = Player::new(id, format!("Player {}", id.0 + 1), color, controller);

        let mut unit = self.factory.make(PieceKind::Unit);
        unit.owner = Some(id);
        let token = self.tokens.insert(unit);
        player.set_main_piece(token);
        self.tokens.place(&mut self.grid, token, start)?;

        tracing::debug!("{} ({:?}) starts at {}", id, controller, start);
        self.players.push(player);
        Ok(id)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> Result<&Token, GameError> {
        self.tokens.get(id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id.0).ok_or(GameError::UnknownPlayer(id))
    }

    pub fn active_player(&self) -> PlayerId {
        PlayerId(self.turn_index)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of turns that have ended so far
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Legal destinations for the active piece (empty outside a turn)
    pub fn reachable(&self) -> &ReachableSet {
        &self.reachable
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Energy left on a player's active piece
    pub fn remaining_energy(&self, id: PlayerId) -> Result<Option<i32>, GameError> {
        match self.player(id)?.active_piece() {
            Some(piece) => Ok(self.tokens.get(piece)?.remaining_energy()),
            None => Ok(None),
        }
    }

    // ========================================================================
    // DRIVING THE STATE MACHINE
    // ========================================================================

    /// Perform one transition and return the new phase
    pub fn step(&mut self) -> Result<Phase, GameError> {
        if self.players.is_empty() {
            return Err(GameError::InvalidPlayerCount(
                "no players have been added".to_string(),
            ));
        }
        self.started = true;

        let next = match self.phase {
            Phase::TurnStart => self.turn_start()?,
            Phase::ComputeVisibility => self.compute_visibility()?,
            Phase::ComputeReachableMoves => self.compute_reachable_moves()?,
            Phase::AwaitInput => Phase::AwaitInput,
            Phase::AiActs => self.ai_acts(),
            Phase::ApplyAction(dest) => self.apply_action(dest)?.1,
            Phase::TurnEnd => self.turn_end(),
        };

        self.phase = next;
        Ok(next)
    }

    /// Run until the active player needs input or their turn is over
    pub fn play_turn(&mut self) -> Result<TurnProgress, GameError> {
        let player = self.active_player();
        if self.phase == Phase::AwaitInput {
            return Ok(TurnProgress::AwaitingInput(player));
        }

        loop {
            match self.step()? {
                Phase::AwaitInput => return Ok(TurnProgress::AwaitingInput(player)),
                Phase::TurnStart => return Ok(TurnProgress::Completed(player)),
                _ => {}
            }
        }
    }

    /// Play up to `max_turns` turns, stopping early at a human's input
    pub fn run_until_input(&mut self, max_turns: usize) -> Result<Option<PlayerId>, GameError> {
        for _ in 0..max_turns {
            if let TurnProgress::AwaitingInput(player) = self.play_turn()? {
                return Ok(Some(player));
            }
        }
        Ok(None)
    }

    /// A human clicked `(row, col)`. Illegal targets are declined without
    /// touching any state.
    pub fn validate_and_make_move(&mut self, row: i32, col: i32) -> Result<ActionOutcome, GameError> {
        let player = self.active_player();
        if self.phase != Phase::AwaitInput {
            return Ok(self.reject(player, Rejection::NotAwaitingInput));
        }

        let (outcome, next) = self.apply_action(Coord::new(row, col))?;
        self.phase = next;
        if next != Phase::AwaitInput {
            self.play_turn()?;
        }
        Ok(outcome)
    }

    /// Human ends their turn early. Returns `false` outside `AwaitInput`.
    pub fn pass_turn(&mut self) -> Result<bool, GameError> {
        if self.phase != Phase::AwaitInput {
            return Ok(false);
        }
        self.phase = Phase::TurnEnd;
        self.step()?;
        Ok(true)
    }

    pub fn toggle_interaction_mode(&mut self, id: PlayerId) -> Result<InteractionMode, GameError> {
        let player = self
            .players
            .get_mut(id.0)
            .ok_or(GameError::UnknownPlayer(id))?;
        Ok(player.switch_interaction_mode())
    }

    /// Flip the info panel. Pure UI state, the simulation ignores it.
    pub fn toggle_panel(&mut self) -> bool {
        self.panel_visible = !self.panel_visible;
        self.ui.show_panel(self.panel_visible);
        self.panel_visible
    }

    /// Apply hit-point damage. Returns `true` if the token was destroyed.
    pub fn damage(&mut self, id: TokenId, amount: i32) -> Result<bool, GameError> {
        let token = self.tokens.get_mut(id)?;
        token.hit_points -= amount;
        if token.hit_points > 0 {
            return Ok(false);
        }

        let owner = token.owner;
        self.tokens.destroy(&mut self.grid, id)?;
        if let Some(player) = owner.and_then(|o| self.players.get_mut(o.0)) {
            player.remove_token(id);
        }
        tracing::info!("{} destroyed", id);
        self.events.push(GameEvent::TokenDestroyed { token: id, owner });

        // the waiting player's options may be gone with it
        if self.phase == Phase::AwaitInput && owner == Some(self.active_player()) {
            self.phase = Phase::ComputeReachableMoves;
            self.play_turn()?;
        }
        Ok(true)
    }

    // ========================================================================
    // PHASES
    // ========================================================================

    fn turn_start(&mut self) -> Result<Phase, GameError> {
        let id = self.active_player();
        tracing::debug!("Turn {} begins for {}", self.turn, id);
        self.events.push(GameEvent::TurnStarted {
            player: id,
            turn: self.turn,
        });

        for &token in self.players[id.0].tokens() {
            self.tokens.get_mut(token)?.start_turn();
        }
        Ok(Phase::ComputeVisibility)
    }

    fn compute_visibility(&mut self) -> Result<Phase, GameError> {
        let id = self.active_player();
        self.players[id.0].vision.reset_seen();

        let owned = self.players[id.0].tokens().to_vec();
        for token in owned {
            self.reveal_from(id, token)?;
        }
        Ok(Phase::ComputeReachableMoves)
    }

    fn compute_reachable_moves(&mut self) -> Result<Phase, GameError> {
        let id = self.active_player();
        let player = &self.players[id.0];
        let human = player.is_human();

        let mut reachable = ReachableSet::empty();
        if let Some(piece) = player.active_piece() {
            let token = self.tokens.get(piece)?;
            if let (Some(at), Some(energy)) = (token.hex, token.remaining_energy()) {
                let vision = &player.vision;
                reachable = reach::reachable_set(&self.grid, at, energy, |c| vision.has_discovered(c))?;
            }
        }
        self.reachable = reachable;

        if self.reachable.is_empty() {
            tracing::debug!("{} has no legal moves, passing", id);
            self.events.push(GameEvent::AutoPassed { player: id });
            return Ok(Phase::TurnEnd);
        }

        Ok(if human { Phase::AwaitInput } else { Phase::AiActs })
    }

    fn ai_acts(&mut self) -> Phase {
        let id = self.active_player();
        let view = PolicyView {
            grid: &self.grid,
            vision: &self.players[id.0].vision,
        };

        match self.policy.choose(self.reachable.as_slice(), view, &mut self.rng) {
            Some(dest) => Phase::ApplyAction(dest),
            None => {
                self.events.push(GameEvent::AutoPassed { player: id });
                Phase::TurnEnd
            }
        }
    }

    /// Validate and perform an action, returning its outcome and the phase
    /// to move to
    fn apply_action(&mut self, dest: Coord) -> Result<(ActionOutcome, Phase), GameError> {
        let id = self.active_player();
        let stay = if self.players[id.0].is_human() {
            Phase::AwaitInput
        } else {
            Phase::TurnEnd
        };

        if !self.grid.contains(dest) {
            return Ok((self.reject(id, Rejection::OutOfBounds(dest)), stay));
        }
        if !self.reachable.contains(dest) {
            return Ok((self.reject(id, Rejection::NotReachable(dest)), stay));
        }
        let Some(piece) = self.players[id.0].active_piece() else {
            return Ok((self.reject(id, Rejection::NoActivePiece), stay));
        };

        let outcome = match self.players[id.0].interaction_mode {
            InteractionMode::Move => self.move_piece(id, piece, dest)?,
            InteractionMode::Place => self.place_structure(id, piece, dest)?,
        };
        if outcome.is_rejected() {
            return Ok((outcome, stay));
        }

        let energy = self.tokens.get(piece)?.remaining_energy().unwrap_or(0);
        let next = match energy.cmp(&0) {
            std::cmp::Ordering::Less => {
                return Err(GameError::NegativeEnergy { player: id, energy });
            }
            std::cmp::Ordering::Equal => Phase::TurnEnd,
            std::cmp::Ordering::Greater => Phase::ComputeReachableMoves,
        };
        Ok((outcome, next))
    }

    fn turn_end(&mut self) -> Phase {
        let id = self.active_player();
        self.events.push(GameEvent::TurnEnded { player: id });

        self.turn_index = (self.turn_index + 1) % self.players.len();
        self.turn += 1;
        self.reachable = ReachableSet::empty();
        Phase::TurnStart
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn move_piece(&mut self, id: PlayerId, piece: TokenId, dest: Coord) -> Result<ActionOutcome, GameError> {
        let Some(from) = self.tokens.get(piece)?.hex else {
            return Ok(self.reject(id, Rejection::NoActivePiece));
        };

        let vision = &self.players[id.0].vision;
        let cost = match reach::min_cost(&self.grid, from, dest, |c| vision.has_discovered(c))? {
            PathCost::Reachable(cost) => cost,
            PathCost::Unreachable => return Err(GameError::NoPath { from, to: dest }),
        };

        self.tokens.get_mut(piece)?.spend_energy(cost);
        let evicted = self.tokens.place(&mut self.grid, piece, dest)?;
        if let Some(other) = evicted {
            self.events.push(GameEvent::TokenEvicted {
                token: other,
                from: dest,
            });
        }

        tracing::debug!("{} moved {} from {} to {} for {}", id, piece, from, dest, cost);
        self.events.push(GameEvent::Moved {
            player: id,
            token: piece,
            from,
            to: dest,
            cost,
        });

        self.reveal_from(id, piece)?;
        Ok(ActionOutcome::Moved {
            token: piece,
            from,
            to: dest,
            cost,
        })
    }

    fn place_structure(
        &mut self,
        id: PlayerId,
        piece: TokenId,
        dest: Coord,
    ) -> Result<ActionOutcome, GameError> {
        let available = self.tokens.get(piece)?.remaining_energy().unwrap_or(0);
        if available < PLACEMENT_COST {
            self.ui.show_notice(Notice::InsufficientEnergy {
                required: PLACEMENT_COST,
                available,
            });
            return Ok(self.reject(
                id,
                Rejection::InsufficientEnergy {
                    required: PLACEMENT_COST,
                    available,
                },
            ));
        }

        let mut structure = self.factory.make(PieceKind::Structure);
        structure.owner = Some(id);
        let token = self.tokens.insert(structure);
        self.players[id.0].add_token(token);

        let evicted = self.tokens.place(&mut self.grid, token, dest)?;
        if let Some(other) = evicted {
            self.events.push(GameEvent::TokenEvicted {
                token: other,
                from: dest,
            });
        }
        self.tokens.get_mut(piece)?.spend_energy(PLACEMENT_COST);

        tracing::debug!("{} placed {} at {}", id, token, dest);
        self.events.push(GameEvent::StructurePlaced {
            player: id,
            token,
            at: dest,
        });

        self.reveal_from(id, token)?;
        Ok(ActionOutcome::Placed { token, at: dest })
    }

    fn reject(&mut self, id: PlayerId, rejection: Rejection) -> ActionOutcome {
        tracing::warn!("Rejected action by {}: {:?}", id, rejection);
        self.events.push(GameEvent::ActionRejected {
            player: id,
            rejection,
        });
        ActionOutcome::Rejected(rejection)
    }

    // ========================================================================
    // VISION AND DIPLOMACY
    // ========================================================================

    /// Reveal around `token` for `viewer` and handle any contact it makes
    fn reveal_from(&mut self, viewer: PlayerId, token: TokenId) -> Result<(), GameError> {
        let token = self.tokens.get(token)?;
        let Some(at) = token.hex else {
            return Ok(());
        };
        let sight = token.sight;

        let sightings = self.players[viewer.0]
            .vision
            .reveal(viewer, &self.grid, &self.tokens, at, sight)?;

        for sighting in sightings {
            self.encounter(viewer, sighting.owner)?;
        }
        Ok(())
    }

    /// `active` spotted a token of `other`
    fn encounter(&mut self, active: PlayerId, other: PlayerId) -> Result<(), GameError> {
        if !player::meet(&mut self.players, active, other)? {
            return Ok(());
        }

        tracing::info!("{} has met {}", active, other);
        self.events.push(GameEvent::PlayersMet { a: active, b: other });

        if self.players[active.0].is_human() {
            self.ui.show_greeting(&self.players[other.0]);
        } else if self.players[other.0].is_human() {
            self.ui.show_greeting(&self.players[active.0]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FirstOptionPolicy;
    use crate::tile::TileType;

    #[derive(Default)]
    struct RecordingUi {
        greetings: Vec<PlayerId>,
        notices: Vec<Notice>,
        panel: Vec<bool>,
    }

    impl UiPort for RecordingUi {
        fn show_greeting(&mut self, stranger: &Player) {
            self.greetings.push(stranger.id());
        }

        fn show_notice(&mut self, notice: Notice) {
            self.notices.push(notice);
        }

        fn show_panel(&mut self, visible: bool) {
            self.panel.push(visible);
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// One ocean row, ten hexes long
    fn strip_game() -> TurnController<RecordingUi> {
        let grid = HexGrid::new(10, 1).unwrap();
        TurnController::new(grid, rng(), RecordingUi::default())
    }

    #[test]
    fn test_no_players_is_an_error() {
        let mut game = strip_game();
        assert!(matches!(game.step(), Err(GameError::InvalidPlayerCount(_))));
    }

    #[test]
    fn test_setup_closes_after_first_step() {
        let mut game = strip_game();
        game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        assert_eq!(
            game.add_player(Controller::Ai, Coord::new(0, 0)).unwrap_err(),
            GameError::Occupied(Coord::new(0, 0))
        );
        game.step().unwrap();
        assert_eq!(
            game.add_player(Controller::Ai, Coord::new(0, 5)).unwrap_err(),
            GameError::SetupClosed
        );
    }

    #[test]
    fn test_human_turn_waits_for_input() {
        let mut game = strip_game();
        let human = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();

        assert_eq!(game.play_turn().unwrap(), TurnProgress::AwaitingInput(human));
        assert_eq!(game.phase(), Phase::AwaitInput);
        assert_eq!(game.reachable().as_slice(), &[Coord::new(0, 1), Coord::new(0, 2)]);
        // calling again does no work
        assert_eq!(game.play_turn().unwrap(), TurnProgress::AwaitingInput(human));
    }

    #[test]
    fn test_illegal_click_changes_nothing() {
        let mut game = strip_game();
        let human = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        game.play_turn().unwrap();

        let far = game.validate_and_make_move(0, 5).unwrap();
        assert_eq!(far, ActionOutcome::Rejected(Rejection::NotReachable(Coord::new(0, 5))));

        let off = game.validate_and_make_move(-3, 40).unwrap();
        assert_eq!(off, ActionOutcome::Rejected(Rejection::OutOfBounds(Coord::new(-3, 40))));

        assert_eq!(game.phase(), Phase::AwaitInput);
        assert_eq!(game.remaining_energy(human).unwrap(), Some(5));
        let piece = game.player(human).unwrap().main_piece().unwrap();
        assert_eq!(game.token(piece).unwrap().hex, Some(Coord::new(0, 0)));
    }

    #[test]
    fn test_move_spends_energy_and_recomputes() {
        let mut game = strip_game();
        let human = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        game.play_turn().unwrap();

        let outcome = game.validate_and_make_move(0, 1).unwrap();
        let piece = game.player(human).unwrap().main_piece().unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Moved {
                token: piece,
                from: Coord::new(0, 0),
                to: Coord::new(0, 1),
                cost: 2
            }
        );
        assert_eq!(game.remaining_energy(human).unwrap(), Some(3));
        assert_eq!(game.phase(), Phase::AwaitInput);
        assert!(game.reachable().contains(Coord::new(0, 2)));
        assert!(game.reachable().contains(Coord::new(0, 0)));
        assert_eq!(game.grid().get(Coord::new(0, 0)).unwrap().occupant(), None);
    }

    #[test]
    fn test_running_out_of_moves_ends_turn() {
        let mut game = strip_game();
        let human = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        game.play_turn().unwrap();

        // 2 + 2 leaves 1 energy, not enough for any ocean hex
        game.validate_and_make_move(0, 2).unwrap();
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::AutoPassed { player: human }));
        assert!(events.contains(&GameEvent::TurnEnded { player: human }));
        assert_eq!(game.phase(), Phase::TurnStart);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_zero_energy_ends_turn_without_autopass() {
        let grid = HexGrid::filled(4, 1, TileType::PLAINS).unwrap();
        let mut game = TurnController::new(grid, rng(), RecordingUi::default());
        let human = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        game.play_turn().unwrap();

        game.validate_and_make_move(0, 1).unwrap();
        let events = game.drain_events();
        assert!(!events.contains(&GameEvent::AutoPassed { player: human }));
        assert!(events.contains(&GameEvent::TurnEnded { player: human }));
    }

    #[test]
    fn test_place_structure() {
        let mut game = strip_game();
        let human = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        game.play_turn().unwrap();
        game.toggle_interaction_mode(human).unwrap();

        let outcome = game.validate_and_make_move(0, 1).unwrap();
        let ActionOutcome::Placed { token, at } = outcome else {
            panic!("expected placement, got {outcome:?}");
        };
        assert_eq!(at, Coord::new(0, 1));
        assert_eq!(game.remaining_energy(human).unwrap(), Some(2));
        assert_eq!(game.token(token).unwrap().owner, Some(human));
        assert!(game.player(human).unwrap().tokens().contains(&token));

        // 2 energy left: enough to reach (0,1) again, not to build there
        assert!(game.reachable().contains(Coord::new(0, 1)));
        let again = game.validate_and_make_move(0, 1).unwrap();
        assert_eq!(
            again,
            ActionOutcome::Rejected(Rejection::InsufficientEnergy {
                required: PLACEMENT_COST,
                available: 2
            })
        );
        assert_eq!(
            game.ui().notices,
            vec![Notice::InsufficientEnergy {
                required: PLACEMENT_COST,
                available: 2
            }]
        );
        assert_eq!(game.phase(), Phase::AwaitInput);
        assert_eq!(game.remaining_energy(human).unwrap(), Some(2));
        assert_eq!(game.grid().get(Coord::new(0, 1)).unwrap().occupant(), Some(token));
    }

    #[test]
    fn test_pass_turn() {
        let mut game = strip_game();
        let a = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        let b = game.add_player(Controller::Human, Coord::new(0, 9)).unwrap();
        assert!(!game.pass_turn().unwrap());

        game.play_turn().unwrap();
        assert_eq!(game.active_player(), a);
        assert!(game.pass_turn().unwrap());
        assert_eq!(game.active_player(), b);
        assert_eq!(game.play_turn().unwrap(), TurnProgress::AwaitingInput(b));
        // nine hexes apart: nobody has met
        assert!(game.ui().greetings.is_empty());
    }

    #[test]
    fn test_energy_resets_each_turn() {
        let mut game = strip_game();
        let human = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        game.play_turn().unwrap();
        game.validate_and_make_move(0, 1).unwrap();
        assert_eq!(game.remaining_energy(human).unwrap(), Some(3));
        game.pass_turn().unwrap();

        game.play_turn().unwrap();
        assert_eq!(game.remaining_energy(human).unwrap(), Some(5));
    }

    #[test]
    fn test_ai_turn_runs_to_completion() {
        let mut game = strip_game().with_policy(Box::new(FirstOptionPolicy));
        let ai = game.add_player(Controller::Ai, Coord::new(0, 4)).unwrap();

        assert_eq!(game.play_turn().unwrap(), TurnProgress::Completed(ai));
        let moves = game
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Moved { .. }))
            .count();
        assert!(moves >= 1);
        assert!(game.remaining_energy(ai).unwrap().unwrap() >= 0);
    }

    #[test]
    fn test_panel_toggle_reaches_ui() {
        let mut game = strip_game();
        assert!(game.toggle_panel());
        assert!(!game.toggle_panel());
        assert_eq!(game.ui().panel, vec![true, false]);
    }

    #[test]
    fn test_damage_destroys_token() {
        let mut game = strip_game();
        let a = game.add_player(Controller::Human, Coord::new(0, 0)).unwrap();
        let piece = game.player(a).unwrap().main_piece().unwrap();
        game.play_turn().unwrap();

        assert!(!game.damage(piece, 4).unwrap());
        assert_eq!(game.token(piece).unwrap().hit_points, 6);

        assert!(game.damage(piece, 6).unwrap());
        assert_eq!(game.token(piece).unwrap_err(), GameError::UnknownToken(piece));
        assert_eq!(game.player(a).unwrap().main_piece(), None);
        assert_eq!(game.grid().get(Coord::new(0, 0)).unwrap().occupant(), None);
        // no piece left to move, so the turn was passed
        assert!(game.events().contains(&GameEvent::AutoPassed { player: a }));
    }
}
