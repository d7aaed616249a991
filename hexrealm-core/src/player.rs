//! Players and first-contact diplomacy

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::pieces::TokenId;
use crate::tile::Color;
use crate::visibility::Vision;

/// Stable player id, unique per game (index into the roster)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Who picks this player's moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai,
}

/// What a click on a legal hex does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Move,
    Place,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Move => InteractionMode::Place,
            InteractionMode::Place => InteractionMode::Move,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    pub name: String,
    pub color: Color,
    pub controller: Controller,
    pub interaction_mode: InteractionMode,
    tokens: Vec<TokenId>,
    main_piece: Option<TokenId>,
    pub vision: Vision,
    met: FxHashSet<PlayerId>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, color: Color, controller: Controller) -> Self {
        let mut met = FxHashSet::default();
        met.insert(id);
        Self {
            id,
            name: name.into(),
            color,
            controller,
            interaction_mode: InteractionMode::Move,
            tokens: Vec::new(),
            main_piece: None,
            vision: Vision::new(),
            met,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn is_human(&self) -> bool {
        self.controller == Controller::Human
    }

    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    pub fn main_piece(&self) -> Option<TokenId> {
        self.main_piece
    }

    /// The piece that acts this turn. Always the main piece for now.
    pub fn active_piece(&self) -> Option<TokenId> {
        self.main_piece
    }

    pub fn set_main_piece(&mut self, token: TokenId) {
        self.main_piece = Some(token);
        self.add_token(token);
    }

    pub fn add_token(&mut self, token: TokenId) {
        if !self.tokens.contains(&token) {
            self.tokens.push(token);
        }
    }

    /// Drop `token` from the roster, clearing the main piece if it was it
    pub fn remove_token(&mut self, token: TokenId) {
        self.tokens.retain(|&t| t != token);
        if self.main_piece == Some(token) {
            self.main_piece = None;
        }
    }

    pub fn switch_interaction_mode(&mut self) -> InteractionMode {
        self.interaction_mode = self.interaction_mode.toggled();
        tracing::debug!("{} interaction mode is now {:?}", self.id, self.interaction_mode);
        self.interaction_mode
    }

    pub fn has_met(&self, other: PlayerId) -> bool {
        self.met.contains(&other)
    }

    pub fn met_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.met.iter().copied().filter(move |&p| p != self.id)
    }
}

/// Record first contact between `a` and `b` on both sides.
///
/// Returns `true` only the first time; later calls change nothing.
pub fn meet(players: &mut [Player], a: PlayerId, b: PlayerId) -> Result<bool, GameError> {
    if a.0 >= players.len() {
        return Err(GameError::UnknownPlayer(a));
    }
    if b.0 >= players.len() {
        return Err(GameError::UnknownPlayer(b));
    }
    if players[a.0].has_met(b) {
        return Ok(false);
    }

    players[a.0].met.insert(b);
    players[b.0].met.insert(a);
    Ok(true)
}
