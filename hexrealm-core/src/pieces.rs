//! Tokens (units and structures) and the arena that owns them

use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Coord, HexGrid};
use crate::error::GameError;
use crate::player::PlayerId;

/// How far every token can see, in hexes
pub const SIGHT_RADIUS: u32 = 2;

/// Per-turn energy budget of a unit
pub const UNIT_MAX_ENERGY: i32 = 5;

pub const UNIT_HIT_POINTS: i32 = 10;
pub const STRUCTURE_HIT_POINTS: i32 = 20;

/// Stable token handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "token#{}", self.0)
    }
}

/// What the factory can build
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Unit,
    Structure,
}

impl FromStr for PieceKind {
    type Err = GameError;

    /// Accepts the generic names and the in-game ones (wizard, tower)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit" | "wizard" => Ok(PieceKind::Unit),
            "structure" | "tower" => Ok(PieceKind::Structure),
            _ => Err(GameError::UnknownPieceKind(s.to_string())),
        }
    }
}

/// Variant-specific token data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Unit {
        remaining_energy: i32,
        max_energy: i32,
    },
    Structure,
}

/// A piece on (or off) the board
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub owner: Option<PlayerId>,
    pub hex: Option<Coord>,
    pub hit_points: i32,
    pub sight: u32,
}

impl Token {
    pub fn unit() -> Self {
        Self {
            kind: TokenKind::Unit {
                remaining_energy: UNIT_MAX_ENERGY,
                max_energy: UNIT_MAX_ENERGY,
            },
            owner: None,
            hex: None,
            hit_points: UNIT_HIT_POINTS,
            sight: SIGHT_RADIUS,
        }
    }

    pub fn structure() -> Self {
        Self {
            kind: TokenKind::Structure,
            owner: None,
            hex: None,
            hit_points: STRUCTURE_HIT_POINTS,
            sight: SIGHT_RADIUS,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.kind, TokenKind::Unit { .. })
    }

    /// Remaining energy, or `None` for structures
    pub fn remaining_energy(&self) -> Option<i32> {
        match self.kind {
            TokenKind::Unit {
                remaining_energy, ..
            } => Some(remaining_energy),
            TokenKind::Structure => None,
        }
    }

    /// Refill a unit's energy. No-op on structures.
    pub fn start_turn(&mut self) {
        if let TokenKind::Unit {
            remaining_energy,
            max_energy,
        } = &mut self.kind
        {
            *remaining_energy = *max_energy;
        }
    }

    /// Subtract `amount` from a unit's energy and return what is left.
    /// Structures have no energy and report `None`.
    pub fn spend_energy(&mut self, amount: i32) -> Option<i32> {
        match &mut self.kind {
            TokenKind::Unit {
                remaining_energy, ..
            } => {
                *remaining_energy -= amount;
                Some(*remaining_energy)
            }
            TokenKind::Structure => None,
        }
    }
}

/// Builds fresh, unowned, off-board tokens.
///
/// Rendering adapters can wrap this to instantiate visuals alongside the
/// simulation record.
pub trait PieceFactory {
    fn make(&mut self, kind: PieceKind) -> Token;

    /// Build from a piece name such as `"wizard"` or `"tower"`
    fn make_named(&mut self, name: &str) -> Result<Token, GameError> {
        let kind = name.parse::<PieceKind>()?;
        Ok(self.make(kind))
    }
}

/// Factory producing the stock unit and structure
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardFactory;

impl PieceFactory for StandardFactory {
    fn make(&mut self, kind: PieceKind) -> Token {
        match kind {
            PieceKind::Unit => Token::unit(),
            PieceKind::Structure => Token::structure(),
        }
    }
}

// ============================================================================
// TOKEN ARENA
// ============================================================================

/// Owns every live token, keyed by id
#[derive(Clone, Debug, Default)]
pub struct Tokens {
    tokens: FxHashMap<TokenId, Token>,
    next_id: u32,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: Token) -> TokenId {
        let id = TokenId(self.next_id);
        self.next_id += 1;
        self.tokens.insert(id, token);
        id
    }

    pub fn get(&self, id: TokenId) -> Result<&Token, GameError> {
        self.tokens.get(&id).ok_or(GameError::UnknownToken(id))
    }

    pub fn get_mut(&mut self, id: TokenId) -> Result<&mut Token, GameError> {
        self.tokens.get_mut(&id).ok_or(GameError::UnknownToken(id))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &Token)> + '_ {
        self.tokens.iter().map(|(&id, t)| (id, t))
    }

    /// Owner of whatever stands on `coord`
    pub fn owner_at(&self, grid: &HexGrid, coord: Coord) -> Option<PlayerId> {
        let occupant = grid.hex(coord)?.occupant()?;
        self.tokens.get(&occupant)?.owner
    }

    /// Move `id` onto `coord`, vacating its previous hex.
    ///
    /// Any other token already on `coord` is knocked off the board (its
    /// `hex` becomes `None`) and returned.
    pub fn place(
        &mut self,
        grid: &mut HexGrid,
        id: TokenId,
        coord: Coord,
    ) -> Result<Option<TokenId>, GameError> {
        grid.get(coord)?;
        let previous = self.get(id)?.hex;

        if let Some(prev) = previous {
            if prev == coord {
                return Ok(None);
            }
            grid.remove_token(prev)?;
        }

        let evicted = grid.place_token(coord, id)?;
        if let Some(other) = evicted {
            self.get_mut(other)?.hex = None;
        }
        self.get_mut(id)?.hex = Some(coord);

        Ok(evicted)
    }

    /// Take `id` off the board, leaving it in the arena
    pub fn lift(&mut self, grid: &mut HexGrid, id: TokenId) -> Result<(), GameError> {
        if let Some(at) = self.get_mut(id)?.hex.take() {
            grid.remove_token(at)?;
        }
        Ok(())
    }

    /// Delete `id` entirely, clearing its hex
    pub fn destroy(&mut self, grid: &mut HexGrid, id: TokenId) -> Result<Token, GameError> {
        self.lift(grid, id)?;
        self.tokens.remove(&id).ok_or(GameError::UnknownToken(id))
    }
}
