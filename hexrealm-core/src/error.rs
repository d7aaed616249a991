//! Error types shared by the engine

use crate::board::Coord;
use crate::pieces::TokenId;
use crate::player::PlayerId;

/// Engine errors.
///
/// Illegal player input (a click outside the reachable set, too little
/// energy to place a structure) is not an error; see
/// [`crate::game::Rejection`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid board dimensions: {0}")]
    InvalidDimensions(String),

    #[error("tile type {name} has non-positive movement cost {cost}")]
    InvalidTileCost { name: &'static str, cost: i32 },

    #[error("invalid player count: {0}")]
    InvalidPlayerCount(String),

    #[error("{0} is out of bounds")]
    OutOfBounds(Coord),

    #[error("unknown piece kind: {0}")]
    UnknownPieceKind(String),

    #[error("unknown AI policy: {0}")]
    UnknownPolicy(String),

    #[error("start hex {0} is already occupied")]
    Occupied(Coord),

    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown token: {0}")]
    UnknownToken(TokenId),

    #[error("no path from {from} to {to}")]
    NoPath { from: Coord, to: Coord },

    /// Remaining energy went below zero after a validated action. This is
    /// an engine defect, never a user mistake.
    #[error("invariant violated: {player} ended an action with {energy} energy")]
    NegativeEnergy { player: PlayerId, energy: i32 },

    #[error("players can only be added before the first turn starts")]
    SetupClosed,
}
