//! HEXREALM Core - Game engine
//!
//! This crate provides the simulation behind HEXREALM:
//! - Board geometry (offset hex grid with jagged rows)
//! - Procedural continent generation
//! - Tokens, energy and movement cost search
//! - Fog of war and first-contact diplomacy
//! - The turn state machine and pluggable AI policies
//!
//! Rendering is not part of this crate. Adapters read the board and drain
//! [`GameEvent`]s from the [`TurnController`].

pub mod error;
pub mod tile;
pub mod board;
pub mod terrain;
pub mod pieces;
pub mod reach;
pub mod visibility;
pub mod player;
pub mod ai;
pub mod config;
pub mod game;

// Re-exports for convenient access
pub use error::GameError;
pub use tile::{Color, TileType};
pub use board::{Coord, Hex, HexGrid};
pub use terrain::{generate, MapSpec};
pub use pieces::{PieceFactory, PieceKind, StandardFactory, Token, TokenId, TokenKind, Tokens};
pub use reach::{min_cost, reachable_set, PathCost, ReachableSet};
pub use visibility::{Sighting, Vision};
pub use player::{meet, Controller, InteractionMode, Player, PlayerId};
pub use ai::{policy_by_name, AiPolicy, FirstOptionPolicy, FrontierPolicy, PolicyView, RandomPolicy};
pub use config::GameConfig;
pub use game::{
    ActionOutcome, GameEvent, Notice, NullUi, Phase, Rejection, TurnController, TurnProgress,
    UiPort, PLACEMENT_COST,
};
