//! Hex board geometry with offset (row, col) coordinates
//!
//! The board is jagged: even rows hold `width` hexes, odd rows hold
//! `width - 1` and sit half a hex to the right.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::pieces::TokenId;
use crate::tile::TileType;

/// Offset hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Neighbor candidates, bounds not checked.
    ///
    /// Diagonals lean right on even rows and left on odd rows.
    pub fn neighbor_candidates(&self) -> [Coord; 6] {
        let (r, c) = (self.row, self.col);
        let diag = if r.rem_euclid(2) == 0 { c + 1 } else { c - 1 };
        [
            Coord::new(r + 1, c),
            Coord::new(r + 1, diag),
            Coord::new(r, c - 1),
            Coord::new(r, c + 1),
            Coord::new(r - 1, c),
            Coord::new(r - 1, diag),
        ]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One board cell
#[derive(Clone, Debug)]
pub struct Hex {
    coord: Coord,
    tile: TileType,
    occupant: Option<TokenId>,
}

impl Hex {
    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn tile(&self) -> &TileType {
        &self.tile
    }

    pub fn is_land(&self) -> bool {
        self.tile.is_land()
    }

    pub fn occupant(&self) -> Option<TokenId> {
        self.occupant
    }
}

/// The game board. Created once and never resized.
#[derive(Clone, Debug)]
pub struct HexGrid {
    width: i32,
    rows: Vec<Vec<Hex>>,
}

impl HexGrid {
    /// All-ocean board
    pub fn new(width: i32, height: i32) -> Result<Self, GameError> {
        Self::filled(width, height, TileType::OCEAN)
    }

    /// Board with every hex set to `tile`
    pub fn filled(width: i32, height: i32, tile: TileType) -> Result<Self, GameError> {
        if width < 2 {
            return Err(GameError::InvalidDimensions(format!(
                "width must be at least 2, got {width}"
            )));
        }
        if height < 1 {
            return Err(GameError::InvalidDimensions(format!(
                "height must be at least 1, got {height}"
            )));
        }

        let rows = (0..height)
            .map(|row| {
                (0..row_width(width, row))
                    .map(|col| Hex {
                        coord: Coord::new(row, col),
                        tile,
                        occupant: None,
                    })
                    .collect()
            })
            .collect();

        Ok(Self { width, rows })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    /// Number of hexes in `row`, or 0 outside the board
    pub fn row_len(&self, row: i32) -> i32 {
        if row < 0 || row >= self.height() {
            0
        } else {
            row_width(self.width, row)
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && coord.row < self.height()
            && coord.col < self.row_len(coord.row)
    }

    /// Bounds-checked lookup
    pub fn get(&self, coord: Coord) -> Result<&Hex, GameError> {
        self.hex(coord).ok_or(GameError::OutOfBounds(coord))
    }

    /// Lookup that reports absence as `None`
    pub fn hex(&self, coord: Coord) -> Option<&Hex> {
        if !self.contains(coord) {
            return None;
        }
        Some(&self.rows[coord.row as usize][coord.col as usize])
    }

    fn hex_mut(&mut self, coord: Coord) -> Result<&mut Hex, GameError> {
        if !self.contains(coord) {
            return Err(GameError::OutOfBounds(coord));
        }
        Ok(&mut self.rows[coord.row as usize][coord.col as usize])
    }

    /// In-bounds neighbors of `coord` (up to 6, no wraparound)
    pub fn adjacent(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        coord
            .neighbor_candidates()
            .into_iter()
            .filter(move |&c| self.contains(c))
    }

    /// Movement cost of entering `coord`
    pub fn cost(&self, coord: Coord) -> Result<i32, GameError> {
        Ok(self.get(coord)?.tile.cost)
    }

    pub fn set_type(&mut self, coord: Coord, tile: TileType) -> Result<(), GameError> {
        self.hex_mut(coord)?.tile = tile;
        Ok(())
    }

    /// Put `token` on `coord`, returning whichever token was there before.
    ///
    /// Only updates the hex side. Use [`crate::pieces::Tokens::place`] to
    /// keep the token's back-reference in sync.
    pub fn place_token(
        &mut self,
        coord: Coord,
        token: TokenId,
    ) -> Result<Option<TokenId>, GameError> {
        Ok(self.hex_mut(coord)?.occupant.replace(token))
    }

    pub fn remove_token(&mut self, coord: Coord) -> Result<Option<TokenId>, GameError> {
        Ok(self.hex_mut(coord)?.occupant.take())
    }

    /// Iterate every hex, row by row
    pub fn hexes(&self) -> impl Iterator<Item = &Hex> + '_ {
        self.rows.iter().flatten()
    }

    pub fn land_count(&self) -> usize {
        self.hexes().filter(|h| h.is_land()).count()
    }

    pub fn hex_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Text picture of the board, odd rows shifted half a cell.
    ///
    /// `overlay` may replace the glyph of any hex (e.g. with a token marker).
    pub fn render_ascii<F>(&self, overlay: F) -> String
    where
        F: Fn(&Hex) -> Option<char>,
    {
        let mut out = String::new();
        for (row, hexes) in self.rows.iter().enumerate() {
            if row % 2 == 1 {
                out.push(' ');
            }
            for (i, hex) in hexes.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push(overlay(hex).unwrap_or_else(|| hex.tile.glyph()));
            }
            out.push('\n');
        }
        out
    }
}

fn row_width(width: i32, row: i32) -> i32 {
    if row % 2 == 0 {
        width
    } else {
        width - 1
    }
}
