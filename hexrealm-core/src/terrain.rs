//! Procedural continent generation ("continent growth")
//!
//! Every continent starts at a seed hex on the middle row and floods
//! outward over ocean. Each land hex rolls a stop value in
//! `[min_continent_width, max_continent_width)` and only keeps growing if
//! the roll reaches its distance from the seed, so coastlines get
//! ragged instead of following a fixed radius.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Coord, HexGrid};
use crate::error::GameError;
use crate::tile::TileType;

/// Board generation parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSpec {
    pub width: i32,
    pub height: i32,
    pub num_continents: i32,
    pub min_continent_width: i32,
    pub max_continent_width: i32,
}

impl Default for MapSpec {
    fn default() -> Self {
        // a reasonable max width is min(width, height) / 3
        Self {
            width: 30,
            height: 18,
            num_continents: 3,
            min_continent_width: 1,
            max_continent_width: 6,
        }
    }
}

impl MapSpec {
    pub fn new(
        width: i32,
        height: i32,
        num_continents: i32,
        min_continent_width: i32,
        max_continent_width: i32,
    ) -> Self {
        Self {
            width,
            height,
            num_continents,
            min_continent_width,
            max_continent_width,
        }
    }

    /// Fail fast before anything is allocated
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width < 2 {
            return Err(GameError::InvalidDimensions(format!(
                "width must be at least 2, got {}",
                self.width
            )));
        }
        if self.height < 1 {
            return Err(GameError::InvalidDimensions(format!(
                "height must be at least 1, got {}",
                self.height
            )));
        }
        if self.num_continents < 1 {
            return Err(GameError::InvalidDimensions(format!(
                "need at least one continent, got {}",
                self.num_continents
            )));
        }
        if self.min_continent_width < 0 {
            return Err(GameError::InvalidDimensions(format!(
                "min continent width must be non-negative, got {}",
                self.min_continent_width
            )));
        }
        if self.max_continent_width <= self.min_continent_width {
            return Err(GameError::InvalidDimensions(format!(
                "max continent width ({}) must exceed min continent width ({})",
                self.max_continent_width, self.min_continent_width
            )));
        }
        Ok(())
    }

    /// Seed hex of every continent, evenly spaced along the middle row
    pub fn continent_seeds(&self) -> Vec<Coord> {
        let row = self.height / 2;
        let row_len = if row % 2 == 0 { self.width } else { self.width - 1 };
        let span = self.width / self.num_continents;

        (0..self.num_continents)
            .map(|i| {
                let col = span * i + span / 2;
                Coord::new(row, col.min(row_len - 1))
            })
            .collect()
    }
}

/// Build an all-ocean board and grow the continents onto it
pub fn generate<R: Rng + ?Sized>(spec: &MapSpec, rng: &mut R) -> Result<HexGrid, GameError> {
    spec.validate()?;
    let mut grid = HexGrid::new(spec.width, spec.height)?;

    for seed in spec.continent_seeds() {
        let grown = grow_continent(&mut grid, seed, spec, rng)?;
        tracing::debug!("Continent at {} grew to {} hexes", seed, grown);
    }

    tracing::debug!(
        "Generated {}x{} board, {} of {} hexes are land",
        spec.width,
        spec.height,
        grid.land_count(),
        grid.hex_count()
    );

    Ok(grid)
}

/// Flood one continent out from `seed`. Returns the number of hexes
/// converted to land.
pub fn grow_continent<R: Rng + ?Sized>(
    grid: &mut HexGrid,
    seed: Coord,
    spec: &MapSpec,
    rng: &mut R,
) -> Result<usize, GameError> {
    let mut converted = 0;
    // (hex, distance from seed); the seed itself is distance 1
    let mut pending = vec![(seed, 1)];

    while let Some((coord, distance)) = pending.pop() {
        // already claimed by a sibling branch
        if coord != seed && grid.get(coord)?.is_land() {
            continue;
        }

        grid.set_type(coord, TileType::PLAINS)?;
        converted += 1;

        let stop_roll = rng.gen_range(spec.min_continent_width..spec.max_continent_width);
        if stop_roll >= distance {
            let ocean: Vec<Coord> = grid
                .adjacent(coord)
                .filter(|&n| grid.hex(n).is_some_and(|h| !h.is_land()))
                .collect();
            pending.extend(ocean.into_iter().map(|n| (n, distance + 1)));
        }
    }

    Ok(converted)
}
