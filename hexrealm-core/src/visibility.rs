//! Fog of war: what each player has discovered and what they see now
//!
//! `discovered` only ever grows. `seen` is rebuilt every turn. Whether a
//! renderer should draw a hex (and the tokens on it) for a player is a pure
//! function of that player's `seen` set.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::board::{Coord, HexGrid};
use crate::error::GameError;
use crate::pieces::Tokens;
use crate::player::PlayerId;

/// A foreign token came into view during a reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sighting {
    pub coord: Coord,
    pub owner: PlayerId,
}

/// One player's fog-of-war state. Invariant: `seen ⊆ discovered`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vision {
    discovered: FxHashSet<Coord>,
    seen: FxHashSet<Coord>,
}

impl Vision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_discovered(&self, coord: Coord) -> bool {
        self.discovered.contains(&coord)
    }

    pub fn can_see(&self, coord: Coord) -> bool {
        self.seen.contains(&coord)
    }

    pub fn discovered(&self) -> &FxHashSet<Coord> {
        &self.discovered
    }

    pub fn seen(&self) -> &FxHashSet<Coord> {
        &self.seen
    }

    /// Forget what is currently in view. Discoveries stay.
    pub fn reset_seen(&mut self) {
        self.seen.clear();
    }

    /// Mark every hex within `radius` steps of `origin` as discovered and
    /// seen. Fog does not limit this search.
    ///
    /// Returns one [`Sighting`] for each visited hex holding a token that
    /// belongs to someone other than `viewer`.
    pub fn reveal(
        &mut self,
        viewer: PlayerId,
        grid: &HexGrid,
        tokens: &Tokens,
        origin: Coord,
        radius: u32,
    ) -> Result<Vec<Sighting>, GameError> {
        grid.get(origin)?;

        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut sightings = Vec::new();

        visited.insert(origin);
        queue.push_back((origin, 0));

        while let Some((coord, depth)) = queue.pop_front() {
            self.discovered.insert(coord);
            self.seen.insert(coord);

            if let Some(owner) = tokens.owner_at(grid, coord) {
                if owner != viewer {
                    sightings.push(Sighting { coord, owner });
                }
            }

            if depth < radius {
                for next in grid.adjacent(coord) {
                    if visited.insert(next) {
                        queue.push_back((next, depth + 1));
                    }
                }
            }
        }

        Ok(sightings)
    }
}
