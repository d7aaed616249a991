//! Energy-bounded reachability and movement cost search
//!
//! Entering a hex costs that hex's tile cost. Both searches take a filter
//! (normally "has this player discovered the hex") and never step onto a
//! hex the filter rejects. The origin is exempt from the filter.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Coord, HexGrid};
use crate::error::GameError;

/// Legal destinations for one unit, in discovery order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReachableSet {
    order: Vec<Coord>,
    members: FxHashSet<Coord>,
}

impl ReachableSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.members.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.order.iter().copied()
    }

    fn push(&mut self, coord: Coord) {
        if self.members.insert(coord) {
            self.order.push(coord);
        }
    }
}

/// Cheapest movement cost between two hexes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathCost {
    Reachable(i32),
    Unreachable,
}

impl PathCost {
    pub fn cost(self) -> Option<i32> {
        match self {
            PathCost::Reachable(cost) => Some(cost),
            PathCost::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, PathCost::Reachable(_))
    }
}

// ============================================================================
// REACHABLE SET
// ============================================================================

/// Hexes a unit on `origin` with `energy` left can move to.
///
/// Depth-bounded flood fill: a neighbor is kept when entering it leaves
/// energy `>= 0`, and explored further only while energy stays `> 0`.
/// A hex is visited at most once, through whichever path reaches it first,
/// so the result is a set of legal targets and says nothing about the
/// cheapest way to get there. Use [`min_cost`] for that.
pub fn reachable_set<F>(
    grid: &HexGrid,
    origin: Coord,
    energy: i32,
    discovered: F,
) -> Result<ReachableSet, GameError>
where
    F: Fn(Coord) -> bool,
{
    grid.get(origin)?;

    let mut visited = FxHashSet::default();
    visited.insert(origin);
    let mut result = ReachableSet::empty();

    // every first step gets the full budget, even if a sibling branch
    // already reached that hex with less
    for next in grid.adjacent(origin) {
        if discovered(next) {
            flood(grid, next, energy, &discovered, &mut visited, &mut result);
        }
    }

    Ok(result)
}

fn flood<F>(
    grid: &HexGrid,
    coord: Coord,
    energy: i32,
    discovered: &F,
    visited: &mut FxHashSet<Coord>,
    result: &mut ReachableSet,
) where
    F: Fn(Coord) -> bool,
{
    let Some(hex) = grid.hex(coord) else {
        return;
    };
    let remaining = energy.saturating_sub(hex.tile().cost);

    if remaining < 0 {
        return;
    }
    visited.insert(coord);
    result.push(coord);

    // tile costs are positive, so recursion depth is bounded by energy
    if remaining > 0 {
        for next in grid.adjacent(coord) {
            if !visited.contains(&next) && discovered(next) {
                flood(grid, next, remaining, discovered, visited, result);
            }
        }
    }
}

// ============================================================================
// MIN COST
// ============================================================================

/// Cheapest cumulative cost from `origin` to `destination` through hexes
/// accepted by `passable` (Dijkstra, tile cost as edge weight).
pub fn min_cost<F>(
    grid: &HexGrid,
    origin: Coord,
    destination: Coord,
    passable: F,
) -> Result<PathCost, GameError>
where
    F: Fn(Coord) -> bool,
{
    grid.get(origin)?;
    grid.get(destination)?;

    if origin == destination {
        return Ok(PathCost::Reachable(0));
    }

    let mut best: FxHashMap<Coord, i32> = FxHashMap::default();
    let mut closed: FxHashSet<Coord> = FxHashSet::default();
    let mut frontier = BinaryHeap::new();

    best.insert(origin, 0);
    frontier.push(Reverse((0, origin)));

    while let Some(Reverse((cost, coord))) = frontier.pop() {
        if coord == destination {
            return Ok(PathCost::Reachable(cost));
        }
        if !closed.insert(coord) {
            continue;
        }

        for next in grid.adjacent(coord) {
            if closed.contains(&next) || !passable(next) {
                continue;
            }
            let step = grid.cost(next)?;
            // a path whose cost does not fit in i32 is no path
            let Some(candidate) = cost.checked_add(step) else {
                continue;
            };
            let improves = best.get(&next).map_or(true, |&known| candidate < known);
            if improves {
                best.insert(next, candidate);
                frontier.push(Reverse((candidate, next)));
            }
        }
    }

    Ok(PathCost::Unreachable)
}
