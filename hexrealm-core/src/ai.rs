//! Move selection for computer players
//!
//! A policy only ever sees the legal destinations for the active piece and
//! a read-only view of the board, so strategies can be swapped without the
//! turn controller knowing which one is in use.

use rand::{Rng, RngCore};

use crate::board::{Coord, HexGrid};
use crate::visibility::Vision;

/// Read-only context handed to a policy
#[derive(Clone, Copy)]
pub struct PolicyView<'a> {
    pub grid: &'a HexGrid,
    pub vision: &'a Vision,
}

/// Picks one destination out of the legal ones
pub trait AiPolicy {
    /// `options` is never empty when called by the turn controller.
    /// Returning `None` makes the player pass.
    fn choose(
        &mut self,
        options: &[Coord],
        view: PolicyView<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<Coord>;

    fn name(&self) -> &'static str;
}

/// Uniformly random legal move (the default)
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl AiPolicy for RandomPolicy {
    fn choose(
        &mut self,
        options: &[Coord],
        _view: PolicyView<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<Coord> {
        if options.is_empty() {
            return None;
        }
        Some(options[rng.gen_range(0..options.len())])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Always the first option. Deterministic, for tests and replays.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstOptionPolicy;

impl AiPolicy for FirstOptionPolicy {
    fn choose(
        &mut self,
        options: &[Coord],
        _view: PolicyView<'_>,
        _rng: &mut dyn RngCore,
    ) -> Option<Coord> {
        options.first().copied()
    }

    fn name(&self) -> &'static str {
        "first"
    }
}

/// Explorer: heads for the destination bordering the most undiscovered
/// hexes, breaking ties at random.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrontierPolicy;

impl FrontierPolicy {
    fn unexplored_around(view: PolicyView<'_>, coord: Coord) -> usize {
        view.grid
            .adjacent(coord)
            .filter(|&n| !view.vision.has_discovered(n))
            .count()
    }
}

impl AiPolicy for FrontierPolicy {
    fn choose(
        &mut self,
        options: &[Coord],
        view: PolicyView<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<Coord> {
        let best = options
            .iter()
            .map(|&c| Self::unexplored_around(view, c))
            .max()?;
        let top: Vec<Coord> = options
            .iter()
            .copied()
            .filter(|&c| Self::unexplored_around(view, c) == best)
            .collect();
        Some(top[rng.gen_range(0..top.len())])
    }

    fn name(&self) -> &'static str {
        "frontier"
    }
}

/// Look a policy up by its CLI name
pub fn policy_by_name(name: &str) -> Option<Box<dyn AiPolicy + Send>> {
    match name {
        "random" => Some(Box::new(RandomPolicy)),
        "first" => Some(Box::new(FirstOptionPolicy)),
        "frontier" => Some(Box::new(FrontierPolicy)),
        _ => None,
    }
}
