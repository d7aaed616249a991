//! Game setup: board parameters, seating and seed

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::terrain::MapSpec;

/// Everything needed to start a reproducible game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map: MapSpec,
    /// Total players, humans included
    pub players: usize,
    /// The first `human_players` seats are human
    pub human_players: usize,
    pub seed: u64,
    /// Name of the policy driving AI seats
    pub ai_policy: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map: MapSpec::default(),
            players: 4,
            human_players: 1,
            seed: 0,
            ai_policy: "random".to_string(),
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_players(mut self, players: usize, human_players: usize) -> Self {
        self.players = players;
        self.human_players = human_players;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        self.map.validate()?;

        if self.players == 0 {
            return Err(GameError::InvalidPlayerCount(
                "at least one player is required".to_string(),
            ));
        }
        if self.human_players > self.players {
            return Err(GameError::InvalidPlayerCount(format!(
                "{} human players but only {} seats",
                self.human_players, self.players
            )));
        }
        // starting units are spread along the middle row, one column apart at least
        if self.players as i64 + 1 > self.map.width as i64 {
            return Err(GameError::InvalidPlayerCount(format!(
                "{} players do not fit on a board {} hexes wide",
                self.players, self.map.width
            )));
        }
        Ok(())
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
