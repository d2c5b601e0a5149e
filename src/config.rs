//! Game and simulation settings.
//!
//! Both structs deserialize from JSON with every field optional; missing
//! fields take the defaults below.

use serde::{Deserialize, Serialize};

/// Rules knobs for a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// End the game in a draw after this many years without any supply
    /// center changing hands. `None` disables the rule.
    pub draw_on_stalemate_years: Option<u16>,
    /// Fail adjudication with `ParadoxError` instead of disrupting the
    /// convoys of a convoy paradox.
    pub strict_convoy_paradox: bool,
    pub start_year: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { draw_on_stalemate_years: None, strict_convoy_paradox: false, start_year: 1901 }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Settings for a batch of random games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub games: usize,
    /// Worker threads; 0 lets rayon decide.
    pub threads: usize,
    pub seed: u64,
    /// Games still running after this year's Winter are stopped unfinished.
    pub max_year: u16,
    pub game: GameConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig { games: 10, threads: 0, seed: 0, max_year: 1920, game: GameConfig::default() }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
