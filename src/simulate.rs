//! Batch simulation of random games.
//!
//! Plays independent games in which every power picks uniformly random legal
//! orders, in parallel across a rayon thread pool. Games never share state,
//! so results depend only on the seed and game index.

use std::collections::BTreeMap;
use std::io::Write;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::board::ALL_POWERS;
use crate::config::SimulationConfig;
use crate::error::GameError;
use crate::game::{Game, GameStatus};
use crate::movegen::random_orders;

/// How a simulated game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Solo { winner: String },
    Draw { powers: Vec<String> },
    /// Still running when the year limit was reached.
    Unfinished,
    Failed { error: String },
}

/// One line of simulator output.
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub index: usize,
    pub game_id: String,
    pub final_phase: String,
    pub phases: usize,
    pub outcome: Outcome,
    /// Supply centers per power at the end.
    pub centers: BTreeMap<String, usize>,
    /// Phases in which some convoy was disrupted.
    pub disrupted_convoys: Vec<String>,
}

fn rng_for(config: &SimulationConfig, index: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(index as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one game to its end or to `config.max_year`.
pub fn play_random_game(config: &SimulationConfig, index: usize, rng: &mut SmallRng) -> Result<Game, GameError> {
    let mut game = Game::with_id(
        format!("sim-{index}"),
        config.game.clone(),
        crate::board::BoardState::standard(config.game.start_year),
    );

    while !game.is_done() && game.current_phase().year <= config.max_year {
        for power in ALL_POWERS {
            let orders = random_orders(power, game.state(), rng);
            game.set_parsed_orders(power, &orders);
        }
        game.process()?;
    }
    Ok(game)
}

fn summarize(index: usize, game: &Game) -> GameSummary {
    let outcome = match game.status() {
        GameStatus::Solo(power) => Outcome::Solo { winner: power.name().to_string() },
        GameStatus::Draw(powers) => Outcome::Draw { powers: powers.iter().map(|p| p.name().to_string()).collect() },
        GameStatus::InProgress => Outcome::Unfinished,
    };
    let disrupted_convoys = game
        .history()
        .iter()
        .filter(|(_, r)| r.results.iter().any(|o| o.result == crate::resolve::OrderResult::Disrupted))
        .map(|(phase, _)| phase.name())
        .collect();

    GameSummary {
        index,
        game_id: game.game_id().to_string(),
        final_phase: game.current_phase().name(),
        phases: game.history().len(),
        outcome,
        centers: ALL_POWERS.into_iter().map(|p| (p.name().to_string(), game.state().center_count(p))).collect(),
        disrupted_convoys,
    }
}

fn run_one(config: &SimulationConfig, index: usize) -> GameSummary {
    let mut rng = rng_for(config, index);
    match play_random_game(config, index, &mut rng) {
        Ok(game) => summarize(index, &game),
        Err(err) => {
            warn!(index, error = %err, "simulated game failed");
            GameSummary {
                index,
                game_id: format!("sim-{index}"),
                final_phase: String::new(),
                phases: 0,
                outcome: Outcome::Failed { error: err.to_string() },
                centers: BTreeMap::new(),
                disrupted_convoys: Vec::new(),
            }
        }
    }
}

/// Runs `config.games` games on a dedicated pool and returns their summaries
/// in index order.
pub fn run_simulation(config: &SimulationConfig) -> Result<Vec<GameSummary>, rayon::ThreadPoolBuildError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(config.threads).build()?;
    info!(games = config.games, threads = pool.current_num_threads(), seed = config.seed, "starting simulation");

    let summaries: Vec<GameSummary> =
        pool.install(|| (0..config.games).into_par_iter().map(|i| run_one(config, i)).collect());

    let solos = summaries.iter().filter(|s| matches!(s.outcome, Outcome::Solo { .. })).count();
    let failed = summaries.iter().filter(|s| matches!(s.outcome, Outcome::Failed { .. })).count();
    info!(games = summaries.len(), solos, failed, "simulation finished");
    Ok(summaries)
}

/// Writes one JSON object per line.
pub fn write_jsonl<W: Write>(summaries: &[GameSummary], out: &mut W) -> std::io::Result<()> {
    for summary in summaries {
        serde_json::to_writer(&mut *out, summary)?;
        writeln!(out)?;
    }
    Ok(())
}
