//! JSON game snapshots.
//!
//! A snapshot carries every phase's starting board as DFEN together with the
//! orders, messages and logs recorded in it. Loading replays the orders from
//! the first board and checks each reached board against the recorded one,
//! so a snapshot can only be loaded if the engine still adjudicates it the
//! same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Order, PhaseId, Power};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::Game;
use crate::press::{Message, Transcript};
use crate::protocol::dfen::{encode_dfen, parse_dfen};
use crate::protocol::dson::format_order;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSnapshot {
    pub name: String,
    /// Board at the start of the phase.
    pub dfen: String,
    /// Orders in DSON, keyed by power name.
    #[serde(default)]
    pub orders: BTreeMap<String, Vec<String>>,
    /// Order outcomes as `"<order>: <result>"`, empty for the current phase.
    #[serde(default)]
    pub results: Vec<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: String,
    #[serde(default)]
    pub config: GameConfig,
    /// Committed phases, oldest first.
    pub phases: Vec<PhaseSnapshot>,
    pub current: PhaseSnapshot,
}

fn orders_by_name(orders: &BTreeMap<Power, Vec<Order>>) -> BTreeMap<String, Vec<String>> {
    orders
        .iter()
        .filter(|(_, o)| !o.is_empty())
        .map(|(power, o)| (power.name().to_string(), o.iter().map(format_order).collect()))
        .collect()
}

impl GameSnapshot {
    pub fn of(game: &Game) -> GameSnapshot {
        let phases = game
            .history()
            .iter()
            .map(|(phase, record)| PhaseSnapshot {
                name: phase.name(),
                dfen: encode_dfen(&record.state),
                orders: orders_by_name(&record.orders),
                results: record.results.iter().map(|r| format!("{}: {}", r.order, r.result.as_str())).collect(),
                messages: record.transcript.messages().values().cloned().collect(),
                logs: record.transcript.logs().to_vec(),
            })
            .collect();

        let staged = crate::board::ALL_POWERS
            .into_iter()
            .map(|p| (p, game.staged_orders(p).to_vec()))
            .collect();
        let current = PhaseSnapshot {
            name: game.current_phase().name(),
            dfen: encode_dfen(game.state()),
            orders: orders_by_name(&staged),
            results: Vec::new(),
            messages: game.transcript().messages().values().cloned().collect(),
            logs: game.transcript().logs().to_vec(),
        };

        GameSnapshot { game_id: game.game_id().to_string(), config: game.config().clone(), phases, current }
    }

    /// Rebuilds the game by replaying every recorded phase.
    pub fn restore(&self) -> Result<Game, GameError> {
        let first = self.phases.first().unwrap_or(&self.current);
        let mut game = Game::with_id(self.game_id.clone(), self.config.clone(), parse_dfen(&first.dfen)?);

        let reached = self.phases.iter().skip(1).chain(std::iter::once(&self.current));
        for (phase, next) in self.phases.iter().zip(reached) {
            let id = phase_id(&phase.name)?;
            if game.current_phase() != id {
                return Err(GameError::ReplayDiverged {
                    phase: id,
                    expected: phase.name.clone(),
                    found: game.current_phase().name(),
                });
            }
            stage_phase(&mut game, id, phase)?;
            game.process()?;

            let found = encode_dfen(game.state());
            if found != next.dfen {
                return Err(GameError::ReplayDiverged { phase: id, expected: next.dfen.clone(), found });
            }
            debug!(phase = %id, "replayed");
        }

        let id = phase_id(&self.current.name)?;
        stage_phase(&mut game, id, &self.current)?;
        Ok(game)
    }
}

fn phase_id(name: &str) -> Result<PhaseId, GameError> {
    PhaseId::from_name(name).ok_or_else(|| GameError::PhaseName(name.to_string()))
}

fn stage_phase(game: &mut Game, id: PhaseId, phase: &PhaseSnapshot) -> Result<(), GameError> {
    for (name, texts) in &phase.orders {
        let power = Power::from_name(name).ok_or_else(|| GameError::UnknownPower(name.clone()))?;
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        for report in game.set_orders(power, &texts) {
            if let Err(source) = report.outcome {
                return Err(GameError::Replay { phase: id, text: report.text, source });
            }
        }
    }
    game.set_transcript(Transcript::from_parts(phase.messages.clone(), phase.logs.clone()));
    Ok(())
}

impl Game {
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot::of(self)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Game, GameError> {
        let snapshot: GameSnapshot = serde_json::from_str(json)?;
        snapshot.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played() -> Game {
        let mut game = Game::with_id("snap".into(), GameConfig::default(), crate::board::BoardState::standard(1901));
        game.set_orders(Power::France, &["A par - bur", "F bre - mao"]);
        game.set_orders(Power::Germany, &["A mun - bur"]);
        game.add_message("FRANCE", "GERMANY", "stay out of burgundy", 10);
        game.add_log("opening");
        game.process().unwrap();
        game.set_orders(Power::England, &["F lon - nth"]);
        game.add_message("ENGLAND", "FRANCE", "hello", 20);
        game
    }

    #[test]
    fn snapshot_lists_phases_and_current() {
        let snapshot = played().to_snapshot();
        assert_eq!(snapshot.phases.len(), 1);
        assert_eq!(snapshot.phases[0].name, "S1901M");
        assert_eq!(snapshot.phases[0].dfen, crate::protocol::dfen::INITIAL_DFEN);
        assert_eq!(snapshot.phases[0].orders["FRANCE"], vec!["A par - bur", "F bre - mao"]);
        assert!(snapshot.phases[0].results.iter().any(|r| r == "A par - bur: bounced"));
        assert_eq!(snapshot.current.name, "F1901M");
        assert_eq!(snapshot.current.orders["ENGLAND"], vec!["F lon - nth"]);
    }

    #[test]
    fn json_round_trip_replays() {
        let game = played();
        let json = game.to_json().unwrap();
        let loaded = Game::from_json(&json).unwrap();
        assert_eq!(loaded.game_id(), "snap");
        assert_eq!(loaded.state(), game.state());
        assert_eq!(loaded.staged_orders(Power::England), game.staged_orders(Power::England));
        assert_eq!(loaded.transcript(), game.transcript());
        assert_eq!(loaded.to_snapshot(), game.to_snapshot());
    }

    #[test]
    fn tampered_board_is_detected() {
        let mut snapshot = played().to_snapshot();
        snapshot.current.dfen = snapshot.current.dfen.replace("Famar", "Fagas");
        assert!(matches!(snapshot.restore(), Err(GameError::ReplayDiverged { .. })));
    }

    #[test]
    fn illegal_recorded_order_is_rejected() {
        let mut snapshot = played().to_snapshot();
        snapshot.phases[0].orders.insert("ITALY".into(), vec!["A rom - mun".into()]);
        assert!(matches!(snapshot.restore(), Err(GameError::Replay { .. })));
    }

    #[test]
    fn unknown_power_is_rejected() {
        let mut snapshot = played().to_snapshot();
        snapshot.current.orders.insert("ATLANTIS".into(), vec![]);
        assert!(matches!(snapshot.restore(), Err(GameError::UnknownPower(_))));
    }
}
