//! The phase state machine.
//!
//! A `Game` owns the live board, the orders staged for the current phase and
//! the history of every committed phase. Committed boards are shared through
//! `Arc` and never mutated; rolling back builds a new `Game` from a chosen
//! history entry and leaves the original untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::board::{BoardState, Order, OrderUnit, PhaseId, PhaseKind, Power, Province, ALL_POWERS};
use crate::config::GameConfig;
use crate::disorder::default_order;
use crate::error::{GameError, InvariantViolation};
use crate::movegen::{self, validate_order, LegalityError};
use crate::press::{Message, Transcript};
use crate::protocol::dson::parse_order;
use crate::resolve::{
    advance_state, apply_builds, apply_resolution, apply_retreats, resolve_builds, resolve_orders,
    resolve_retreats, solo_winner, ResolvedOrder,
};

/// Where the game stands after the last committed phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Solo(Power),
    /// Draw shared by the powers still in the game.
    Draw(Vec<Power>),
}

impl GameStatus {
    pub fn is_done(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Which parts of the target phase survive a rollback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preserve {
    pub orders: bool,
    pub messages: bool,
    pub logs: bool,
}

impl Preserve {
    pub const NOTHING: Preserve = Preserve { orders: false, messages: false, logs: false };
    pub const EVERYTHING: Preserve = Preserve { orders: true, messages: true, logs: true };
}

/// Diagnostic for one submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReport {
    pub text: String,
    /// The normalized order that was staged, or why it was rejected.
    pub outcome: Result<Order, LegalityError>,
}

/// One committed phase.
#[derive(Debug, Clone)]
pub struct PhaseRecord {
    /// Board at the start of the phase.
    pub state: Arc<BoardState>,
    /// Orders staged by each power, fallbacks included.
    pub orders: BTreeMap<Power, Vec<Order>>,
    pub results: Vec<ResolvedOrder>,
    pub transcript: Transcript,
}

#[derive(Debug, Clone)]
pub struct Game {
    game_id: String,
    config: GameConfig,
    state: Arc<BoardState>,
    staged: BTreeMap<Power, Vec<Order>>,
    transcript: Transcript,
    history: BTreeMap<PhaseId, PhaseRecord>,
    status: GameStatus,
}

impl Game {
    /// A new game from the standard opening position.
    pub fn new(config: GameConfig) -> Self {
        let state = BoardState::standard(config.start_year);
        Game::from_state(config, state)
    }

    /// A new game starting from an arbitrary board.
    pub fn from_state(config: GameConfig, state: BoardState) -> Self {
        let game_id = format!("{:016x}", rand::thread_rng().gen::<u64>());
        Game::with_id(game_id, config, state)
    }

    pub fn with_id(game_id: String, config: GameConfig, state: BoardState) -> Self {
        let mut game = Game {
            game_id,
            config,
            state: Arc::new(state),
            staged: BTreeMap::new(),
            transcript: Transcript::default(),
            history: BTreeMap::new(),
            status: GameStatus::InProgress,
        };
        game.status = game.compute_status();
        game
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    // --- Orders ---

    /// Parses, checks and stages `power`'s orders, replacing whatever it
    /// staged before.
    ///
    /// A rejected order whose unit can still be identified stages that
    /// unit's fallback (Hold, or Disband in a retreat phase) so it does not
    /// fall into civil disorder.
    pub fn set_orders(&mut self, power: Power, texts: &[&str]) -> Vec<OrderReport> {
        let parsed: Vec<(String, Result<Order, LegalityError>)> = texts
            .iter()
            .map(|text| (text.to_string(), parse_order(text).map_err(LegalityError::from)))
            .collect();
        self.stage(power, parsed)
    }

    /// Stages already parsed orders for `power`.
    pub fn set_parsed_orders(&mut self, power: Power, orders: &[Order]) -> Vec<OrderReport> {
        let parsed = orders.iter().map(|o| (o.to_string(), Ok(*o))).collect();
        self.stage(power, parsed)
    }

    fn stage(&mut self, power: Power, parsed: Vec<(String, Result<Order, LegalityError>)>) -> Vec<OrderReport> {
        let mut staged: Vec<Order> = Vec::new();
        let mut reports = Vec::with_capacity(parsed.len());

        for (text, order) in parsed {
            let outcome = match order {
                Ok(order) if self.status.is_done() => {
                    Err(LegalityError::WrongPhase { kind: order.kind(), phase: self.state.phase.kind })
                }
                Ok(order) => match validate_order(power, &order, &self.state) {
                    Ok(valid) => {
                        let province = valid.province();
                        staged.retain(|o| province.is_none() || o.province() != province);
                        staged.push(valid);
                        Ok(valid)
                    }
                    Err(err) => {
                        if let Some(fallback) = self.fallback_for(power, &order) {
                            if !staged.iter().any(|o| o.province() == fallback.province()) {
                                staged.push(fallback);
                            }
                        }
                        Err(err)
                    }
                },
                Err(err) => Err(err),
            };
            if let Err(err) = &outcome {
                warn!(%power, order = %text, error = %err, "order rejected");
            }
            reports.push(OrderReport { text, outcome });
        }

        self.staged.insert(power, staged);
        reports
    }

    fn fallback_for(&self, power: Power, order: &Order) -> Option<Order> {
        let province = order.province()?;
        match self.state.phase.kind {
            PhaseKind::Movement => {
                let unit = self.state.unit_at(province).filter(|u| u.power == power)?;
                Some(Order::Hold { unit: OrderUnit::new(unit.unit_type, unit.location) })
            }
            PhaseKind::Retreat => default_order(power, province, &self.state),
            PhaseKind::Adjustment => None,
        }
    }

    /// Orders currently staged for `power`.
    pub fn staged_orders(&self, power: Power) -> &[Order] {
        self.staged.get(&power).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear_orders(&mut self, power: Power) {
        self.staged.remove(&power);
    }

    /// Staged orders plus civil-disorder orders for every unit left out.
    fn orders_for_resolution(&self) -> Vec<(Order, Power)> {
        let mut orders: Vec<(Order, Power)> = Vec::new();
        for (&power, staged) in &self.staged {
            orders.extend(staged.iter().map(|&o| (o, power)));
        }

        let mut ordered = [false; crate::board::PROVINCE_COUNT];
        for (order, _) in &orders {
            if let Some(p) = order.province() {
                ordered[p as usize] = true;
            }
        }

        for power in ALL_POWERS {
            for province in movegen::orderable_locations(power, &self.state) {
                if ordered[province as usize] {
                    continue;
                }
                if let Some(order) = default_order(power, province, &self.state) {
                    debug!(%power, %order, "no order submitted");
                    orders.push((order, power));
                }
            }
        }
        orders
    }

    // --- Processing ---

    /// Resolves the current phase, commits it to history and moves on.
    ///
    /// Nothing changes when an error is returned.
    pub fn process(&mut self) -> Result<(), GameError> {
        if self.status.is_done() {
            return Err(GameError::GameOver);
        }

        let phase = self.state.phase;
        let orders = self.orders_for_resolution();
        let (results, mut next) = match phase.kind {
            PhaseKind::Movement => {
                let resolution = resolve_orders(&orders, &self.state, self.config.strict_convoy_paradox)?;
                let next = apply_resolution(&self.state, &resolution)?;
                (resolution.orders, next)
            }
            PhaseKind::Retreat => {
                let results = resolve_retreats(&orders, &self.state);
                let next = apply_retreats(&self.state, &results)?;
                (results, next)
            }
            PhaseKind::Adjustment => {
                let results = resolve_builds(&orders, &self.state);
                let next = apply_builds(&self.state, &results)?;
                (results, next)
            }
        };
        advance_state(&mut next);

        let record = PhaseRecord {
            state: Arc::clone(&self.state),
            orders: std::mem::take(&mut self.staged),
            results,
            transcript: std::mem::take(&mut self.transcript),
        };
        self.history.insert(phase, record);
        self.state = Arc::new(next);
        self.status = self.compute_status();

        info!(game = %self.game_id, %phase, next = %self.state.phase, "phase processed");
        match &self.status {
            GameStatus::Solo(power) => info!(game = %self.game_id, %power, "solo victory"),
            GameStatus::Draw(powers) => info!(game = %self.game_id, survivors = powers.len(), "stalemate draw"),
            GameStatus::InProgress => {}
        }
        Ok(())
    }

    fn compute_status(&self) -> GameStatus {
        if let Some(power) = solo_winner(&self.state) {
            return GameStatus::Solo(power);
        }
        if self.is_stalemate() {
            return GameStatus::Draw(self.survivors());
        }
        GameStatus::InProgress
    }

    /// Powers not yet eliminated.
    pub fn survivors(&self) -> Vec<Power> {
        ALL_POWERS.into_iter().filter(|&p| !self.state.is_eliminated(p)).collect()
    }

    /// No center changed hands across the last N Spring Movement phases.
    fn is_stalemate(&self) -> bool {
        let Some(years) = self.config.draw_on_stalemate_years else {
            return false;
        };
        let current = self.state.phase;
        if years == 0 || current.kind != PhaseKind::Movement || current.season != crate::board::Season::Spring {
            return false;
        }
        let Some(first_year) = current.year.checked_sub(years) else {
            return false;
        };
        (first_year..current.year).all(|year| {
            self.history
                .get(&PhaseId::spring(year))
                .is_some_and(|r| r.state.sc_owner == self.state.sc_owner)
        })
    }

    // --- Rollback ---

    /// A live game positioned at the start of `phase`, as if it had just
    /// been reached. Later history is dropped from the copy.
    pub fn rolled_back_to_phase_start(&self, phase: PhaseId, preserve: Preserve) -> Result<Game, GameError> {
        let (state, orders, transcript) = if phase == self.state.phase {
            (Arc::clone(&self.state), self.staged.clone(), self.transcript.clone())
        } else {
            let record = self.history.get(&phase).ok_or(InvariantViolation::PhaseNotInHistory(phase))?;
            (Arc::clone(&record.state), record.orders.clone(), record.transcript.clone())
        };

        let mut game = Game {
            game_id: self.game_id.clone(),
            config: self.config.clone(),
            state,
            staged: if preserve.orders { orders } else { BTreeMap::new() },
            transcript: transcript.retain(preserve.messages, preserve.logs),
            history: self.history.range(..phase).map(|(&k, v)| (k, v.clone())).collect(),
            status: GameStatus::InProgress,
        };
        game.status = game.compute_status();
        info!(game = %self.game_id, %phase, "rolled back to phase start");
        Ok(game)
    }

    /// A live game positioned right after `phase` was processed, which is the
    /// start of the phase that followed it.
    pub fn rolled_back_to_phase_end(&self, phase: PhaseId, preserve: Preserve) -> Result<Game, GameError> {
        if phase == self.state.phase {
            return Err(InvariantViolation::PhaseNotCompleted(phase).into());
        }
        let following = self.next_phase(phase).ok_or(InvariantViolation::PhaseNotInHistory(phase))?;
        self.rolled_back_to_phase_start(following, preserve)
    }

    /// Drops current-phase messages sent after `timestamp`.
    pub fn rollback_messages_to_timestamp(&mut self, timestamp: u64) -> usize {
        self.transcript.rollback_to_timestamp(timestamp)
    }

    // --- Press ---

    pub fn add_message(&mut self, sender: &str, recipient: &str, body: &str, time_sent: u64) -> u64 {
        self.transcript.add_message(sender, recipient, body, time_sent)
    }

    pub fn add_log(&mut self, body: &str) {
        self.transcript.add_log(body);
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    // --- Queries ---

    pub fn current_phase(&self) -> PhaseId {
        self.state.phase
    }

    pub fn previous_phase(&self) -> Option<PhaseId> {
        self.history.keys().next_back().copied()
    }

    /// The phase that followed `phase` in this game.
    pub fn next_phase(&self, phase: PhaseId) -> Option<PhaseId> {
        if !self.history.contains_key(&phase) {
            return None;
        }
        use std::ops::Bound::{Excluded, Unbounded};
        self.history
            .range((Excluded(phase), Unbounded))
            .next()
            .map(|(&k, _)| k)
            .or(Some(self.state.phase))
    }

    /// Provinces where `power` has something to order, or nothing once the
    /// game is over.
    pub fn orderable_locations(&self, power: Power) -> Vec<Province> {
        if self.status.is_done() {
            return Vec::new();
        }
        movegen::orderable_locations(power, &self.state)
    }

    /// Every legal order, keyed by the province it is given for.
    pub fn all_possible_orders(&self) -> BTreeMap<Province, Vec<Order>> {
        let mut all = BTreeMap::new();
        for power in ALL_POWERS {
            for province in self.orderable_locations(power) {
                all.insert(province, movegen::possible_orders(province, &self.state));
            }
        }
        all
    }

    pub fn board_hash(&self) -> u64 {
        self.state.board_hash()
    }

    /// Each power's squared center count as a share of the sum over all
    /// powers. All zero when nobody owns anything.
    pub fn square_scores(&self) -> BTreeMap<Power, f64> {
        let squares: Vec<(Power, f64)> = ALL_POWERS
            .into_iter()
            .map(|p| {
                let n = self.state.center_count(p) as f64;
                (p, n * n)
            })
            .collect();
        let total: f64 = squares.iter().map(|(_, s)| s).sum();
        squares
            .into_iter()
            .map(|(p, s)| (p, if total > 0.0 { s / total } else { 0.0 }))
            .collect()
    }

    pub fn history(&self) -> &BTreeMap<PhaseId, PhaseRecord> {
        &self.history
    }

    /// Board at the start of every phase, current one last.
    pub fn state_history(&self) -> Vec<(PhaseId, Arc<BoardState>)> {
        self.history
            .iter()
            .map(|(&k, r)| (k, Arc::clone(&r.state)))
            .chain(std::iter::once((self.state.phase, Arc::clone(&self.state))))
            .collect()
    }

    pub fn order_history(&self) -> BTreeMap<PhaseId, &BTreeMap<Power, Vec<Order>>> {
        self.history.iter().map(|(&k, r)| (k, &r.orders)).collect()
    }

    pub fn message_history(&self) -> BTreeMap<PhaseId, &BTreeMap<u64, Message>> {
        self.history.iter().map(|(&k, r)| (k, r.transcript.messages())).collect()
    }

    /// Logs of every committed phase, then the current one.
    pub fn logs(&self) -> Vec<(PhaseId, &str)> {
        self.history
            .iter()
            .flat_map(|(&k, r)| r.transcript.logs().iter().map(move |l| (k, l.as_str())))
            .chain(self.transcript.logs().iter().map(|l| (self.state.phase, l.as_str())))
            .collect()
    }

    pub fn results(&self, phase: PhaseId) -> Option<&[ResolvedOrder]> {
        self.history.get(&phase).map(|r| r.results.as_slice())
    }

    pub(crate) fn set_transcript(&mut self, transcript: Transcript) {
        self.transcript = transcript;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Season;
    use crate::resolve::OrderResult;

    fn game() -> Game {
        Game::with_id("test".into(), GameConfig::default(), BoardState::standard(1901))
    }

    #[test]
    fn starts_in_spring_1901() {
        let g = Game::new(GameConfig::default());
        assert_eq!(g.current_phase(), PhaseId::spring(1901));
        assert_eq!(g.previous_phase(), None);
        assert_eq!(g.status(), &GameStatus::InProgress);
        assert_eq!(g.game_id().len(), 16);
    }

    #[test]
    fn reports_per_order() {
        let mut g = game();
        let reports = g.set_orders(Power::France, &["A par - bur", "A mar - gas", "F bre - lon", "nonsense"]);
        assert!(reports[0].outcome.is_ok());
        assert!(reports[1].outcome.is_ok());
        assert!(matches!(reports[2].outcome, Err(LegalityError::NotAdjacent { .. })));
        assert!(matches!(reports[3].outcome, Err(LegalityError::Parse(_))));
        // The fleet falls back to holding.
        assert_eq!(g.staged_orders(Power::France).len(), 3);
        assert!(matches!(g.staged_orders(Power::France)[2], Order::Hold { .. }));
    }

    #[test]
    fn resubmitting_replaces_orders() {
        let mut g = game();
        g.set_orders(Power::France, &["A par - bur"]);
        g.set_orders(Power::France, &["A par - pic"]);
        assert_eq!(g.staged_orders(Power::France).len(), 1);
        assert_eq!(g.staged_orders(Power::France)[0].to_string(), "A par - pic");
    }

    #[test]
    fn later_order_for_same_unit_wins() {
        let mut g = game();
        g.set_orders(Power::France, &["A par - bur", "A par - pic"]);
        assert_eq!(g.staged_orders(Power::France).len(), 1);
        assert_eq!(g.staged_orders(Power::France)[0].to_string(), "A par - pic");
    }

    #[test]
    fn process_commits_and_advances() {
        let mut g = game();
        g.set_orders(Power::Germany, &["A mun - bur"]);
        g.set_orders(Power::France, &["A par - bur"]);
        g.process().unwrap();

        assert_eq!(g.current_phase(), PhaseId::new(1901, Season::Fall, PhaseKind::Movement));
        assert_eq!(g.previous_phase(), Some(PhaseId::spring(1901)));
        let results = g.results(PhaseId::spring(1901)).unwrap();
        let bounced = results.iter().filter(|r| r.result == OrderResult::Bounced).count();
        assert_eq!(bounced, 2);
        assert!(g.staged_orders(Power::France).is_empty());
        assert_eq!(g.state_history().len(), 2);
    }

    #[test]
    fn unordered_units_fall_into_civil_disorder() {
        let mut g = game();
        g.process().unwrap();
        // Every unit starts on a home center, so civil disorder holds.
        assert_eq!(g.state().units, BoardState::standard(1901).units);
        let results = g.results(PhaseId::spring(1901)).unwrap();
        assert_eq!(results.len(), 22);
        assert!(results.iter().all(|r| matches!(r.order, Order::Hold { .. })));
    }

    #[test]
    fn orderable_and_possible_orders() {
        let g = game();
        assert_eq!(g.orderable_locations(Power::Italy), vec![Province::Nap, Province::Rom, Province::Ven]);
        let all = g.all_possible_orders();
        assert_eq!(all.len(), 22);
        assert!(all[&Province::Lvp].iter().any(|o| o.to_string() == "A lvp - yor"));
    }

    #[test]
    fn square_scores_sum_to_one() {
        let g = game();
        let scores = g.square_scores();
        let total: f64 = scores.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        // Russia starts with four centers, everyone else three.
        assert!(scores[&Power::Russia] > scores[&Power::France]);
        assert!((scores[&Power::Russia] - 16.0 / 70.0).abs() < 1e-9);
    }

    #[test]
    fn rollback_to_current_start_without_orders() {
        let mut g = game();
        g.set_orders(Power::France, &["A par - bur"]);
        g.add_message("FRANCE", "GERMANY", "hi", 5);
        let copy = g.rolled_back_to_phase_start(g.current_phase(), Preserve::NOTHING).unwrap();
        assert!(copy.staged_orders(Power::France).is_empty());
        assert!(copy.transcript().is_empty());
        let copy = g.rolled_back_to_phase_start(g.current_phase(), Preserve::EVERYTHING).unwrap();
        assert_eq!(copy.staged_orders(Power::France).len(), 1);
        assert_eq!(copy.transcript().messages().len(), 1);
    }

    #[test]
    fn rollback_to_end_of_current_phase_is_an_error() {
        let g = game();
        let err = g.rolled_back_to_phase_end(g.current_phase(), Preserve::NOTHING).unwrap_err();
        assert!(matches!(err, GameError::Invariant(InvariantViolation::PhaseNotCompleted(_))));
        let err = g.rolled_back_to_phase_start(PhaseId::spring(1950), Preserve::NOTHING).unwrap_err();
        assert!(matches!(err, GameError::Invariant(InvariantViolation::PhaseNotInHistory(_))));
    }

    #[test]
    fn rollback_to_end_is_start_of_next() {
        let mut g = game();
        g.set_orders(Power::Germany, &["A mun - ruh"]);
        g.process().unwrap();
        g.process().unwrap();
        let end = g.rolled_back_to_phase_end(PhaseId::spring(1901), Preserve::NOTHING).unwrap();
        assert_eq!(end.current_phase(), PhaseId::new(1901, Season::Fall, PhaseKind::Movement));
        assert_eq!(end.history().len(), 1);
        assert_eq!(end.state().units[Province::Ruh as usize], Some((Power::Germany, crate::board::UnitType::Army)));
        // The original is untouched.
        assert_eq!(g.history().len(), 2);
    }

    #[test]
    fn processed_game_over_rejects() {
        let mut state = BoardState::standard(1901);
        for p in crate::board::ALL_PROVINCES.into_iter().filter(|p| p.is_supply_center()).take(18) {
            state.set_sc_owner(p, Some(Power::Turkey));
        }
        let mut g = Game::with_id("solo".into(), GameConfig::default(), state);
        assert_eq!(g.status(), &GameStatus::Solo(Power::Turkey));
        assert!(matches!(g.process(), Err(GameError::GameOver)));
        assert!(g.orderable_locations(Power::Turkey).is_empty());
    }
}
