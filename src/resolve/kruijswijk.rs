//! Kruijswijk guess-and-check resolution of movement orders.
//!
//! Every order carries one boolean decision: a move succeeds, a support is
//! given, a convoy holds. Decisions are resolved recursively. When a decision
//! depends on itself, it is guessed both ways; if both guesses are
//! consistent the cycle is genuinely ambiguous and the backup rule applies.
//!
//! Strengths follow the DATC definitions (attack, hold, defend, prevent).

use thiserror::Error;
use tracing::{debug, warn};

use crate::board::adjacency::convoy_path_exists;
use crate::board::{
    is_adjacent, BoardState, Coast, DislodgedUnit as BoardDislodged, Order, OrderUnit, PhaseId, Power,
    Province, UnitType, ALL_PROVINCES, PROVINCE_COUNT,
};
use crate::error::InvariantViolation;

/// The outcome of resolving an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderResult {
    Succeeded,
    /// Move failed against a stronger or equal opposing strength.
    Bounced,
    /// Support was cut by an attack on the supporter.
    Cut,
    /// The ordered unit was dislodged.
    Dislodged,
    /// Convoyed move whose convoy chain failed.
    Disrupted,
    Failed,
    /// Order had no effect: no matching unit, or support/convoy for an order
    /// that was never given.
    Void,
}

impl OrderResult {
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderResult::Succeeded => "succeeded",
            OrderResult::Bounced => "bounced",
            OrderResult::Cut => "cut",
            OrderResult::Dislodged => "dislodged",
            OrderResult::Disrupted => "disrupted",
            OrderResult::Failed => "failed",
            OrderResult::Void => "void",
        }
    }
}

/// A resolved order paired with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub order: Order,
    pub power: Power,
    pub result: OrderResult,
    /// Final attack strength, for moves.
    pub strength: Option<u8>,
}

/// A unit that was dislodged during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DislodgedUnit {
    pub power: Power,
    pub unit_type: UnitType,
    pub province: Province,
    pub coast: Coast,
    pub attacker_from: Province,
    pub by_convoy: bool,
}

/// A convoy paradox settled by disrupting the convoys involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paradox {
    /// Provinces of every order in the dependency cycle.
    pub cycle: Vec<Province>,
    /// Origins of the convoyed moves that were disrupted.
    pub disrupted: Vec<Province>,
}

/// Raised instead of applying the paradox rule when strict mode is on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("convoy paradox in {phase} involving {}", join(.provinces))]
pub struct ParadoxError {
    pub phase: PhaseId,
    pub provinces: Vec<Province>,
}

fn join(provinces: &[Province]) -> String {
    provinces.iter().map(|p| p.abbr()).collect::<Vec<_>>().join(", ")
}

/// Everything a movement phase produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Submitted orders in input order, then implicit holds for unordered units.
    pub orders: Vec<ResolvedOrder>,
    pub dislodged: Vec<DislodgedUnit>,
    /// Provinces left empty by a bounce; no retreats may enter them.
    pub standoffs: Vec<Province>,
    pub paradoxes: Vec<Paradox>,
}

impl Resolution {
    /// Result of the order given for `province`, preferring the one that
    /// took effect over a void duplicate.
    pub fn result_at(&self, province: Province) -> Option<OrderResult> {
        let mut fallback = None;
        for r in self.orders.iter().filter(|r| r.order.province() == Some(province)) {
            if r.result != OrderResult::Void {
                return Some(r.result);
            }
            fallback.get_or_insert(r.result);
        }
        fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResState {
    Unresolved,
    Guessing,
    Resolved,
}

/// Internal tracking for a single order during adjudication.
#[derive(Debug, Clone, Copy)]
struct Adj {
    order: Order,
    power: Power,
    unit_type: UnitType,
    coast: Coast,
    src: Province,
    /// Move destination.
    dest: Option<Province>,
    /// Supported unit, or convoyed army origin.
    aux_from: Option<Province>,
    /// Supported move destination, or convoy destination.
    aux_to: Option<Province>,
    /// The order never entered adjudication.
    void: bool,
    /// Support or convoy for an order nobody gave; the unit just holds.
    unmatched: bool,
    convoyed: bool,
    /// Forced failure of the convoy path by the paradox rule.
    disrupted: bool,
    state: ResState,
    resolution: bool,
}

/// Reusable resolver that minimizes allocations across repeated calls.
pub struct Resolver {
    lookup: [Option<usize>; PROVINCE_COUNT],
    adj: Vec<Adj>,
    deps: Vec<usize>,
    paradoxes: Vec<Paradox>,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new(34)
    }
}

impl Resolver {
    /// Creates a new resolver with the given initial capacity hint.
    pub fn new(capacity: usize) -> Self {
        Resolver {
            lookup: [None; PROVINCE_COUNT],
            adj: Vec::with_capacity(capacity),
            deps: Vec::new(),
            paradoxes: Vec::new(),
        }
    }

    /// Resolves a set of movement-phase orders against the board state.
    ///
    /// Orders that do not match a unit of the ordering power, or that repeat
    /// an already ordered unit, come back `Void`. Units without an order hold.
    /// Convoy paradoxes are always settled; callers wanting strict behavior
    /// check `Resolution::paradoxes`.
    pub fn resolve(&mut self, orders: &[(Order, Power)], state: &BoardState) -> Resolution {
        self.init(orders, state);
        for i in 0..self.adj.len() {
            if !self.adj[i].void {
                self.resolve_decision(i);
            }
        }
        self.build_resolution()
    }

    fn init(&mut self, orders: &[(Order, Power)], state: &BoardState) {
        self.adj.clear();
        self.deps.clear();
        self.paradoxes.clear();
        self.lookup = [None; PROVINCE_COUNT];

        for &(order, power) in orders {
            let entry = self.entry_for(order, power, state);
            if !entry.void {
                self.lookup[entry.src as usize] = Some(self.adj.len());
            }
            self.adj.push(entry);
        }

        for unit in state.units() {
            let province = unit.location.province;
            if self.lookup[province as usize].is_none() {
                let order = Order::Hold { unit: OrderUnit::new(unit.unit_type, unit.location) };
                let entry = self.entry_for(order, unit.power, state);
                self.lookup[province as usize] = Some(self.adj.len());
                self.adj.push(entry);
            }
        }

        for i in 0..self.adj.len() {
            let unmatched = match self.adj[i].order {
                Order::SupportHold { .. } => match self.adj[i].aux_from.and_then(|p| self.lookup[p as usize]) {
                    Some(j) => self.adj[j].dest.is_some(),
                    None => true,
                },
                Order::SupportMove { .. } | Order::Convoy { .. } => {
                    let expects_convoy = matches!(self.adj[i].order, Order::Convoy { .. });
                    match self.adj[i].aux_from.and_then(|p| self.lookup[p as usize]) {
                        Some(j) => {
                            let target = &self.adj[j];
                            target.dest != self.adj[i].aux_to || (expects_convoy && !target.convoyed)
                        }
                        None => true,
                    }
                }
                _ => false,
            };
            self.adj[i].unmatched = unmatched;
        }
    }

    fn entry_for(&self, order: Order, power: Power, state: &BoardState) -> Adj {
        let (src, dest, aux_from, aux_to, convoyed) = match order {
            Order::Hold { unit } => (unit.province(), None, None, None, false),
            Order::Move { unit, dest, via_convoy } => {
                let convoyed = unit.unit_type == UnitType::Army
                    && (via_convoy || !is_adjacent(unit.province(), Coast::None, dest.province, Coast::None, false));
                (unit.province(), Some(dest.province), None, None, convoyed)
            }
            Order::SupportHold { unit, supported } => {
                (unit.province(), None, Some(supported.province()), None, false)
            }
            Order::SupportMove { unit, supported, dest } => {
                (unit.province(), None, Some(supported.province()), Some(dest.province), false)
            }
            Order::Convoy { unit, convoyed_from, convoyed_to } => {
                (unit.province(), None, Some(convoyed_from.province), Some(convoyed_to.province), false)
            }
            Order::Retreat { unit, .. } | Order::Disband { unit } | Order::Build { unit } => {
                (unit.province(), None, None, None, false)
            }
            // Never looked up: a waive is not a movement order and comes back void.
            Order::Waive => (ALL_PROVINCES[0], None, None, None, false),
        };

        let board_unit = state.units[src as usize];
        let movement_order = matches!(
            order,
            Order::Hold { .. }
                | Order::Move { .. }
                | Order::SupportHold { .. }
                | Order::SupportMove { .. }
                | Order::Convoy { .. }
        );
        let owned = matches!(
            (board_unit, order.unit()),
            (Some((p, ut)), Some(u)) if p == power && ut == u.unit_type
        );
        let void = !movement_order || !owned || self.lookup[src as usize].is_some();

        Adj {
            order,
            power,
            unit_type: board_unit.map(|(_, ut)| ut).unwrap_or(UnitType::Army),
            coast: state.location_of(src).coast,
            src,
            dest,
            aux_from,
            aux_to,
            void,
            unmatched: false,
            convoyed,
            disrupted: false,
            state: ResState::Unresolved,
            resolution: false,
        }
    }

    fn is_move(&self, i: usize) -> bool {
        !self.adj[i].void && self.adj[i].dest.is_some()
    }

    fn moves_into(&self, province: Province) -> Vec<usize> {
        (0..self.adj.len())
            .filter(|&i| self.is_move(i) && self.adj[i].dest == Some(province))
            .collect()
    }

    /// The opposing move when two units trade places without convoy.
    fn head_to_head(&self, i: usize) -> Option<usize> {
        let a = &self.adj[i];
        if a.convoyed {
            return None;
        }
        let j = self.lookup[a.dest? as usize]?;
        let b = &self.adj[j];
        (self.is_move(j) && !b.convoyed && b.dest == Some(a.src)).then_some(j)
    }

    /// Resolves a decision, detecting and settling dependency cycles.
    fn resolve_decision(&mut self, nr: usize) -> bool {
        match self.adj[nr].state {
            ResState::Resolved => return self.adj[nr].resolution,
            ResState::Guessing => {
                // Every read of a guess is recorded, repeats included.
                self.deps.push(nr);
                return self.adj[nr].resolution;
            }
            ResState::Unresolved => {}
        }

        let old_count = self.deps.len();

        self.adj[nr].state = ResState::Guessing;
        self.adj[nr].resolution = false;
        let first = self.adjudicate(nr);

        if self.deps.len() == old_count {
            // No guess was consulted.
            if self.adj[nr].state != ResState::Resolved {
                self.adj[nr].state = ResState::Resolved;
                self.adj[nr].resolution = first;
            }
            return first;
        }

        if self.deps[old_count] != nr {
            // Depends on a guess further up the stack; stays provisional.
            self.deps.push(nr);
            self.adj[nr].resolution = first;
            return first;
        }

        self.reset_deps(old_count);
        self.adj[nr].state = ResState::Guessing;
        self.adj[nr].resolution = true;
        let second = self.adjudicate(nr);

        if first == second {
            self.reset_deps(old_count);
            self.adj[nr].state = ResState::Resolved;
            self.adj[nr].resolution = first;
            return first;
        }

        self.backup_rule(old_count);
        self.resolve_decision(nr)
    }

    fn reset_deps(&mut self, old_count: usize) {
        for k in old_count..self.deps.len() {
            let i = self.deps[k];
            self.adj[i].state = ResState::Unresolved;
        }
        self.deps.truncate(old_count);
    }

    /// Settles an ambiguous cycle.
    ///
    /// Cycles through a convoy are convoy paradoxes: every convoyed move whose
    /// convoy is part of the cycle fails as disrupted. Other cycles are
    /// circular movement and every move in them succeeds.
    fn backup_rule(&mut self, old_count: usize) {
        let cycle: Vec<usize> = self.deps.drain(old_count..).collect();

        let mut routes: Vec<(Province, Option<Province>)> = Vec::new();
        for &i in &cycle {
            let a = &self.adj[i];
            if let (Order::Convoy { .. }, Some(from)) = (a.order, a.aux_from) {
                routes.push((from, a.aux_to));
            }
        }

        for &i in &cycle {
            self.adj[i].state = ResState::Unresolved;
        }

        let mut cycle_provinces: Vec<Province> = cycle.iter().map(|&i| self.adj[i].src).collect();
        cycle_provinces.sort();
        cycle_provinces.dedup();

        if routes.is_empty() {
            for &i in &cycle {
                if self.is_move(i) {
                    self.adj[i].state = ResState::Resolved;
                    self.adj[i].resolution = true;
                }
            }
            debug!(cycle = %join(&cycle_provinces), "circular movement, all moves succeed");
            return;
        }

        let mut disrupted = Vec::new();
        for i in 0..self.adj.len() {
            let a = self.adj[i];
            if self.is_move(i) && a.convoyed && routes.contains(&(a.src, a.dest)) {
                self.adj[i].disrupted = true;
                self.adj[i].state = ResState::Resolved;
                self.adj[i].resolution = false;
                disrupted.push(a.src);
            }
        }
        disrupted.sort();
        disrupted.dedup();
        warn!(
            cycle = %join(&cycle_provinces),
            disrupted = %join(&disrupted),
            "convoy paradox, convoyed moves disrupted"
        );
        self.paradoxes.push(Paradox { cycle: cycle_provinces, disrupted });
    }

    fn adjudicate(&mut self, i: usize) -> bool {
        let a = self.adj[i];
        if a.void || a.unmatched {
            return true;
        }
        match a.order {
            Order::Move { .. } => self.adjudicate_move(i),
            Order::SupportHold { .. } | Order::SupportMove { .. } => self.adjudicate_support(i),
            Order::Convoy { .. } => !self.is_dislodged(i),
            _ => true,
        }
    }

    fn adjudicate_move(&mut self, i: usize) -> bool {
        if !self.path_ok(i) {
            return false;
        }
        let Some(dest) = self.adj[i].dest else {
            return false;
        };

        let attack = self.attack_strength(i);
        match self.head_to_head(i) {
            Some(j) => {
                if attack <= self.defend_strength(j) {
                    return false;
                }
            }
            None => {
                if attack <= self.hold_strength(dest) {
                    return false;
                }
            }
        }

        for j in self.moves_into(dest) {
            if j != i && attack <= self.prevent_strength(j) {
                return false;
            }
        }
        true
    }

    fn adjudicate_support(&mut self, i: usize) -> bool {
        let a = self.adj[i];
        for j in self.moves_into(a.src) {
            let attacker = self.adj[j];
            if attacker.power == a.power {
                continue;
            }
            // The unit the support is aimed at can only break it by dislodging.
            let from_target = matches!(a.order, Order::SupportMove { .. }) && a.aux_to == Some(attacker.src);
            if !from_target && self.path_ok(j) {
                return false;
            }
        }
        !self.is_dislodged(i)
    }

    fn is_dislodged(&mut self, i: usize) -> bool {
        let src = self.adj[i].src;
        self.moves_into(src).into_iter().any(|j| self.resolve_decision(j))
    }

    fn path_ok(&mut self, i: usize) -> bool {
        let a = self.adj[i];
        if !a.convoyed {
            return true;
        }
        if a.disrupted {
            return false;
        }
        let Some(dest) = a.dest else {
            return false;
        };
        convoy_path_exists(a.src, dest, |sea| self.convoys_through(sea, a.src, dest))
    }

    fn convoys_through(&mut self, sea: Province, from: Province, to: Province) -> bool {
        match self.lookup[sea as usize] {
            Some(j) => {
                let c = self.adj[j];
                matches!(c.order, Order::Convoy { .. })
                    && !c.unmatched
                    && c.aux_from == Some(from)
                    && c.aux_to == Some(to)
                    && self.resolve_decision(j)
            }
            None => false,
        }
    }

    /// Successful supports for move `i`, ignoring those from `exclude`.
    fn support_count(&mut self, i: usize, exclude: Option<Power>) -> u8 {
        let (src, dest) = (self.adj[i].src, self.adj[i].dest);
        let mut count = 0;
        for k in 0..self.adj.len() {
            let s = self.adj[k];
            if s.void
                || s.unmatched
                || !matches!(s.order, Order::SupportMove { .. })
                || s.aux_from != Some(src)
                || s.aux_to != dest
                || Some(s.power) == exclude
            {
                continue;
            }
            if self.resolve_decision(k) {
                count += 1;
            }
        }
        count
    }

    fn attack_strength(&mut self, i: usize) -> u8 {
        if !self.path_ok(i) {
            return 0;
        }
        let a = self.adj[i];
        let Some(dest) = a.dest else {
            return 0;
        };

        let defender = match self.lookup[dest as usize] {
            Some(j) => {
                let stays = self.head_to_head(i).is_some() || !self.is_move(j) || !self.resolve_decision(j);
                stays.then_some(self.adj[j].power)
            }
            None => None,
        };

        match defender {
            Some(p) if p == a.power => 0,
            Some(p) => 1 + self.support_count(i, Some(p)),
            None => 1 + self.support_count(i, None),
        }
    }

    fn hold_strength(&mut self, province: Province) -> u8 {
        let Some(j) = self.lookup[province as usize] else {
            return 0;
        };
        if self.is_move(j) {
            return if self.resolve_decision(j) { 0 } else { 1 };
        }

        let mut strength = 1;
        for k in 0..self.adj.len() {
            let s = self.adj[k];
            if s.void || s.unmatched || !matches!(s.order, Order::SupportHold { .. }) || s.aux_from != Some(province)
            {
                continue;
            }
            if self.resolve_decision(k) {
                strength += 1;
            }
        }
        strength
    }

    fn defend_strength(&mut self, i: usize) -> u8 {
        1 + self.support_count(i, None)
    }

    fn prevent_strength(&mut self, i: usize) -> u8 {
        if !self.path_ok(i) {
            return 0;
        }
        if let Some(j) = self.head_to_head(i) {
            if self.resolve_decision(j) {
                return 0;
            }
        }
        1 + self.support_count(i, None)
    }

    fn build_resolution(&mut self) -> Resolution {
        let mut arrival: [Option<usize>; PROVINCE_COUNT] = [None; PROVINCE_COUNT];
        for i in 0..self.adj.len() {
            if self.is_move(i) && self.adj[i].resolution {
                if let Some(dest) = self.adj[i].dest {
                    arrival[dest as usize] = Some(i);
                }
            }
        }

        let mut dislodged_at = [false; PROVINCE_COUNT];
        let mut dislodged = Vec::new();
        for i in 0..self.adj.len() {
            let a = self.adj[i];
            if a.void || (self.is_move(i) && a.resolution) {
                continue;
            }
            if let Some(attacker) = arrival[a.src as usize] {
                dislodged_at[a.src as usize] = true;
                dislodged.push(DislodgedUnit {
                    power: a.power,
                    unit_type: a.unit_type,
                    province: a.src,
                    coast: a.coast,
                    attacker_from: self.adj[attacker].src,
                    by_convoy: self.adj[attacker].convoyed,
                });
            }
        }

        let mut orders = Vec::with_capacity(self.adj.len());
        for i in 0..self.adj.len() {
            let a = self.adj[i];
            let was_dislodged = !a.void && dislodged_at[a.src as usize];
            let result = if a.void {
                OrderResult::Void
            } else {
                match a.order {
                    Order::Move { .. } if a.resolution => OrderResult::Succeeded,
                    _ if was_dislodged => OrderResult::Dislodged,
                    _ if a.unmatched => OrderResult::Void,
                    Order::Move { .. } => {
                        if self.path_ok(i) {
                            OrderResult::Bounced
                        } else {
                            OrderResult::Disrupted
                        }
                    }
                    Order::SupportHold { .. } | Order::SupportMove { .. } => {
                        if a.resolution {
                            OrderResult::Succeeded
                        } else {
                            OrderResult::Cut
                        }
                    }
                    Order::Convoy { .. } => {
                        let army = a.aux_from.and_then(|p| self.lookup[p as usize]);
                        match army {
                            Some(j) if !self.path_ok(j) => OrderResult::Failed,
                            _ => OrderResult::Succeeded,
                        }
                    }
                    _ => OrderResult::Succeeded,
                }
            };
            let strength = (self.is_move(i)).then(|| self.attack_strength(i));
            orders.push(ResolvedOrder { order: a.order, power: a.power, result, strength });
        }

        let mut standoffs = Vec::new();
        for prov in ALL_PROVINCES {
            let idx = prov as usize;
            if arrival[idx].is_some() {
                continue;
            }
            let vacant = match self.lookup[idx] {
                Some(j) => self.is_move(j) && self.adj[j].resolution,
                None => true,
            };
            // A head-to-head loser prevents nothing.
            let bounced = self.moves_into(prov).into_iter().any(|j| self.prevent_strength(j) > 0);
            if vacant && bounced {
                standoffs.push(prov);
            }
        }

        Resolution { orders, dislodged, standoffs, paradoxes: std::mem::take(&mut self.paradoxes) }
    }
}

/// Creates a resolver, resolves, and returns the outcome.
///
/// With `strict` set, a convoy paradox becomes an error instead of being
/// settled by disruption.
pub fn resolve_orders(
    orders: &[(Order, Power)],
    state: &BoardState,
    strict: bool,
) -> Result<Resolution, ParadoxError> {
    let resolution = Resolver::new(orders.len()).resolve(orders, state);
    if strict {
        if let Some(p) = resolution.paradoxes.first() {
            return Err(ParadoxError { phase: state.phase, provinces: p.cycle.clone() });
        }
    }
    Ok(resolution)
}

/// Produces the board after a movement phase.
///
/// Dislodged units leave the map and await retreat; successful moves are
/// applied simultaneously, so rotations need no ordering. Stand-offs are
/// recorded for the retreat phase. The phase itself is not advanced.
pub fn apply_resolution(state: &BoardState, resolution: &Resolution) -> Result<BoardState, InvariantViolation> {
    let mut next = state.clone();
    next.clear_retreat_state();

    for d in &resolution.dislodged {
        next.remove_unit(d.province);
        next.set_dislodged(
            d.province,
            BoardDislodged {
                power: d.power,
                unit_type: d.unit_type,
                coast: d.coast,
                attacker_from: d.attacker_from,
                by_convoy: d.by_convoy,
            },
        );
    }

    let mut arriving = Vec::new();
    for ro in &resolution.orders {
        if ro.result != OrderResult::Succeeded {
            continue;
        }
        if let Order::Move { unit, dest, .. } = ro.order {
            if let Some((power, unit_type)) = next.remove_unit(unit.province()) {
                let coast = if unit_type == UnitType::Fleet { dest.coast } else { Coast::None };
                arriving.push((dest.province, power, unit_type, coast));
            }
        }
    }

    for (province, power, unit_type, coast) in arriving {
        if !next.place_unit(province, power, unit_type, coast) {
            return Err(InvariantViolation::DoubleOccupancy { phase: state.phase, province });
        }
    }

    for &p in &resolution.standoffs {
        next.contested[p as usize] = true;
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Location;

    fn empty_state() -> BoardState {
        BoardState::empty(PhaseId::spring(1901))
    }

    fn army(province: Province) -> OrderUnit {
        OrderUnit::new(UnitType::Army, Location::new(province))
    }

    fn fleet(province: Province) -> OrderUnit {
        OrderUnit::new(UnitType::Fleet, Location::new(province))
    }

    fn mv(unit: OrderUnit, dest: Province) -> Order {
        Order::Move { unit, dest: Location::new(dest), via_convoy: false }
    }

    fn place(state: &mut BoardState, power: Power, unit: OrderUnit) {
        state.place_unit(unit.province(), power, unit.unit_type, unit.location.coast);
    }

    fn run(state: &BoardState, orders: &[(Order, Power)]) -> Resolution {
        for (order, power) in orders {
            if let Some(unit) = order.unit() {
                assert_eq!(state.units[unit.province() as usize].map(|u| u.0), Some(*power), "{}", order);
            }
        }
        Resolver::default().resolve(orders, state)
    }

    #[test]
    fn lone_move_succeeds_with_strength_one() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        let r = run(&state, &[(mv(army(Province::Mun), Province::Boh), Power::Germany)]);
        assert_eq!(r.orders[0].result, OrderResult::Succeeded);
        assert_eq!(r.orders[0].strength, Some(1));
        assert!(r.dislodged.is_empty());
        assert!(r.standoffs.is_empty());
    }

    #[test]
    fn equal_strength_standoff() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Austria, army(Province::Vie));
        let r = run(
            &state,
            &[
                (mv(army(Province::Mun), Province::Boh), Power::Germany),
                (mv(army(Province::Vie), Province::Boh), Power::Austria),
            ],
        );
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Bounced));
        assert_eq!(r.result_at(Province::Vie), Some(OrderResult::Bounced));
        assert_eq!(r.standoffs, vec![Province::Boh]);
    }

    #[test]
    fn unordered_units_hold() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Austria, army(Province::Tyr));
        let r = run(&state, &[(mv(army(Province::Mun), Province::Tyr), Power::Germany)]);
        assert_eq!(r.orders.len(), 2);
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Bounced));
        assert_eq!(r.result_at(Province::Tyr), Some(OrderResult::Succeeded));
        assert!(r.standoffs.is_empty());
    }

    #[test]
    fn orders_for_foreign_or_missing_units_are_void() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        let r = Resolver::default().resolve(
            &[
                (mv(army(Province::Mun), Province::Boh), Power::France),
                (mv(army(Province::Ber), Province::Kie), Power::Germany),
            ],
            &state,
        );
        assert_eq!(r.orders[0].result, OrderResult::Void);
        assert_eq!(r.orders[1].result, OrderResult::Void);
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Succeeded));
    }

    #[test]
    fn supported_attack_dislodges() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Germany, army(Province::Boh));
        place(&mut state, Power::Austria, army(Province::Tyr));
        let r = run(
            &state,
            &[
                (mv(army(Province::Mun), Province::Tyr), Power::Germany),
                (
                    Order::SupportMove {
                        unit: army(Province::Boh),
                        supported: army(Province::Mun),
                        dest: Location::new(Province::Tyr),
                    },
                    Power::Germany,
                ),
                (Order::Hold { unit: army(Province::Tyr) }, Power::Austria),
            ],
        );
        assert_eq!(r.orders[0].strength, Some(2));
        assert_eq!(r.result_at(Province::Tyr), Some(OrderResult::Dislodged));
        assert_eq!(r.dislodged.len(), 1);
        assert_eq!(r.dislodged[0].attacker_from, Province::Mun);
        assert!(!r.dislodged[0].by_convoy);
    }

    #[test]
    fn no_self_dislodgement() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Germany, army(Province::Boh));
        place(&mut state, Power::Germany, army(Province::Tyr));
        let r = run(
            &state,
            &[
                (mv(army(Province::Mun), Province::Tyr), Power::Germany),
                (
                    Order::SupportMove {
                        unit: army(Province::Boh),
                        supported: army(Province::Mun),
                        dest: Location::new(Province::Tyr),
                    },
                    Power::Germany,
                ),
            ],
        );
        assert_eq!(r.orders[0].strength, Some(0));
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Bounced));
        assert!(r.dislodged.is_empty());
    }

    #[test]
    fn support_cut_except_by_target() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Ber));
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Russia, army(Province::Sil));
        place(&mut state, Power::Russia, army(Province::Pru));
        let support = Order::SupportMove {
            unit: army(Province::Ber),
            supported: army(Province::Mun),
            dest: Location::new(Province::Sil),
        };
        // Attack from the supported-against province only dislodges, never cuts.
        let r = run(
            &state,
            &[
                (mv(army(Province::Mun), Province::Sil), Power::Germany),
                (support, Power::Germany),
                (mv(army(Province::Sil), Province::Ber), Power::Russia),
            ],
        );
        assert_eq!(r.result_at(Province::Ber), Some(OrderResult::Succeeded));
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Succeeded));
        assert_eq!(r.result_at(Province::Sil), Some(OrderResult::Dislodged));

        // Attack from elsewhere cuts.
        let r = run(
            &state,
            &[
                (mv(army(Province::Mun), Province::Sil), Power::Germany),
                (support, Power::Germany),
                (mv(army(Province::Pru), Province::Ber), Power::Russia),
            ],
        );
        assert_eq!(r.result_at(Province::Ber), Some(OrderResult::Cut));
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Bounced));
    }

    #[test]
    fn support_for_unordered_move_is_void() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Germany, army(Province::Ber));
        let r = run(
            &state,
            &[(
                Order::SupportMove {
                    unit: army(Province::Ber),
                    supported: army(Province::Mun),
                    dest: Location::new(Province::Sil),
                },
                Power::Germany,
            )],
        );
        assert_eq!(r.result_at(Province::Ber), Some(OrderResult::Void));
    }

    #[test]
    fn three_army_rotation() {
        let mut state = empty_state();
        place(&mut state, Power::Turkey, fleet(Province::Ank));
        place(&mut state, Power::Turkey, army(Province::Con));
        place(&mut state, Power::Turkey, army(Province::Smy));
        let orders = [
            (mv(fleet(Province::Ank), Province::Con), Power::Turkey),
            (mv(army(Province::Con), Province::Smy), Power::Turkey),
            (mv(army(Province::Smy), Province::Ank), Power::Turkey),
        ];
        let r = run(&state, &orders);
        assert!(r.orders.iter().all(|o| o.result == OrderResult::Succeeded));

        let next = apply_resolution(&state, &r).unwrap();
        assert_eq!(next.units[Province::Con as usize], Some((Power::Turkey, UnitType::Fleet)));
        assert_eq!(next.units[Province::Smy as usize], Some((Power::Turkey, UnitType::Army)));
        assert_eq!(next.units[Province::Ank as usize], Some((Power::Turkey, UnitType::Army)));
    }

    #[test]
    fn rotation_broken_by_bounce() {
        let mut state = empty_state();
        place(&mut state, Power::Turkey, fleet(Province::Ank));
        place(&mut state, Power::Turkey, army(Province::Con));
        place(&mut state, Power::Turkey, army(Province::Smy));
        place(&mut state, Power::Turkey, army(Province::Bul));
        let r = run(
            &state,
            &[
                (mv(fleet(Province::Ank), Province::Con), Power::Turkey),
                (mv(army(Province::Con), Province::Smy), Power::Turkey),
                (mv(army(Province::Smy), Province::Ank), Power::Turkey),
                (mv(army(Province::Bul), Province::Con), Power::Turkey),
            ],
        );
        assert!(r.orders.iter().all(|o| o.result == OrderResult::Bounced));
    }

    #[test]
    fn head_to_head_stronger_side_wins() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Germany, army(Province::Boh));
        place(&mut state, Power::Austria, army(Province::Tyr));
        let r = run(
            &state,
            &[
                (mv(army(Province::Mun), Province::Tyr), Power::Germany),
                (
                    Order::SupportMove {
                        unit: army(Province::Boh),
                        supported: army(Province::Mun),
                        dest: Location::new(Province::Tyr),
                    },
                    Power::Germany,
                ),
                (mv(army(Province::Tyr), Province::Mun), Power::Austria),
            ],
        );
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Succeeded));
        assert_eq!(r.result_at(Province::Tyr), Some(OrderResult::Dislodged));
        assert!(r.standoffs.is_empty());
    }

    #[test]
    fn dislodged_unit_still_causes_standoff() {
        let mut state = empty_state();
        place(&mut state, Power::Austria, army(Province::Vie));
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Italy, army(Province::Tyr));
        place(&mut state, Power::Italy, army(Province::Tri));
        let r = run(
            &state,
            &[
                (mv(army(Province::Vie), Province::Boh), Power::Austria),
                (mv(army(Province::Mun), Province::Boh), Power::Germany),
                (mv(army(Province::Tyr), Province::Vie), Power::Italy),
                (
                    Order::SupportMove {
                        unit: army(Province::Tri),
                        supported: army(Province::Tyr),
                        dest: Location::new(Province::Vie),
                    },
                    Power::Italy,
                ),
            ],
        );
        assert_eq!(r.result_at(Province::Mun), Some(OrderResult::Bounced));
        assert_eq!(r.result_at(Province::Vie), Some(OrderResult::Dislodged));
        assert_eq!(r.standoffs, vec![Province::Boh]);
    }

    #[test]
    fn simple_convoy() {
        let mut state = empty_state();
        place(&mut state, Power::England, army(Province::Lon));
        place(&mut state, Power::England, fleet(Province::Nth));
        let r = run(
            &state,
            &[
                (mv(army(Province::Lon), Province::Nwy), Power::England),
                (
                    Order::Convoy {
                        unit: fleet(Province::Nth),
                        convoyed_from: Location::new(Province::Lon),
                        convoyed_to: Location::new(Province::Nwy),
                    },
                    Power::England,
                ),
            ],
        );
        assert_eq!(r.result_at(Province::Lon), Some(OrderResult::Succeeded));
        assert_eq!(r.result_at(Province::Nth), Some(OrderResult::Succeeded));
    }

    #[test]
    fn dislodged_convoy_disrupts() {
        let mut state = empty_state();
        place(&mut state, Power::England, army(Province::Lon));
        place(&mut state, Power::England, fleet(Province::Nth));
        place(&mut state, Power::France, fleet(Province::Eng));
        place(&mut state, Power::France, fleet(Province::Bel));
        let r = run(
            &state,
            &[
                (mv(army(Province::Lon), Province::Nwy), Power::England),
                (
                    Order::Convoy {
                        unit: fleet(Province::Nth),
                        convoyed_from: Location::new(Province::Lon),
                        convoyed_to: Location::new(Province::Nwy),
                    },
                    Power::England,
                ),
                (mv(fleet(Province::Eng), Province::Nth), Power::France),
                (
                    Order::SupportMove {
                        unit: fleet(Province::Bel),
                        supported: fleet(Province::Eng),
                        dest: Location::new(Province::Nth),
                    },
                    Power::France,
                ),
            ],
        );
        assert_eq!(r.result_at(Province::Lon), Some(OrderResult::Disrupted));
        assert_eq!(r.result_at(Province::Nth), Some(OrderResult::Dislodged));
        assert_eq!(r.orders[0].strength, Some(0));
        let next = apply_resolution(&state, &r).unwrap();
        assert_eq!(next.units[Province::Lon as usize], Some((Power::England, UnitType::Army)));
    }

    #[test]
    fn pandin_paradox_disrupts_convoy() {
        // Convoyed army attacks the supporter of the attack on its own convoy.
        let mut state = empty_state();
        place(&mut state, Power::France, army(Province::Bre));
        place(&mut state, Power::France, fleet(Province::Eng));
        place(&mut state, Power::England, fleet(Province::Lon));
        place(&mut state, Power::England, fleet(Province::Wal));
        let orders = [
            (mv(army(Province::Bre), Province::Lon), Power::France),
            (
                Order::Convoy {
                    unit: fleet(Province::Eng),
                    convoyed_from: Location::new(Province::Bre),
                    convoyed_to: Location::new(Province::Lon),
                },
                Power::France,
            ),
            (
                Order::SupportMove {
                    unit: fleet(Province::Lon),
                    supported: fleet(Province::Wal),
                    dest: Location::new(Province::Eng),
                },
                Power::England,
            ),
            (mv(fleet(Province::Wal), Province::Eng), Power::England),
        ];
        let r = run(&state, &orders);
        assert_eq!(r.paradoxes.len(), 1);
        assert_eq!(r.paradoxes[0].disrupted, vec![Province::Bre]);
        assert_eq!(r.result_at(Province::Bre), Some(OrderResult::Disrupted));
        assert_eq!(r.result_at(Province::Lon), Some(OrderResult::Succeeded));
        assert_eq!(r.result_at(Province::Wal), Some(OrderResult::Succeeded));
        assert_eq!(r.result_at(Province::Eng), Some(OrderResult::Dislodged));

        let err = resolve_orders(&orders, &state, true).unwrap_err();
        assert_eq!(err.phase, PhaseId::spring(1901));
        assert!(err.provinces.contains(&Province::Eng));
        assert!(resolve_orders(&orders, &state, false).is_ok());
    }

    #[test]
    fn paradox_with_two_equal_attacks_bounces_both() {
        let mut state = empty_state();
        place(&mut state, Power::France, army(Province::Bre));
        place(&mut state, Power::France, fleet(Province::Eng));
        place(&mut state, Power::England, fleet(Province::Lon));
        place(&mut state, Power::England, fleet(Province::Wal));
        place(&mut state, Power::Germany, fleet(Province::Nth));
        place(&mut state, Power::Germany, fleet(Province::Bel));
        let orders = [
            (mv(army(Province::Bre), Province::Lon), Power::France),
            (
                Order::Convoy {
                    unit: fleet(Province::Eng),
                    convoyed_from: Location::new(Province::Bre),
                    convoyed_to: Location::new(Province::Lon),
                },
                Power::France,
            ),
            (
                Order::SupportMove {
                    unit: fleet(Province::Lon),
                    supported: fleet(Province::Wal),
                    dest: Location::new(Province::Eng),
                },
                Power::England,
            ),
            (mv(fleet(Province::Wal), Province::Eng), Power::England),
            (
                Order::SupportMove {
                    unit: fleet(Province::Nth),
                    supported: fleet(Province::Bel),
                    dest: Location::new(Province::Eng),
                },
                Power::Germany,
            ),
            (mv(fleet(Province::Bel), Province::Eng), Power::Germany),
        ];
        let r = run(&state, &orders);
        assert_eq!(r.paradoxes.len(), 1);
        assert_eq!(r.result_at(Province::Bre), Some(OrderResult::Disrupted));
        assert_eq!(r.result_at(Province::Wal), Some(OrderResult::Bounced));
        assert_eq!(r.result_at(Province::Bel), Some(OrderResult::Bounced));
        assert_eq!(r.orders[3].strength, r.orders[5].strength);
        assert!(r.dislodged.is_empty());
        assert!(resolve_orders(&orders, &state, true).is_err());
    }

    #[test]
    fn apply_records_standoffs_and_dislodgements() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        place(&mut state, Power::Germany, army(Province::Boh));
        place(&mut state, Power::Austria, army(Province::Tyr));
        place(&mut state, Power::Italy, army(Province::Ven));
        place(&mut state, Power::Austria, army(Province::Tri));
        let r = run(
            &state,
            &[
                (mv(army(Province::Mun), Province::Tyr), Power::Germany),
                (
                    Order::SupportMove {
                        unit: army(Province::Boh),
                        supported: army(Province::Mun),
                        dest: Location::new(Province::Tyr),
                    },
                    Power::Germany,
                ),
                (mv(army(Province::Ven), Province::Pie), Power::Italy),
                (mv(army(Province::Tri), Province::Ven), Power::Austria),
            ],
        );
        let next = apply_resolution(&state, &r).unwrap();
        assert_eq!(next.units[Province::Tyr as usize], Some((Power::Germany, UnitType::Army)));
        assert!(next.units[Province::Mun as usize].is_none());
        assert_eq!(next.dislodged[Province::Tyr as usize].map(|d| d.attacker_from), Some(Province::Mun));
        assert_eq!(next.units[Province::Ven as usize], Some((Power::Austria, UnitType::Army)));
        assert!(next.has_dislodged());
    }

    #[test]
    fn resolver_can_be_reused() {
        let mut state = empty_state();
        place(&mut state, Power::Germany, army(Province::Mun));
        let mut resolver = Resolver::new(4);
        let a = resolver.resolve(&[(mv(army(Province::Mun), Province::Boh), Power::Germany)], &state);
        let b = resolver.resolve(&[(Order::Hold { unit: army(Province::Mun) }, Power::Germany)], &state);
        assert_eq!(a.orders[0].result, OrderResult::Succeeded);
        assert_eq!(b.orders.len(), 1);
        assert_eq!(b.orders[0].result, OrderResult::Succeeded);
    }
}
