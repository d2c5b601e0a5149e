//! Civil-disorder fallback orders.
//!
//! Units left without orders are driven by a static distance table: for
//! every power, unit type and location, the number of moves to the nearest
//! home supply center. The data lives in [`tables`] and is only re-indexed
//! into `Location::index()` order on first use, so every fallback is a pure
//! function of the board.

mod tables;

use std::sync::LazyLock;

use tracing::debug;

use crate::board::{
    fleet_coasts_to, provinces_adjacent_to, BoardState, Location, Order, OrderUnit, PhaseKind, Power, Province,
    Season, UnitType, ALL_POWERS, ALL_UNIT_TYPES, LOCATION_COUNT,
};

/// Table entry for a location the unit type can never stand on or reach.
pub const UNREACHABLE: u8 = u8::MAX;

/// Hop distances indexed by power, unit type and location index.
pub struct DistanceTable {
    dists: [[[u8; LOCATION_COUNT]; 2]; 7],
}

impl DistanceTable {
    fn load() -> Self {
        let mut dists = [[[UNREACHABLE; LOCATION_COUNT]; 2]; 7];
        for (column, abbr) in tables::SOURCE_LOCATIONS.iter().enumerate() {
            let Some(loc) = Location::from_abbr(abbr) else {
                continue;
            };
            for power in ALL_POWERS {
                let row = &mut dists[power.index()];
                row[UnitType::Army.index()][loc.index()] = tables::ARMY[power.index()][column];
                row[UnitType::Fleet.index()][loc.index()] = tables::FLEET[power.index()][column];
            }
        }
        DistanceTable { dists }
    }

    /// Raw entry, `UNREACHABLE` included.
    pub fn raw(&self, power: Power, unit_type: UnitType, location: Location) -> u8 {
        self.dists[power.index()][unit_type.index()][location.index()]
    }

    pub fn get(&self, power: Power, unit_type: UnitType, location: Location) -> Option<u8> {
        let d = self.raw(power, unit_type, location);
        (d != UNREACHABLE).then_some(d)
    }
}

pub static DISTANCES: LazyLock<DistanceTable> = LazyLock::new(DistanceTable::load);

/// Moves from `location` to the nearest home center of `power`.
pub fn distance(power: Power, unit_type: UnitType, location: Location) -> Option<u8> {
    DISTANCES.get(power, unit_type, location)
}

/// The order a unit receives when its power sent none.
///
/// Movement: the adjacent move that gets strictly closer to home without
/// walking into a province held by the same power; ties go to the lowest
/// location index. Hold when nothing improves, and in Fall on a supply
/// center the power does not own yet. Retreat: disband. No unit or an
/// adjustment phase gives `None`.
pub fn default_order(power: Power, province: Province, state: &BoardState) -> Option<Order> {
    match state.phase.kind {
        PhaseKind::Movement => {
            let unit = state.unit_at(province).filter(|u| u.power == power)?;
            let here = OrderUnit::new(unit.unit_type, unit.location);
            let capturing = state.phase.season == Season::Fall
                && province.is_supply_center()
                && state.sc_owner[province as usize] != Some(power);
            let step = if capturing { None } else { best_move(power, unit.unit_type, unit.location, state) };
            let order = match step {
                Some(dest) => Order::Move { unit: here, dest, via_convoy: false },
                None => Order::Hold { unit: here },
            };
            debug!(%power, %order, "civil disorder");
            Some(order)
        }
        PhaseKind::Retreat => {
            let d = state.dislodged[province as usize].filter(|d| d.power == power)?;
            let unit = OrderUnit::new(d.unit_type, Location::with_coast(province, d.coast));
            Some(Order::Disband { unit })
        }
        PhaseKind::Adjustment => None,
    }
}

fn best_move(power: Power, unit_type: UnitType, from: Location, state: &BoardState) -> Option<Location> {
    let current = distance(power, unit_type, from)?;
    let is_fleet = unit_type == UnitType::Fleet;

    let mut candidates = Vec::new();
    for dest in provinces_adjacent_to(from.province, from.coast, is_fleet) {
        if !unit_type.can_occupy(dest.province_type()) {
            continue;
        }
        if matches!(state.units[dest as usize], Some((p, _)) if p == power) {
            continue;
        }
        if is_fleet && dest.has_coasts() {
            for coast in fleet_coasts_to(from.province, from.coast, dest) {
                candidates.push(Location::with_coast(dest, coast));
            }
        } else {
            candidates.push(Location::new(dest));
        }
    }

    candidates
        .into_iter()
        .filter_map(|loc| distance(power, unit_type, loc).map(|d| (d, loc.index(), loc)))
        .filter(|&(d, _, _)| d < current)
        .min_by_key(|&(d, idx, _)| (d, idx))
        .map(|(_, _, loc)| loc)
}

/// Disbands for a power that owes `count` more than it ordered.
///
/// Farthest from home goes first, then fleets before armies, then the
/// highest location index. Units in `already` are skipped.
pub fn civil_disorder_disbands(power: Power, count: usize, state: &BoardState, already: &[Province]) -> Vec<Order> {
    let mut ranked: Vec<(u8, bool, usize, OrderUnit)> = state
        .units_of(power)
        .filter(|u| !already.contains(&u.location.province))
        .map(|u| {
            let dist = DISTANCES.raw(power, u.unit_type, u.location);
            (dist, u.unit_type == UnitType::Fleet, u.location.index(), OrderUnit::new(u.unit_type, u.location))
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(b.2.cmp(&a.2)));

    let orders: Vec<Order> = ranked.into_iter().take(count).map(|(_, _, _, unit)| Order::Disband { unit }).collect();
    if !orders.is_empty() {
        debug!(%power, count = orders.len(), "civil disorder disbands");
    }
    orders
}

/// Sanity view used by tests and the CLI: distances for every unit type.
pub fn distances_at(power: Power, location: Location) -> [Option<u8>; 2] {
    ALL_UNIT_TYPES.map(|ut| distance(power, ut, location))
}
