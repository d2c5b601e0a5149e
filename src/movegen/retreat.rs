//! Retreat-phase order generation.

use crate::board::{
    fleet_coasts_to, provinces_adjacent_to, BoardState, Location, Order, OrderUnit, Province,
    UnitType,
};

/// Generates all legal retreat-phase orders for a dislodged unit at the given province.
///
/// Disband is always first. A retreat may target an adjacent province that is
/// empty, was not left empty by a stand-off, and is not where the attacker
/// came from (unless the attacker was convoyed).
///
/// Returns an empty vec if no dislodged unit exists at the province.
pub fn legal_retreats(province: Province, state: &BoardState) -> Vec<Order> {
    let dislodged = match state.dislodged[province as usize] {
        Some(d) => d,
        None => return Vec::new(),
    };

    let is_fleet = dislodged.unit_type == UnitType::Fleet;
    let unit = OrderUnit::new(dislodged.unit_type, Location::with_coast(province, dislodged.coast));
    let mut orders = vec![Order::Disband { unit }];

    for dest in provinces_adjacent_to(province, dislodged.coast, is_fleet) {
        let idx = dest as usize;
        let blocked = !dislodged.unit_type.can_occupy(dest.province_type())
            || state.units[idx].is_some()
            || state.contested[idx]
            || (dest == dislodged.attacker_from && !dislodged.by_convoy);
        if blocked {
            continue;
        }

        if is_fleet && dest.has_coasts() {
            for coast in fleet_coasts_to(province, dislodged.coast, dest) {
                orders.push(Order::Retreat { unit, dest: Location::with_coast(dest, coast) });
            }
        } else {
            orders.push(Order::Retreat { unit, dest: Location::new(dest) });
        }
    }

    orders
}
