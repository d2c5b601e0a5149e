//! Movement-phase order generation.
//!
//! Enumerates legal hold, move (direct and convoyed), support, and convoy
//! orders for a unit during a movement phase.

use crate::board::{
    adjacency::sea_neighbors, fleet_coasts_to, is_adjacent, neighbors, provinces_adjacent_to,
    BoardState, Coast, Location, Order, OrderUnit, Province, ProvinceType, UnitType,
    PROVINCE_COUNT,
};

use super::validate::fleet_at_sea;

/// Seas connected to `sea` through fleet-occupied seas, `sea` included.
pub(crate) fn fleet_component(sea: Province, state: &BoardState) -> Vec<Province> {
    let mut visited = [false; PROVINCE_COUNT];
    visited[sea as usize] = true;
    let mut component = vec![sea];
    let mut i = 0;
    while i < component.len() {
        for next in sea_neighbors(component[i]) {
            if !visited[next as usize] && fleet_at_sea(state, next) {
                visited[next as usize] = true;
                component.push(next);
            }
        }
        i += 1;
    }
    component
}

/// Coastal provinces bordering any sea of `component`, in province order.
pub(crate) fn shore_of(component: &[Province]) -> Vec<Province> {
    let mut shore: Vec<Province> = component
        .iter()
        .flat_map(|&sea| neighbors(sea))
        .filter(|p| p.province_type() == ProvinceType::Coastal)
        .collect();
    shore.sort();
    shore.dedup();
    shore
}

/// Provinces an army at `from` could reach by convoy with the fleets now at sea.
pub fn convoy_destinations(from: Province, state: &BoardState) -> Vec<Province> {
    if from.province_type() != ProvinceType::Coastal {
        return Vec::new();
    }
    let mut dests: Vec<Province> = sea_neighbors(from)
        .filter(|&sea| fleet_at_sea(state, sea))
        .flat_map(|sea| shore_of(&fleet_component(sea, state)))
        .filter(|&p| p != from)
        .collect();
    dests.sort();
    dests.dedup();
    dests
}

/// Provinces the unit could move into, direct or by convoy.
fn reachable_provinces(unit: &OrderUnit, state: &BoardState) -> Vec<Province> {
    let is_fleet = unit.unit_type == UnitType::Fleet;
    let mut out: Vec<Province> = provinces_adjacent_to(unit.location.province, unit.location.coast, is_fleet)
        .into_iter()
        .filter(|p| unit.unit_type.can_occupy(p.province_type()))
        .collect();
    if !is_fleet {
        out.extend(convoy_destinations(unit.location.province, state));
        out.sort();
        out.dedup();
    }
    out
}

/// Generates all legal movement-phase orders for the unit at the given province.
///
/// Returns an empty vec if no unit exists at that province.
pub fn legal_orders(province: Province, state: &BoardState) -> Vec<Order> {
    let unit = match state.unit_at(province) {
        Some(u) => OrderUnit::new(u.unit_type, u.location),
        None => return Vec::new(),
    };

    let mut orders = vec![Order::Hold { unit }];
    generate_moves(&unit, state, &mut orders);
    generate_supports(&unit, state, &mut orders);
    if unit.unit_type == UnitType::Fleet && province.province_type() == ProvinceType::Sea {
        generate_convoys(&unit, state, &mut orders);
    }
    orders
}

fn generate_moves(unit: &OrderUnit, state: &BoardState, orders: &mut Vec<Order>) {
    let from = unit.location;
    match unit.unit_type {
        UnitType::Fleet => {
            for dest in provinces_adjacent_to(from.province, from.coast, true) {
                if dest.has_coasts() {
                    for coast in fleet_coasts_to(from.province, from.coast, dest) {
                        orders.push(Order::Move {
                            unit: *unit,
                            dest: Location::with_coast(dest, coast),
                            via_convoy: false,
                        });
                    }
                } else {
                    orders.push(Order::Move { unit: *unit, dest: Location::new(dest), via_convoy: false });
                }
            }
        }
        UnitType::Army => {
            for dest in provinces_adjacent_to(from.province, Coast::None, false) {
                orders.push(Order::Move { unit: *unit, dest: Location::new(dest), via_convoy: false });
            }
            for dest in convoy_destinations(from.province, state) {
                // Adjacent destinations need VIA to be routed by convoy.
                let via_convoy = is_adjacent(from.province, Coast::None, dest, Coast::None, false);
                orders.push(Order::Move { unit: *unit, dest: Location::new(dest), via_convoy });
            }
        }
    }
}

fn generate_supports(unit: &OrderUnit, state: &BoardState, orders: &mut Vec<Order>) {
    let own = unit.location.province;
    // Support never travels by convoy.
    let direct: Vec<Province> =
        provinces_adjacent_to(own, unit.location.coast, unit.unit_type == UnitType::Fleet)
            .into_iter()
            .filter(|p| unit.unit_type.can_occupy(p.province_type()))
            .collect();

    for other in state.units() {
        let other_prov = other.location.province;
        if other_prov == own {
            continue;
        }
        let supported = OrderUnit::new(other.unit_type, other.location);

        if direct.contains(&other_prov) {
            orders.push(Order::SupportHold { unit: *unit, supported });
        }

        for dest in reachable_provinces(&supported, state) {
            if dest == own || !direct.contains(&dest) {
                continue;
            }
            orders.push(Order::SupportMove { unit: *unit, supported, dest: Location::new(dest) });
        }
    }
}

fn generate_convoys(unit: &OrderUnit, state: &BoardState, orders: &mut Vec<Order>) {
    let shore = shore_of(&fleet_component(unit.location.province, state));
    for &army_prov in &shore {
        if !matches!(state.units[army_prov as usize], Some((_, UnitType::Army))) {
            continue;
        }
        for &dest in &shore {
            if dest == army_prov {
                continue;
            }
            orders.push(Order::Convoy {
                unit: *unit,
                convoyed_from: Location::new(army_prov),
                convoyed_to: Location::new(dest),
            });
        }
    }
}
