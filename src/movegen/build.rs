//! Adjustment-phase order generation.
//!
//! A power with more supply centers than units may build in its vacant,
//! owned home centers (or waive); a power with more units than centers
//! must disband.

use crate::board::{
    BoardState, Location, Order, OrderUnit, Power, UnitType, ALL_PROVINCES, ALL_UNIT_TYPES,
};

/// Centers minus units; positive means builds, negative means disbands.
pub fn adjustment_delta(power: Power, state: &BoardState) -> i32 {
    state.center_count(power) as i32 - state.unit_count(power) as i32
}

/// Generates all legal adjustment orders for a given power.
///
/// - More SCs than units: builds in unoccupied home SCs plus Waive.
/// - More units than SCs: a disband for every unit.
/// - Equal: no orders needed (empty vec).
pub fn legal_builds(power: Power, state: &BoardState) -> Vec<Order> {
    match adjustment_delta(power, state) {
        d if d > 0 => build_orders(power, state),
        d if d < 0 => legal_disbands(power, state),
        _ => Vec::new(),
    }
}

fn build_orders(power: Power, state: &BoardState) -> Vec<Order> {
    let mut orders = vec![Order::Waive];

    for prov in ALL_PROVINCES {
        let idx = prov as usize;
        if prov.home_power() != Some(power) || state.sc_owner[idx] != Some(power) || state.units[idx].is_some() {
            continue;
        }
        for unit_type in ALL_UNIT_TYPES {
            if !unit_type.can_occupy(prov.province_type()) {
                continue;
            }
            if prov.has_coasts() && unit_type == UnitType::Fleet {
                for &coast in prov.coasts() {
                    let unit = OrderUnit::new(unit_type, Location::with_coast(prov, coast));
                    orders.push(Order::Build { unit });
                }
            } else {
                orders.push(Order::Build { unit: OrderUnit::new(unit_type, Location::new(prov)) });
            }
        }
    }

    orders
}

/// One disband order per unit of `power`, in province order.
pub fn legal_disbands(power: Power, state: &BoardState) -> Vec<Order> {
    state
        .units_of(power)
        .map(|u| Order::Disband { unit: OrderUnit::new(u.unit_type, u.location) })
        .collect()
}
