//! Retreat-phase resolution.
//!
//! Dislodged units either retreat or disband. Two retreats into the same
//! province both fail and both units are removed. Dislodged units without a
//! legal order disband.

use crate::board::{BoardState, Coast, Location, Order, OrderUnit, Power, UnitType, PROVINCE_COUNT};
use crate::error::InvariantViolation;
use crate::movegen::validate_order;

use super::kruijswijk::{OrderResult, ResolvedOrder};

/// Resolves retreat-phase orders.
///
/// Results come back in input order followed by the implicit disbands of
/// unordered units. Illegal orders are `Failed` and their unit disbands;
/// orders repeating an already ordered unit are `Void`.
pub fn resolve_retreats(orders: &[(Order, Power)], state: &BoardState) -> Vec<ResolvedOrder> {
    let mut ordered = [false; PROVINCE_COUNT];
    let mut legal = Vec::with_capacity(orders.len());
    for &(order, power) in orders {
        let checked = validate_order(power, &order, state).ok();
        let province = checked.as_ref().and_then(Order::province);
        let duplicate = province.is_some_and(|p| ordered[p as usize]);
        if let Some(p) = province {
            ordered[p as usize] = true;
        }
        legal.push(if duplicate { Err(OrderResult::Void) } else { checked.ok_or(OrderResult::Failed) });
    }

    let mut arrivals = [0u8; PROVINCE_COUNT];
    for order in legal.iter().flatten() {
        if let Order::Retreat { dest, .. } = order {
            arrivals[dest.province as usize] += 1;
        }
    }

    let mut results: Vec<ResolvedOrder> = orders
        .iter()
        .zip(legal)
        .map(|(&(submitted, power), checked)| {
            let (order, result) = match checked {
                Ok(order @ Order::Retreat { dest, .. }) if arrivals[dest.province as usize] > 1 => {
                    (order, OrderResult::Bounced)
                }
                Ok(order) => (order, OrderResult::Succeeded),
                Err(result) => (submitted, result),
            };
            ResolvedOrder { order, power, result, strength: None }
        })
        .collect();

    for (province, d) in state.dislodged_units() {
        if !ordered[province as usize] {
            let unit = OrderUnit::new(d.unit_type, Location::with_coast(province, d.coast));
            results.push(ResolvedOrder {
                order: Order::Disband { unit },
                power: d.power,
                result: OrderResult::Succeeded,
                strength: None,
            });
        }
    }

    results
}

/// Produces the board after a retreat phase: successful retreats land and
/// every other dislodged unit is gone.
pub fn apply_retreats(state: &BoardState, results: &[ResolvedOrder]) -> Result<BoardState, InvariantViolation> {
    let mut next = state.clone();
    next.clear_retreat_state();

    for r in results {
        if r.result != OrderResult::Succeeded {
            continue;
        }
        if let Order::Retreat { unit, dest } = r.order {
            let coast = if unit.unit_type == UnitType::Fleet { dest.coast } else { Coast::None };
            if !next.place_unit(dest.province, r.power, unit.unit_type, coast) {
                return Err(InvariantViolation::DoubleOccupancy { phase: state.phase, province: dest.province });
            }
        }
    }
    Ok(next)
}
