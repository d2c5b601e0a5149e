//! Adjustment-phase resolution.
//!
//! Builds are capped at each power's surplus of centers over units, with a
//! waive using up one slot. Powers owing disbands that did not order enough
//! lose the units farthest from home.

use crate::board::{BoardState, Coast, Order, Power, Province, UnitType, ALL_POWERS, PROVINCE_COUNT};
use crate::disorder::civil_disorder_disbands;
use crate::error::InvariantViolation;
use crate::movegen::build::adjustment_delta;
use crate::movegen::validate_order;

use super::kruijswijk::{OrderResult, ResolvedOrder};

/// Resolves adjustment orders for all powers.
///
/// Results follow input order, then civil-disorder disbands per power.
/// Illegal and over-quota orders are `Failed`; a second build in the same
/// center or a second disband of the same unit is `Void`.
pub fn resolve_builds(orders: &[(Order, Power)], state: &BoardState) -> Vec<ResolvedOrder> {
    let mut used = [0usize; 7];
    let mut touched = [false; PROVINCE_COUNT];
    let mut disbanded: [Vec<Province>; 7] = Default::default();

    let mut results: Vec<ResolvedOrder> = orders
        .iter()
        .map(|&(submitted, power)| {
            let delta = adjustment_delta(power, state);
            let quota = delta.unsigned_abs() as usize;
            let (order, result) = match validate_order(power, &submitted, state) {
                Err(_) => (submitted, OrderResult::Failed),
                Ok(order) if used[power.index()] >= quota => (order, OrderResult::Failed),
                Ok(order) => match order.province() {
                    Some(p) if touched[p as usize] => (order, OrderResult::Void),
                    province => {
                        if let Some(p) = province {
                            touched[p as usize] = true;
                            if matches!(order, Order::Disband { .. }) {
                                disbanded[power.index()].push(p);
                            }
                        }
                        used[power.index()] += 1;
                        (order, OrderResult::Succeeded)
                    }
                },
            };
            ResolvedOrder { order, power, result, strength: None }
        })
        .collect();

    for power in ALL_POWERS {
        let delta = adjustment_delta(power, state);
        if delta >= 0 {
            continue;
        }
        let owed = delta.unsigned_abs() as usize - used[power.index()];
        for order in civil_disorder_disbands(power, owed, state, &disbanded[power.index()]) {
            results.push(ResolvedOrder { order, power, result: OrderResult::Succeeded, strength: None });
        }
    }

    results
}

/// Produces the board after an adjustment phase.
pub fn apply_builds(state: &BoardState, results: &[ResolvedOrder]) -> Result<BoardState, InvariantViolation> {
    let mut next = state.clone();
    next.clear_retreat_state();

    for r in results {
        if r.result != OrderResult::Succeeded {
            continue;
        }
        match r.order {
            Order::Build { unit } => {
                let province = unit.province();
                let coast = if unit.unit_type == UnitType::Fleet { unit.location.coast } else { Coast::None };
                if !next.place_unit(province, r.power, unit.unit_type, coast) {
                    return Err(InvariantViolation::DoubleOccupancy { phase: state.phase, province });
                }
            }
            Order::Disband { unit } => {
                next.remove_unit(unit.province());
            }
            _ => {}
        }
    }

    for power in ALL_POWERS {
        let (units, centers) = (next.unit_count(power), next.center_count(power));
        let owed_disbands = state.unit_count(power) > centers;
        if units > centers || (owed_disbands && units != centers) {
            return Err(InvariantViolation::AdjustmentMismatch { power, units, centers });
        }
    }
    Ok(next)
}
