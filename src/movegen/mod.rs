//! Legal order generation and checking.
//!
//! Enumerates the orders available to each power in the current phase,
//! validates submitted orders, and picks random legal orders for
//! simulations.

pub mod build;
pub mod movement;
pub mod retreat;
pub mod validate;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{BoardState, Order, PhaseKind, Power, Province};

pub use validate::{is_legal, parse_order_for, validate_order, LegalityError};

/// Provinces where `power` has something to order this phase.
///
/// Movement: every unit. Retreat: every dislodged unit. Adjustment: every
/// vacant owned home center when building, every unit when disbanding.
pub fn orderable_locations(power: Power, state: &BoardState) -> Vec<Province> {
    match state.phase.kind {
        PhaseKind::Movement => state.units_of(power).map(|u| u.location.province).collect(),
        PhaseKind::Retreat => state
            .dislodged_units()
            .filter(|(_, d)| d.power == power)
            .map(|(p, _)| p)
            .collect(),
        PhaseKind::Adjustment => {
            let mut provinces: Vec<Province> =
                build::legal_builds(power, state).iter().filter_map(Order::province).collect();
            provinces.dedup();
            provinces
        }
    }
}

/// Every legal order for the unit (or build site) at `province`.
pub fn possible_orders(province: Province, state: &BoardState) -> Vec<Order> {
    match state.phase.kind {
        PhaseKind::Movement => movement::legal_orders(province, state),
        PhaseKind::Retreat => retreat::legal_retreats(province, state),
        PhaseKind::Adjustment => {
            let owner = state.units[province as usize]
                .map(|(p, _)| p)
                .or_else(|| province.home_power());
            match owner {
                Some(power) => build::legal_builds(power, state)
                    .into_iter()
                    .filter(|o| o.province() == Some(province))
                    .collect(),
                None => Vec::new(),
            }
        }
    }
}

/// Generates a set of random legal orders for the given power.
///
/// Movement and retreat phases get one order per unit; adjustment phases
/// get exactly as many builds (or waives) or disbands as the center count
/// requires.
pub fn random_orders(power: Power, state: &BoardState, rng: &mut impl Rng) -> Vec<Order> {
    match state.phase.kind {
        PhaseKind::Movement | PhaseKind::Retreat => orderable_locations(power, state)
            .into_iter()
            .filter_map(|prov| possible_orders(prov, state).choose(rng).copied())
            .collect(),
        PhaseKind::Adjustment => random_adjustments(power, state, rng),
    }
}

fn random_adjustments(power: Power, state: &BoardState, rng: &mut impl Rng) -> Vec<Order> {
    let delta = build::adjustment_delta(power, state);
    let mut options = build::legal_builds(power, state);

    if delta < 0 {
        let count = delta.unsigned_abs() as usize;
        options.shuffle(rng);
        options.truncate(count);
        return options;
    }

    let mut orders = Vec::new();
    for _ in 0..delta {
        let available: Vec<Order> = options
            .iter()
            .copied()
            .filter(|o| match o {
                Order::Build { unit } => !orders.iter().any(|chosen: &Order| chosen.province() == Some(unit.province())),
                _ => true,
            })
            .collect();
        orders.push(available.choose(rng).copied().unwrap_or(Order::Waive));
    }
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coast, DislodgedUnit, PhaseId, Season, UnitType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn one_movement_order_per_unit() {
        let state = BoardState::standard(1901);
        let orders = random_orders(Power::Russia, &state, &mut seeded_rng());
        assert_eq!(orders.len(), 4);
        for order in &orders {
            assert!(is_legal(Power::Russia, order, &state), "{}", order);
        }
    }

    #[test]
    fn same_seed_same_orders() {
        let state = BoardState::standard(1901);
        let a = random_orders(Power::France, &state, &mut StdRng::seed_from_u64(7));
        let b = random_orders(Power::France, &state, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn retreat_orders_for_dislodged_only() {
        let mut state = BoardState::empty(PhaseId::new(1901, Season::Fall, PhaseKind::Retreat));
        state.place_unit(Province::Vie, Power::Austria, UnitType::Army, Coast::None);
        state.set_dislodged(
            Province::Ser,
            DislodgedUnit {
                power: Power::Austria,
                unit_type: UnitType::Army,
                coast: Coast::None,
                attacker_from: Province::Bul,
                by_convoy: false,
            },
        );
        assert_eq!(orderable_locations(Power::Austria, &state), vec![Province::Ser]);
        assert_eq!(random_orders(Power::Austria, &state, &mut seeded_rng()).len(), 1);
    }

    #[test]
    fn adjustment_counts() {
        let mut state = BoardState::empty(PhaseId::new(1901, Season::Winter, PhaseKind::Adjustment));
        for p in [Province::Vie, Province::Bud, Province::Tri] {
            state.set_sc_owner(p, Some(Power::Austria));
        }
        state.place_unit(Province::Vie, Power::Austria, UnitType::Army, Coast::None);
        let builds = random_orders(Power::Austria, &state, &mut seeded_rng());
        assert_eq!(builds.len(), 2);
        assert_eq!(orderable_locations(Power::Austria, &state), vec![Province::Bud, Province::Tri]);

        state.set_sc_owner(Province::Bud, None);
        state.set_sc_owner(Province::Tri, None);
        state.place_unit(Province::Bud, Power::Austria, UnitType::Army, Coast::None);
        state.place_unit(Province::Tri, Power::Austria, UnitType::Fleet, Coast::None);
        let disbands = random_orders(Power::Austria, &state, &mut seeded_rng());
        assert_eq!(disbands.len(), 2);
        assert!(disbands.iter().all(|o| matches!(o, Order::Disband { .. })));
    }

    #[test]
    fn possible_orders_by_phase() {
        let state = BoardState::standard(1901);
        assert!(possible_orders(Province::Vie, &state).len() > 5);
        assert!(possible_orders(Province::Boh, &state).is_empty());
    }
}
