//! Order legality checking.
//!
//! `validate_order` checks a parsed order against the board and returns
//! it in normalized form: the ordered unit carries its board coast, army
//! destinations drop any coast, and a fleet destination on a split
//! province gets its coast filled in when only one is reachable.

use thiserror::Error;

use crate::board::{
    adjacency::convoy_path_exists, fleet_coasts_to, is_adjacent, provinces_adjacent_to,
    BoardState, Coast, Location, Order, OrderUnit, PhaseKind, Power, Province, ProvinceType,
    UnitType,
};
use crate::protocol::dson::{parse_order, DsonError};

use super::movement::{fleet_component, shore_of};

/// Why an order was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LegalityError {
    #[error("cannot parse order: {0}")]
    Parse(#[from] DsonError),

    #[error("{power} has been eliminated")]
    FactionEliminated { power: Power },

    #[error("{kind} orders are not accepted in a {phase:?} phase")]
    WrongPhase { kind: &'static str, phase: PhaseKind },

    #[error("no {unit_type:?} at {location}")]
    NoUnit { unit_type: UnitType, location: Location },

    #[error("the unit at {location} belongs to {owner}, not {power}")]
    NotOwner { power: Power, owner: Power, location: Location },

    #[error("{from} is not adjacent to {to}")]
    NotAdjacent { from: Location, to: Location },

    #[error("a unit cannot move to its own province {0}")]
    MoveToSelf(Province),

    #[error("no chain of fleets can convoy {from} to {to}")]
    NoConvoyPath { from: Province, to: Province },

    #[error("only armies can be convoyed")]
    FleetConvoyed,

    #[error("a {unit_type:?} cannot occupy {location}")]
    CannotOccupy { unit_type: UnitType, location: Location },

    #[error("{location} has more than one coast reachable, one must be named")]
    AmbiguousCoast { location: Location },

    #[error("the unit at {supporter} cannot reach {target}")]
    SupportUnreachable { supporter: Location, target: Province },

    #[error("a unit cannot support itself")]
    SupportSelf,

    #[error("the unit at {unit} cannot move to {dest}")]
    SupportedMoveImpossible { unit: Location, dest: Province },

    #[error("only fleets at sea can convoy, not the unit at {0}")]
    ConvoyNotAtSea(Location),

    #[error("{from} and {to} must both be coastal for a convoy")]
    ConvoyNotCoastal { from: Province, to: Province },

    #[error("the unit at {0} was not dislodged")]
    NotDislodged(Location),

    #[error("cannot retreat into occupied {0}")]
    RetreatToOccupied(Province),

    #[error("cannot retreat into {0}, left empty by a stand-off")]
    RetreatToStandoff(Province),

    #[error("cannot retreat into {0}, where the attacker came from")]
    RetreatToAttackerOrigin(Province),

    #[error("{0} is not a home supply center of the ordering power")]
    BuildNotHomeCenter(Province),

    #[error("{0} is not currently owned by the ordering power")]
    BuildCenterNotOwned(Province),

    #[error("{0} is occupied")]
    BuildOccupied(Province),

    #[error("{power} has no builds available")]
    NoBuildsAvailable { power: Power },

    #[error("{power} has no units to remove")]
    NoDisbandsRequired { power: Power },
}

/// Parses DSON text and validates it for `power`.
pub fn parse_order_for(power: Power, text: &str, state: &BoardState) -> Result<Order, LegalityError> {
    let order = parse_order(text)?;
    validate_order(power, &order, state)
}

/// Whether `order` is legal for `power` on `state`.
pub fn is_legal(power: Power, order: &Order, state: &BoardState) -> bool {
    validate_order(power, order, state).is_ok()
}

/// Checks `order` for `power` and returns it normalized.
pub fn validate_order(power: Power, order: &Order, state: &BoardState) -> Result<Order, LegalityError> {
    if state.is_eliminated(power) {
        return Err(LegalityError::FactionEliminated { power });
    }

    let phase = state.phase.kind;
    let accepted = match order {
        Order::Hold { .. }
        | Order::Move { .. }
        | Order::SupportHold { .. }
        | Order::SupportMove { .. }
        | Order::Convoy { .. } => phase == PhaseKind::Movement,
        Order::Retreat { .. } => phase == PhaseKind::Retreat,
        Order::Disband { .. } => phase != PhaseKind::Movement,
        Order::Build { .. } | Order::Waive => phase == PhaseKind::Adjustment,
    };
    if !accepted {
        return Err(LegalityError::WrongPhase { kind: order.kind(), phase });
    }

    match phase {
        PhaseKind::Movement => validate_movement(power, order, state),
        PhaseKind::Retreat => validate_retreat(power, order, state),
        PhaseKind::Adjustment => validate_adjustment(power, order, state),
    }
}

/// Resolves an order's unit reference against the board.
///
/// A fleet on a split province may be named without its coast.
fn board_unit(unit: &OrderUnit, state: &BoardState) -> Result<(Power, OrderUnit), LegalityError> {
    let province = unit.location.province;
    let missing = || LegalityError::NoUnit { unit_type: unit.unit_type, location: unit.location };
    let (owner, unit_type) = state.units[province as usize].ok_or_else(missing)?;
    let location = state.location_of(province);
    if unit_type != unit.unit_type || (unit.location.coast != Coast::None && unit.location != location) {
        return Err(missing());
    }
    Ok((owner, OrderUnit::new(unit_type, location)))
}

fn owned_unit(power: Power, unit: &OrderUnit, state: &BoardState) -> Result<OrderUnit, LegalityError> {
    let (owner, unit) = board_unit(unit, state)?;
    if owner != power {
        return Err(LegalityError::NotOwner { power, owner, location: unit.location });
    }
    Ok(unit)
}

/// Whether the unit could move into `target` by adjacency, ignoring coasts.
fn can_reach(unit: &OrderUnit, target: Province) -> bool {
    unit.unit_type.can_occupy(target.province_type())
        && provinces_adjacent_to(
            unit.location.province,
            unit.location.coast,
            unit.unit_type == UnitType::Fleet,
        )
        .contains(&target)
}

/// Whether a sea province holds a fleet that could take part in a convoy.
pub(crate) fn fleet_at_sea(state: &BoardState, sea: Province) -> bool {
    sea.province_type() == ProvinceType::Sea
        && matches!(state.units[sea as usize], Some((_, UnitType::Fleet)))
}

/// Normalizes an adjacent (non-convoyed) destination for `unit`.
fn adjacent_destination(unit: &OrderUnit, dest: Location) -> Result<Location, LegalityError> {
    let from = unit.location;
    if dest.province == from.province {
        return Err(LegalityError::MoveToSelf(dest.province));
    }
    if !unit.unit_type.can_occupy(dest.province_type()) {
        return Err(LegalityError::CannotOccupy { unit_type: unit.unit_type, location: dest });
    }
    let not_adjacent = || LegalityError::NotAdjacent { from, to: dest };

    match unit.unit_type {
        UnitType::Army => {
            if is_adjacent(from.province, Coast::None, dest.province, Coast::None, false) {
                Ok(dest.base())
            } else {
                Err(not_adjacent())
            }
        }
        UnitType::Fleet => {
            let coasts = fleet_coasts_to(from.province, from.coast, dest.province);
            if !dest.province.has_coasts() {
                return if coasts.is_empty() { Err(not_adjacent()) } else { Ok(dest) };
            }
            match dest.coast {
                Coast::None => match coasts.as_slice() {
                    [] => Err(not_adjacent()),
                    [only] => Ok(Location::with_coast(dest.province, *only)),
                    _ => Err(LegalityError::AmbiguousCoast { location: dest }),
                },
                c if coasts.contains(&c) => Ok(dest),
                _ => Err(not_adjacent()),
            }
        }
    }
}

/// Normalizes a move destination, allowing convoy routes for armies.
fn move_destination(
    unit: &OrderUnit,
    dest: Location,
    via_convoy: bool,
    state: &BoardState,
) -> Result<Location, LegalityError> {
    let direct = adjacent_destination(unit, dest);
    if unit.unit_type == UnitType::Fleet {
        return if via_convoy { Err(LegalityError::FleetConvoyed) } else { direct };
    }
    match &direct {
        Ok(_) if !via_convoy => return direct,
        Err(LegalityError::MoveToSelf(_) | LegalityError::CannotOccupy { .. }) => return direct,
        _ => {}
    }

    let from = unit.location.province;
    if convoy_path_exists(from, dest.province, |sea| fleet_at_sea(state, sea)) {
        return Ok(dest.base());
    }
    let both_coastal =
        from.province_type() == ProvinceType::Coastal && dest.province_type() == ProvinceType::Coastal;
    if both_coastal || via_convoy {
        Err(LegalityError::NoConvoyPath { from, to: dest.province })
    } else {
        direct
    }
}

fn validate_movement(power: Power, order: &Order, state: &BoardState) -> Result<Order, LegalityError> {
    match *order {
        Order::Hold { unit } => Ok(Order::Hold { unit: owned_unit(power, &unit, state)? }),

        Order::Move { unit, dest, via_convoy } => {
            let unit = owned_unit(power, &unit, state)?;
            let dest = move_destination(&unit, dest, via_convoy, state)?;
            Ok(Order::Move { unit, dest, via_convoy })
        }

        Order::SupportHold { unit, supported } => {
            let unit = owned_unit(power, &unit, state)?;
            let (_, supported) = board_unit(&supported, state)?;
            if supported.location.province == unit.location.province {
                return Err(LegalityError::SupportSelf);
            }
            let target = supported.location.province;
            if !can_reach(&unit, target) {
                return Err(LegalityError::SupportUnreachable { supporter: unit.location, target });
            }
            Ok(Order::SupportHold { unit, supported })
        }

        Order::SupportMove { unit, supported, dest } => {
            let unit = owned_unit(power, &unit, state)?;
            let (_, supported) = board_unit(&supported, state)?;
            if supported.location.province == unit.location.province {
                return Err(LegalityError::SupportSelf);
            }
            let target = dest.province;
            if target == unit.location.province || !can_reach(&unit, target) {
                return Err(LegalityError::SupportUnreachable { supporter: unit.location, target });
            }
            let plausible = match supported.unit_type {
                UnitType::Fleet => !fleet_coasts_to(supported.location.province, supported.location.coast, target)
                    .is_empty(),
                UnitType::Army => {
                    target != supported.location.province
                        && (can_reach(&supported, target)
                            || convoy_path_exists(supported.location.province, target, |sea| {
                                fleet_at_sea(state, sea)
                            }))
                }
            };
            if !plausible {
                return Err(LegalityError::SupportedMoveImpossible { unit: supported.location, dest: target });
            }
            Ok(Order::SupportMove { unit, supported, dest: dest.base() })
        }

        Order::Convoy { unit, convoyed_from, convoyed_to } => {
            let unit = owned_unit(power, &unit, state)?;
            if unit.unit_type != UnitType::Fleet || unit.location.province_type() != ProvinceType::Sea {
                return Err(LegalityError::ConvoyNotAtSea(unit.location));
            }
            let army = OrderUnit::new(UnitType::Army, convoyed_from.base());
            board_unit(&army, state)?;
            let (from, to) = (convoyed_from.province, convoyed_to.province);
            if from == to {
                return Err(LegalityError::MoveToSelf(from));
            }
            if from.province_type() != ProvinceType::Coastal || to.province_type() != ProvinceType::Coastal {
                return Err(LegalityError::ConvoyNotCoastal { from, to });
            }
            let shore = shore_of(&fleet_component(unit.location.province, state));
            if !shore.contains(&from) || !shore.contains(&to) {
                return Err(LegalityError::NoConvoyPath { from, to });
            }
            Ok(Order::Convoy { unit, convoyed_from: convoyed_from.base(), convoyed_to: convoyed_to.base() })
        }

        _ => Err(LegalityError::WrongPhase { kind: order.kind(), phase: PhaseKind::Movement }),
    }
}

fn validate_retreat(power: Power, order: &Order, state: &BoardState) -> Result<Order, LegalityError> {
    let unit = match order.unit() {
        Some(u) => u,
        None => return Err(LegalityError::WrongPhase { kind: order.kind(), phase: PhaseKind::Retreat }),
    };
    let province = unit.location.province;
    let dislodged = state.dislodged[province as usize]
        .filter(|d| d.unit_type == unit.unit_type)
        .ok_or(LegalityError::NotDislodged(unit.location))?;
    if dislodged.power != power {
        return Err(LegalityError::NotOwner { power, owner: dislodged.power, location: unit.location });
    }
    let unit = OrderUnit::new(dislodged.unit_type, Location::with_coast(province, dislodged.coast));

    match *order {
        Order::Disband { .. } => Ok(Order::Disband { unit }),
        Order::Retreat { dest, .. } => {
            let dest = adjacent_destination(&unit, dest)?;
            let target = dest.province;
            if state.units[target as usize].is_some() {
                return Err(LegalityError::RetreatToOccupied(target));
            }
            if state.contested[target as usize] {
                return Err(LegalityError::RetreatToStandoff(target));
            }
            if target == dislodged.attacker_from && !dislodged.by_convoy {
                return Err(LegalityError::RetreatToAttackerOrigin(target));
            }
            Ok(Order::Retreat { unit, dest })
        }
        _ => Err(LegalityError::WrongPhase { kind: order.kind(), phase: PhaseKind::Retreat }),
    }
}

fn validate_adjustment(power: Power, order: &Order, state: &BoardState) -> Result<Order, LegalityError> {
    let surplus = state.center_count(power) as i64 - state.unit_count(power) as i64;

    match *order {
        Order::Waive => {
            if surplus <= 0 {
                return Err(LegalityError::NoBuildsAvailable { power });
            }
            Ok(Order::Waive)
        }

        Order::Build { unit } => {
            if surplus <= 0 {
                return Err(LegalityError::NoBuildsAvailable { power });
            }
            let province = unit.location.province;
            if province.home_power() != Some(power) {
                return Err(LegalityError::BuildNotHomeCenter(province));
            }
            if state.sc_owner[province as usize] != Some(power) {
                return Err(LegalityError::BuildCenterNotOwned(province));
            }
            if state.units[province as usize].is_some() {
                return Err(LegalityError::BuildOccupied(province));
            }
            let location = match unit.unit_type {
                UnitType::Army => unit.location.base(),
                UnitType::Fleet if province.has_coasts() && unit.location.coast == Coast::None => {
                    return Err(LegalityError::AmbiguousCoast { location: unit.location });
                }
                UnitType::Fleet => unit.location,
            };
            if !location.admits(unit.unit_type) {
                return Err(LegalityError::CannotOccupy { unit_type: unit.unit_type, location });
            }
            Ok(Order::Build { unit: OrderUnit::new(unit.unit_type, location) })
        }

        Order::Disband { unit } => {
            if surplus >= 0 {
                return Err(LegalityError::NoDisbandsRequired { power });
            }
            Ok(Order::Disband { unit: owned_unit(power, &unit, state)? })
        }

        _ => Err(LegalityError::WrongPhase { kind: order.kind(), phase: PhaseKind::Adjustment }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{DislodgedUnit, PhaseId, Season};
    use crate::protocol::dfen::parse_dfen;

    fn standard() -> BoardState {
        BoardState::standard(1901)
    }

    fn check(power: Power, text: &str, state: &BoardState) -> Result<String, LegalityError> {
        parse_order_for(power, text, state).map(|o| o.to_string())
    }

    #[test]
    fn simple_moves() {
        let s = standard();
        assert_eq!(check(Power::Austria, "A vie - gal", &s).unwrap(), "A vie - gal");
        assert_eq!(check(Power::Austria, "A vie H", &s).unwrap(), "A vie H");
        assert!(matches!(
            check(Power::Austria, "A vie - ven", &s),
            Err(LegalityError::NotAdjacent { .. })
        ));
        assert!(matches!(
            check(Power::Austria, "F tri - tyr", &s),
            Err(LegalityError::CannotOccupy { .. })
        ));
        assert_eq!(check(Power::Austria, "A vie - vie", &s), Err(LegalityError::MoveToSelf(Province::Vie)));
    }

    #[test]
    fn ownership_and_presence() {
        let s = standard();
        assert!(matches!(
            check(Power::Germany, "A vie - gal", &s),
            Err(LegalityError::NotOwner { owner: Power::Austria, .. })
        ));
        assert!(matches!(check(Power::Austria, "A gal H", &s), Err(LegalityError::NoUnit { .. })));
        assert!(matches!(check(Power::Austria, "F vie H", &s), Err(LegalityError::NoUnit { .. })));
        assert!(matches!(check(Power::Austria, "A vie R gal", &s), Err(LegalityError::WrongPhase { .. })));
    }

    #[test]
    fn fleet_coast_normalization() {
        let s = standard();
        // F stp/sc may be named without its coast.
        assert_eq!(check(Power::Russia, "F stp - bot", &s).unwrap(), "F stp/sc - bot");
        assert_eq!(check(Power::Turkey, "F ank - bla", &s).unwrap(), "F ank - bla");

        let mut s = BoardState::empty(PhaseId::spring(1901));
        s.place_unit(Province::Mao, Power::France, UnitType::Fleet, Coast::None);
        s.place_unit(Province::Gol, Power::France, UnitType::Fleet, Coast::None);
        s.sc_owner[Province::Bre as usize] = Some(Power::France);
        assert!(matches!(
            check(Power::France, "F mao - spa", &s),
            Err(LegalityError::AmbiguousCoast { .. })
        ));
        assert_eq!(check(Power::France, "F mao - spa/nc", &s).unwrap(), "F mao - spa/nc");
        assert_eq!(check(Power::France, "F gol - spa", &s).unwrap(), "F gol - spa/sc");
        assert!(matches!(
            check(Power::France, "F gol - spa/nc", &s),
            Err(LegalityError::NotAdjacent { .. })
        ));
    }

    #[test]
    fn army_moves_ignore_coasts() {
        let mut s = BoardState::empty(PhaseId::spring(1901));
        s.place_unit(Province::Fin, Power::Russia, UnitType::Army, Coast::None);
        assert_eq!(check(Power::Russia, "A fin - stp", &s).unwrap(), "A fin - stp");
        assert_eq!(check(Power::Russia, "A fin - stp/sc", &s).unwrap(), "A fin - stp");
    }

    #[test]
    fn convoyed_moves_need_fleets() {
        let mut s = standard();
        assert_eq!(
            check(Power::England, "A lvp - nwy", &s),
            Err(LegalityError::NoConvoyPath { from: Province::Lvp, to: Province::Nwy })
        );
        s.remove_unit(Province::Edi);
        s.place_unit(Province::Nth, Power::England, UnitType::Fleet, Coast::None);
        s.remove_unit(Province::Lvp);
        s.place_unit(Province::Yor, Power::England, UnitType::Army, Coast::None);
        assert_eq!(check(Power::England, "A yor - nwy", &s).unwrap(), "A yor - nwy");
        assert_eq!(check(Power::England, "A yor - lon VIA", &s).unwrap(), "A yor - lon VIA");
        assert!(matches!(check(Power::England, "A yor - mun", &s), Err(LegalityError::NotAdjacent { .. })));
        assert_eq!(check(Power::England, "F nth - nwy VIA", &s), Err(LegalityError::FleetConvoyed));
        assert_eq!(check(Power::England, "F nth C A yor - nwy", &s).unwrap(), "F nth C A yor - nwy");
        assert!(matches!(
            check(Power::England, "F lon C A yor - nwy", &s),
            Err(LegalityError::ConvoyNotAtSea(_))
        ));
    }

    #[test]
    fn supports() {
        let s = standard();
        assert_eq!(check(Power::Austria, "A vie S A bud - gal", &s).unwrap(), "A vie S A bud - gal");
        assert_eq!(check(Power::Austria, "A vie S A bud H", &s).unwrap(), "A vie S A bud H");
        assert_eq!(check(Power::Austria, "A vie S A bud", &s).unwrap(), "A vie S A bud H");
        assert!(matches!(
            check(Power::Austria, "A vie S F tri - ven", &s),
            Err(LegalityError::SupportUnreachable { .. })
        ));
        assert!(matches!(
            check(Power::Austria, "A vie S A bud - tyr", &s),
            Err(LegalityError::SupportedMoveImpossible { .. })
        ));
        assert_eq!(check(Power::Austria, "A vie S A vie H", &s), Err(LegalityError::SupportSelf));
        // Supporting a foreign unit is legal.
        assert_eq!(check(Power::Germany, "A mun S A vie - tyr", &s).unwrap(), "A mun S A vie - tyr");
    }

    #[test]
    fn retreats() {
        let mut s = BoardState::empty(PhaseId::new(1901, Season::Spring, PhaseKind::Retreat));
        s.place_unit(Province::Ser, Power::Turkey, UnitType::Army, Coast::None);
        s.place_unit(Province::Tri, Power::Italy, UnitType::Army, Coast::None);
        s.set_dislodged(
            Province::Ser,
            DislodgedUnit {
                power: Power::Austria,
                unit_type: UnitType::Army,
                coast: Coast::None,
                attacker_from: Province::Bul,
                by_convoy: false,
            },
        );
        s.contested[Province::Rum as usize] = true;

        assert_eq!(check(Power::Austria, "A ser R alb", &s).unwrap(), "A ser R alb");
        assert_eq!(check(Power::Austria, "A ser D", &s).unwrap(), "A ser D");
        assert_eq!(check(Power::Austria, "A ser R tri", &s), Err(LegalityError::RetreatToOccupied(Province::Tri)));
        assert_eq!(check(Power::Austria, "A ser R rum", &s), Err(LegalityError::RetreatToStandoff(Province::Rum)));
        assert_eq!(
            check(Power::Austria, "A ser R bul", &s),
            Err(LegalityError::RetreatToAttackerOrigin(Province::Bul))
        );
        assert!(matches!(check(Power::Austria, "A ser - alb", &s), Err(LegalityError::WrongPhase { .. })));
        assert!(matches!(check(Power::Turkey, "A ser R alb", &s), Err(LegalityError::NotOwner { .. })));
    }

    #[test]
    fn convoyed_attacker_origin_is_open() {
        let mut s = BoardState::empty(PhaseId::new(1901, Season::Spring, PhaseKind::Retreat));
        s.place_unit(Province::Nwy, Power::England, UnitType::Army, Coast::None);
        s.set_dislodged(
            Province::Nwy,
            DislodgedUnit {
                power: Power::Russia,
                unit_type: UnitType::Army,
                coast: Coast::None,
                attacker_from: Province::Swe,
                by_convoy: true,
            },
        );
        assert_eq!(check(Power::Russia, "A nwy R swe", &s).unwrap(), "A nwy R swe");
    }

    #[test]
    fn builds() {
        let dfen = "1901wa/Aavie,Rfsev/Abud,Atri,Avie,Aser,Rstp,Rsev,Rmos,Rwar/-/-";
        let s = parse_dfen(dfen).unwrap();
        assert_eq!(check(Power::Austria, "A bud B", &s).unwrap(), "A bud B");
        assert_eq!(check(Power::Austria, "F tri B", &s).unwrap(), "F tri B");
        assert_eq!(check(Power::Austria, "W", &s).unwrap(), "W");
        assert_eq!(check(Power::Austria, "A vie B", &s), Err(LegalityError::BuildOccupied(Province::Vie)));
        assert_eq!(check(Power::Austria, "A ser B", &s), Err(LegalityError::BuildNotHomeCenter(Province::Ser)));
        assert!(matches!(check(Power::Austria, "F bud B", &s), Err(LegalityError::CannotOccupy { .. })));
        assert!(matches!(check(Power::Russia, "F stp B", &s), Err(LegalityError::AmbiguousCoast { .. })));
        assert_eq!(check(Power::Russia, "F stp/nc B", &s).unwrap(), "F stp/nc B");
        assert_eq!(check(Power::Russia, "A stp B", &s).unwrap(), "A stp B");
        assert_eq!(
            check(Power::Austria, "A vie D", &s),
            Err(LegalityError::NoDisbandsRequired { power: Power::Austria })
        );
        assert_eq!(check(Power::Turkey, "W", &s), Err(LegalityError::FactionEliminated { power: Power::Turkey }));
    }

    #[test]
    fn builds_need_owned_centers() {
        let s = parse_dfen("1901wa/Aabud/Abud,Atri,Gvie/-/-").unwrap();
        assert_eq!(check(Power::Austria, "A vie B", &s), Err(LegalityError::BuildCenterNotOwned(Province::Vie)));
        assert_eq!(check(Power::Austria, "A tri B", &s).unwrap(), "A tri B");
    }
}
