//! DSON (Diplomacy Standard Order Notation) encoding and decoding.
//!
//! Canonical form: uppercase unit types and actions, lowercase 3-letter
//! province IDs, `/` as the coast separator (`F nrg - stp/nc`). Parsing is
//! case-insensitive and tolerates repeated whitespace, so `A PAR - BUR` and
//! `a par - bur` are both accepted. A trailing `VIA` marks a move that must
//! travel by convoy.

use thiserror::Error;

use crate::board::order::{Location, Order, OrderUnit};
use crate::board::province::{Coast, Province};
use crate::board::unit::UnitType;

/// Errors that can occur when parsing DSON order strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DsonError {
    #[error("empty input")]
    EmptyInput,

    #[error("unknown unit type '{0}'")]
    UnknownUnitType(String),

    #[error("unknown province '{0}'")]
    UnknownProvince(String),

    #[error("unknown coast '{0}'")]
    UnknownCoast(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(String),

    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("trailing input '{0}'")]
    TrailingInput(String),
}

struct Tokens<'a> {
    items: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Tokens { items: s.split_whitespace().collect(), pos: 0 }
    }

    fn next(&mut self, expected: &str) -> Result<&'a str, DsonError> {
        let tok = self
            .items
            .get(self.pos)
            .copied()
            .ok_or_else(|| DsonError::UnexpectedEnd(expected.to_string()))?;
        self.pos += 1;
        Ok(tok)
    }

    fn peek(&self) -> Option<&'a str> {
        self.items.get(self.pos).copied()
    }

    fn expect(&mut self, keyword: &str) -> Result<(), DsonError> {
        let tok = self.next(keyword)?;
        if tok.eq_ignore_ascii_case(keyword) {
            Ok(())
        } else {
            Err(DsonError::UnexpectedToken {
                expected: keyword.to_string(),
                found: tok.to_string(),
            })
        }
    }

    fn finish(&self) -> Result<(), DsonError> {
        match self.items.get(self.pos..) {
            Some(rest) if !rest.is_empty() => Err(DsonError::TrailingInput(rest.join(" "))),
            _ => Ok(()),
        }
    }
}

/// Parses a single DSON order string into an `Order`.
pub fn parse_order(s: &str) -> Result<Order, DsonError> {
    let mut tokens = Tokens::new(s);
    let first = tokens.peek().ok_or(DsonError::EmptyInput)?;

    if first.eq_ignore_ascii_case("W") || first.eq_ignore_ascii_case("WAIVE") {
        tokens.pos += 1;
        tokens.finish()?;
        return Ok(Order::Waive);
    }

    let unit = parse_unit(&mut tokens)?;
    let action = tokens.next("action (H, -, S, C, R, D, B)")?;

    let order = match action.to_ascii_uppercase().as_str() {
        "H" => Order::Hold { unit },

        "-" => {
            let dest = parse_location(&mut tokens)?;
            let via_convoy = match tokens.peek() {
                Some(t) if t.eq_ignore_ascii_case("VIA") => {
                    tokens.pos += 1;
                    true
                }
                _ => false,
            };
            Order::Move { unit, dest, via_convoy }
        }

        "S" => {
            let supported = parse_unit(&mut tokens)?;
            match tokens.peek() {
                // A bare `A tyr S A vie` is a support-hold.
                None => Order::SupportHold { unit, supported },
                Some(t) if t.eq_ignore_ascii_case("H") => {
                    tokens.pos += 1;
                    Order::SupportHold { unit, supported }
                }
                Some("-") => {
                    tokens.pos += 1;
                    let dest = parse_location(&mut tokens)?;
                    Order::SupportMove { unit, supported, dest }
                }
                Some(other) => {
                    return Err(DsonError::UnexpectedToken {
                        expected: "H or -".to_string(),
                        found: other.to_string(),
                    })
                }
            }
        }

        "C" => {
            // Only armies are convoyed.
            tokens.expect("A")?;
            let convoyed_from = parse_location(&mut tokens)?;
            tokens.expect("-")?;
            let convoyed_to = parse_location(&mut tokens)?;
            Order::Convoy { unit, convoyed_from, convoyed_to }
        }

        "R" => Order::Retreat { unit, dest: parse_location(&mut tokens)? },

        "D" => Order::Disband { unit },

        "B" => Order::Build { unit },

        _ => return Err(DsonError::UnknownAction(action.to_string())),
    };

    tokens.finish()?;
    Ok(order)
}

/// Parses a ` ; `-separated list of DSON orders.
pub fn parse_orders(s: &str) -> Result<Vec<Order>, DsonError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DsonError::EmptyInput);
    }
    s.split(';').map(parse_order).collect()
}

/// Formats a single `Order` as a canonical DSON string.
pub fn format_order(order: &Order) -> String {
    match order {
        Order::Hold { unit } => format!("{} H", format_unit(unit)),
        Order::Move { unit, dest, via_convoy } => {
            let via = if *via_convoy { " VIA" } else { "" };
            format!("{} - {}{}", format_unit(unit), dest, via)
        }
        Order::SupportHold { unit, supported } => {
            format!("{} S {} H", format_unit(unit), format_unit(supported))
        }
        Order::SupportMove { unit, supported, dest } => {
            format!("{} S {} - {}", format_unit(unit), format_unit(supported), dest)
        }
        Order::Convoy { unit, convoyed_from, convoyed_to } => {
            format!("{} C A {} - {}", format_unit(unit), convoyed_from, convoyed_to)
        }
        Order::Retreat { unit, dest } => format!("{} R {}", format_unit(unit), dest),
        Order::Disband { unit } => format!("{} D", format_unit(unit)),
        Order::Build { unit } => format!("{} B", format_unit(unit)),
        Order::Waive => "W".to_string(),
    }
}

/// Formats a slice of orders as a ` ; `-separated DSON string.
pub fn format_orders(orders: &[Order]) -> String {
    orders.iter().map(format_order).collect::<Vec<_>>().join(" ; ")
}

fn parse_unit(tokens: &mut Tokens<'_>) -> Result<OrderUnit, DsonError> {
    let tok = tokens.next("unit type (A or F)")?;
    let unit_type = match tok {
        "A" | "a" => UnitType::Army,
        "F" | "f" => UnitType::Fleet,
        other => return Err(DsonError::UnknownUnitType(other.to_string())),
    };
    let location = parse_location(tokens)?;
    Ok(OrderUnit { unit_type, location })
}

fn parse_location(tokens: &mut Tokens<'_>) -> Result<Location, DsonError> {
    let token = tokens.next("province location")?;
    let (prov_str, coast) = match token.split_once('/') {
        Some((prov, coast_str)) => {
            let coast = Coast::from_abbr(coast_str)
                .filter(|c| *c != Coast::None)
                .ok_or_else(|| DsonError::UnknownCoast(coast_str.to_string()))?;
            (prov, coast)
        }
        None => (token, Coast::None),
    };
    let province =
        Province::from_abbr(prov_str).ok_or_else(|| DsonError::UnknownProvince(prov_str.to_string()))?;
    let loc = Location::with_coast(province, coast);
    if !loc.is_valid() {
        return Err(DsonError::UnknownCoast(token.to_string()));
    }
    Ok(loc)
}

fn format_unit(unit: &OrderUnit) -> String {
    format!("{} {}", unit.unit_type.dson_char(), unit.location)
}
