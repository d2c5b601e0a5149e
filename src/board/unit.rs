//! Unit types and ownership.

use std::fmt;

use super::order::Location;
use super::province::{Power, ProvinceType};

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitType {
    Army,
    Fleet,
}

/// Both unit types, army first.
pub const ALL_UNIT_TYPES: [UnitType; 2] = [UnitType::Army, UnitType::Fleet];

impl UnitType {
    /// Returns the single-character DFEN abbreviation.
    pub const fn dui_char(self) -> char {
        match self {
            UnitType::Army => 'a',
            UnitType::Fleet => 'f',
        }
    }

    /// Returns the uppercase DSON abbreviation used in order notation.
    pub const fn dson_char(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }

    pub fn from_dui_char(c: char) -> Option<UnitType> {
        match c {
            'a' => Some(UnitType::Army),
            'f' => Some(UnitType::Fleet),
            _ => None,
        }
    }

    pub fn from_dson_char(c: char) -> Option<UnitType> {
        match c {
            'A' => Some(UnitType::Army),
            'F' => Some(UnitType::Fleet),
            _ => None,
        }
    }

    /// Whether a unit of this type may stand on the given terrain.
    pub const fn can_occupy(self, terrain: ProvinceType) -> bool {
        !matches!(
            (self, terrain),
            (UnitType::Army, ProvinceType::Sea) | (UnitType::Fleet, ProvinceType::Land)
        )
    }

    /// Index into per-unit-type tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dson_char())
    }
}

/// A unit on the board, as returned by state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    pub unit_type: UnitType,
    pub power: Power,
    pub location: Location,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.unit_type, self.location)
    }
}
