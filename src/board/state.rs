//! Board state and phase identifiers.
//!
//! A `BoardState` is the complete position at one phase: unit placement,
//! supply-center ownership, units awaiting retreat and the stand-off
//! provinces they may not retreat into. Committed states are wrapped in
//! `Arc` by the game history and never mutated afterwards.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::order::Location;
use super::province::{Coast, Power, Province, ALL_PROVINCES, PROVINCE_COUNT};
use super::unit::{Unit, UnitType};

/// The season of a game turn. Adjustment phases happen in Winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring,
    Fall,
    Winter,
}

impl Season {
    /// Returns the single-character DFEN abbreviation.
    pub const fn dfen_char(self) -> char {
        match self {
            Season::Spring => 's',
            Season::Fall => 'f',
            Season::Winter => 'w',
        }
    }

    pub fn from_dfen_char(c: char) -> Option<Season> {
        match c.to_ascii_lowercase() {
            's' => Some(Season::Spring),
            'f' => Some(Season::Fall),
            'w' => Some(Season::Winter),
            _ => None,
        }
    }
}

/// The kind of phase within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhaseKind {
    Movement,
    Retreat,
    Adjustment,
}

impl PhaseKind {
    /// Returns the single-character DFEN abbreviation.
    pub const fn dfen_char(self) -> char {
        match self {
            PhaseKind::Movement => 'm',
            PhaseKind::Retreat => 'r',
            PhaseKind::Adjustment => 'a',
        }
    }

    pub fn from_dfen_char(c: char) -> Option<PhaseKind> {
        match c.to_ascii_lowercase() {
            'm' => Some(PhaseKind::Movement),
            'r' => Some(PhaseKind::Retreat),
            'a' => Some(PhaseKind::Adjustment),
            _ => None,
        }
    }
}

/// Identifies a phase: `S1901M`, `F1901R`, `W1901A`.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseId {
    pub year: u16,
    pub season: Season,
    pub kind: PhaseKind,
}

impl PhaseId {
    pub const fn new(year: u16, season: Season, kind: PhaseKind) -> Self {
        PhaseId { year, season, kind }
    }

    /// The Spring Movement phase of `year`.
    pub const fn spring(year: u16) -> Self {
        PhaseId::new(year, Season::Spring, PhaseKind::Movement)
    }

    /// Conventional short name, e.g. `F1903R`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Parses a short name such as `S1901M` (case-insensitive).
    pub fn from_name(s: &str) -> Option<PhaseId> {
        let s = s.trim();
        if s.len() < 3 || !s.is_ascii() {
            return None;
        }
        let season = Season::from_dfen_char(s.chars().next()?)?;
        let kind = PhaseKind::from_dfen_char(s.chars().last()?)?;
        let year = s[1..s.len() - 1].parse().ok()?;
        let id = PhaseId::new(year, season, kind);
        id.is_well_formed().then_some(id)
    }

    /// Adjustments only happen in Winter and Winter only has adjustments.
    pub fn is_well_formed(&self) -> bool {
        (self.season == Season::Winter) == (self.kind == PhaseKind::Adjustment)
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.season.dfen_char().to_ascii_uppercase(),
            self.year,
            self.kind.dfen_char().to_ascii_uppercase()
        )
    }
}

/// A dislodged unit with information about its attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DislodgedUnit {
    pub power: Power,
    pub unit_type: UnitType,
    pub coast: Coast,
    pub attacker_from: Province,
    /// The attacker arrived by convoy, so retreating to its origin is allowed.
    pub by_convoy: bool,
}

/// Complete board state at a point in time.
///
/// Uses fixed-size arrays indexed by `Province as usize` for O(1) lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub phase: PhaseId,
    /// Unit at each province: Some((power, unit_type)) or None.
    pub units: [Option<(Power, UnitType)>; PROVINCE_COUNT],
    /// Coast for fleet units on split-coast provinces.
    pub fleet_coast: [Option<Coast>; PROVINCE_COUNT],
    /// Supply center owner: None if not an SC or if neutral.
    pub sc_owner: [Option<Power>; PROVINCE_COUNT],
    /// Dislodged units awaiting retreat orders.
    pub dislodged: [Option<DislodgedUnit>; PROVINCE_COUNT],
    /// Provinces left empty by a stand-off in the preceding movement phase.
    pub contested: [bool; PROVINCE_COUNT],
}

impl BoardState {
    /// Creates an empty board state with no units or ownership.
    pub fn empty(phase: PhaseId) -> Self {
        BoardState {
            phase,
            units: [None; PROVINCE_COUNT],
            fleet_coast: [None; PROVINCE_COUNT],
            sc_owner: [None; PROVINCE_COUNT],
            dislodged: [None; PROVINCE_COUNT],
            contested: [false; PROVINCE_COUNT],
        }
    }

    /// The standard opening position in Spring of `year`.
    pub fn standard(year: u16) -> Self {
        use Power::*;
        use Province as P;
        const OPENING: [(Power, UnitType, Province, Coast); 22] = [
            (Austria, UnitType::Army, P::Bud, Coast::None),
            (Austria, UnitType::Fleet, P::Tri, Coast::None),
            (Austria, UnitType::Army, P::Vie, Coast::None),
            (England, UnitType::Fleet, P::Edi, Coast::None),
            (England, UnitType::Fleet, P::Lon, Coast::None),
            (England, UnitType::Army, P::Lvp, Coast::None),
            (France, UnitType::Fleet, P::Bre, Coast::None),
            (France, UnitType::Army, P::Mar, Coast::None),
            (France, UnitType::Army, P::Par, Coast::None),
            (Germany, UnitType::Army, P::Ber, Coast::None),
            (Germany, UnitType::Fleet, P::Kie, Coast::None),
            (Germany, UnitType::Army, P::Mun, Coast::None),
            (Italy, UnitType::Fleet, P::Nap, Coast::None),
            (Italy, UnitType::Army, P::Rom, Coast::None),
            (Italy, UnitType::Army, P::Ven, Coast::None),
            (Russia, UnitType::Army, P::Mos, Coast::None),
            (Russia, UnitType::Fleet, P::Sev, Coast::None),
            (Russia, UnitType::Fleet, P::Stp, Coast::South),
            (Russia, UnitType::Army, P::War, Coast::None),
            (Turkey, UnitType::Fleet, P::Ank, Coast::None),
            (Turkey, UnitType::Army, P::Con, Coast::None),
            (Turkey, UnitType::Army, P::Smy, Coast::None),
        ];

        let mut state = BoardState::empty(PhaseId::spring(year));
        for (power, unit_type, province, coast) in OPENING {
            state.place_unit(province, power, unit_type, coast);
        }
        for prov in ALL_PROVINCES {
            if let Some(home) = prov.home_power() {
                state.sc_owner[prov as usize] = Some(home);
            }
        }
        state
    }

    /// Places a unit on the board. Returns false if the province is already occupied.
    pub fn place_unit(&mut self, province: Province, power: Power, unit_type: UnitType, coast: Coast) -> bool {
        let idx = province as usize;
        if self.units[idx].is_some() {
            return false;
        }
        self.units[idx] = Some((power, unit_type));
        self.fleet_coast[idx] = (coast != Coast::None).then_some(coast);
        true
    }

    /// Removes and returns the unit at `province`.
    pub fn remove_unit(&mut self, province: Province) -> Option<(Power, UnitType)> {
        let idx = province as usize;
        self.fleet_coast[idx] = None;
        self.units[idx].take()
    }

    pub fn set_sc_owner(&mut self, province: Province, owner: Option<Power>) {
        self.sc_owner[province as usize] = owner;
    }

    pub fn set_dislodged(&mut self, province: Province, dislodged: DislodgedUnit) {
        self.dislodged[province as usize] = Some(dislodged);
    }

    /// The exact location of the unit in `province`, including fleet coast.
    pub fn location_of(&self, province: Province) -> Location {
        let coast = self.fleet_coast[province as usize].unwrap_or(Coast::None);
        Location::with_coast(province, coast)
    }

    pub fn unit_at(&self, province: Province) -> Option<Unit> {
        self.units[province as usize].map(|(power, unit_type)| Unit {
            unit_type,
            power,
            location: self.location_of(province),
        })
    }

    /// All units in province order.
    pub fn units(&self) -> impl Iterator<Item = Unit> + '_ {
        ALL_PROVINCES.iter().filter_map(move |&p| self.unit_at(p))
    }

    pub fn units_of(&self, power: Power) -> impl Iterator<Item = Unit> + '_ {
        self.units().filter(move |u| u.power == power)
    }

    pub fn unit_count(&self, power: Power) -> usize {
        self.units.iter().flatten().filter(|(p, _)| *p == power).count()
    }

    pub fn center_count(&self, power: Power) -> usize {
        self.sc_owner.iter().filter(|o| **o == Some(power)).count()
    }

    pub fn centers_of(&self, power: Power) -> impl Iterator<Item = Province> + '_ {
        ALL_PROVINCES
            .iter()
            .copied()
            .filter(move |&p| self.sc_owner[p as usize] == Some(power))
    }

    /// Dislodged units in province order, paired with their province.
    pub fn dislodged_units(&self) -> impl Iterator<Item = (Province, DislodgedUnit)> + '_ {
        ALL_PROVINCES
            .iter()
            .filter_map(move |&p| self.dislodged[p as usize].map(|d| (p, d)))
    }

    pub fn has_dislodged(&self) -> bool {
        self.dislodged.iter().any(|d| d.is_some())
    }

    /// A power with neither units nor centers is out of the game.
    pub fn is_eliminated(&self, power: Power) -> bool {
        self.unit_count(power) == 0
            && self.center_count(power) == 0
            && !self.dislodged.iter().flatten().any(|d| d.power == power)
    }

    /// Hash of unit placement and center ownership.
    ///
    /// Phase, dislodgements and stand-offs are excluded so that repeated
    /// positions hash equal across years.
    pub fn board_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.units.hash(&mut hasher);
        self.fleet_coast.hash(&mut hasher);
        self.sc_owner.hash(&mut hasher);
        hasher.finish()
    }

    /// Clears the retreat-phase bookkeeping.
    pub fn clear_retreat_state(&mut self) {
        self.dislodged = [None; PROVINCE_COUNT];
        self.contested = [false; PROVINCE_COUNT];
    }
}
