//! Locations and order types for all phases.
//!
//! `Order` is a closed set of variants mapping one-to-one onto DSON
//! (`protocol::dson`). A `Location` is a province plus an optional coast;
//! the 81 addressable locations have a dense index used by the
//! civil-disorder distance tables.

use std::fmt;
use std::sync::LazyLock;

use super::province::{Coast, Province, ProvinceType, ALL_PROVINCES, PROVINCE_COUNT};
use super::unit::UnitType;

/// Provinces split into named coasts.
const SPLIT_PROVINCES: [Province; 3] = [Province::Bul, Province::Spa, Province::Stp];

/// 75 provinces plus two coast variants for each split province.
pub const LOCATION_COUNT: usize = PROVINCE_COUNT + 2 * SPLIT_PROVINCES.len();

/// A location on the board: a province with an optional coast specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub province: Province,
    pub coast: Coast,
}

/// Every addressable location, in `Location::index` order.
///
/// Alphabetical by province, with coast variants directly after their base.
pub static ALL_LOCATIONS: LazyLock<[Location; LOCATION_COUNT]> = LazyLock::new(|| {
    let mut out = [Location::new(Province::Adr); LOCATION_COUNT];
    let mut i = 0;
    for prov in ALL_PROVINCES {
        out[i] = Location::new(prov);
        i += 1;
        for &coast in prov.coasts() {
            out[i] = Location::with_coast(prov, coast);
            i += 1;
        }
    }
    out
});

impl Location {
    /// Creates a location without a coast.
    pub const fn new(province: Province) -> Self {
        Self { province, coast: Coast::None }
    }

    /// Creates a location with a coast specifier.
    pub const fn with_coast(province: Province, coast: Coast) -> Self {
        Self { province, coast }
    }

    /// The plain province form; supply-center status belongs here.
    pub const fn base(self) -> Location {
        Location::new(self.province)
    }

    pub const fn is_coastal_variant(self) -> bool {
        !matches!(self.coast, Coast::None)
    }

    /// Dense index into `ALL_LOCATIONS`.
    pub fn index(self) -> usize {
        let p = self.province as usize;
        let mut idx = p;
        for split in SPLIT_PROVINCES {
            if (split as usize) < p {
                idx += split.coasts().len();
            }
        }
        if self.coast != Coast::None {
            let pos = self
                .province
                .coasts()
                .iter()
                .position(|&c| c == self.coast)
                .unwrap_or(0);
            idx += 1 + pos;
        }
        idx
    }

    pub fn from_index(idx: usize) -> Option<Location> {
        ALL_LOCATIONS.get(idx).copied()
    }

    /// Whether this location names a place that exists on the map.
    ///
    /// A coast is only valid on a split province that has it.
    pub fn is_valid(self) -> bool {
        self.coast == Coast::None || self.province.coasts().contains(&self.coast)
    }

    /// Parses `vie`, `stp/nc` (case-insensitive).
    pub fn from_abbr(s: &str) -> Option<Location> {
        let (prov, coast) = match s.split_once('/') {
            Some((p, c)) => (p, Coast::from_abbr(c)?),
            None => (s, Coast::None),
        };
        let loc = Location::with_coast(Province::from_abbr(prov)?, coast);
        loc.is_valid().then_some(loc)
    }

    /// Whether a unit of the given type may stand here.
    ///
    /// Fleets on split provinces must name a coast; armies never do.
    pub fn admits(self, unit_type: UnitType) -> bool {
        if !unit_type.can_occupy(self.province.province_type()) || !self.is_valid() {
            return false;
        }
        match unit_type {
            UnitType::Army => self.coast == Coast::None,
            UnitType::Fleet => self.province.has_coasts() == self.is_coastal_variant(),
        }
    }

    pub fn province_type(self) -> ProvinceType {
        self.province.province_type()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coast == Coast::None {
            write!(f, "{}", self.province)
        } else {
            write!(f, "{}/{}", self.province, self.coast.abbr())
        }
    }
}

/// A unit reference in an order: the unit type and its current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderUnit {
    pub unit_type: UnitType,
    pub location: Location,
}

impl OrderUnit {
    pub const fn new(unit_type: UnitType, location: Location) -> Self {
        Self { unit_type, location }
    }

    pub const fn province(&self) -> Province {
        self.location.province
    }
}

/// An order for any phase kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// `A vie H`
    Hold { unit: OrderUnit },

    /// `A bud - rum`, `F nrg - stp/nc`, `A lon - bel VIA`
    ///
    /// `via_convoy` forces convoy routing even between adjacent coasts.
    Move {
        unit: OrderUnit,
        dest: Location,
        via_convoy: bool,
    },

    /// `A tyr S A vie H`
    SupportHold { unit: OrderUnit, supported: OrderUnit },

    /// `A gal S A bud - rum`
    SupportMove {
        unit: OrderUnit,
        supported: OrderUnit,
        dest: Location,
    },

    /// `F mao C A bre - spa`
    Convoy {
        unit: OrderUnit,
        convoyed_from: Location,
        convoyed_to: Location,
    },

    /// `A vie R boh`
    Retreat { unit: OrderUnit, dest: Location },

    /// `F tri D`, in the retreat or adjustment phase.
    Disband { unit: OrderUnit },

    /// `A vie B`, `F stp/sc B`
    Build { unit: OrderUnit },

    /// `W`: decline one build.
    Waive,
}

impl Order {
    /// The ordered (or built) unit; `None` for Waive.
    pub fn unit(&self) -> Option<OrderUnit> {
        match *self {
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Convoy { unit, .. }
            | Order::Retreat { unit, .. }
            | Order::Disband { unit }
            | Order::Build { unit } => Some(unit),
            Order::Waive => None,
        }
    }

    /// Province of the ordered unit.
    pub fn province(&self) -> Option<Province> {
        self.unit().map(|u| u.province())
    }

    /// Short lowercase name of the order kind, used in diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Order::Hold { .. } => "hold",
            Order::Move { .. } => "move",
            Order::SupportHold { .. } => "support-hold",
            Order::SupportMove { .. } => "support-move",
            Order::Convoy { .. } => "convoy",
            Order::Retreat { .. } => "retreat",
            Order::Disband { .. } => "disband",
            Order::Build { .. } => "build",
            Order::Waive => "waive",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::protocol::dson::format_order(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_index_is_dense() {
        assert_eq!(ALL_LOCATIONS.len(), 81);
        for (i, loc) in ALL_LOCATIONS.iter().enumerate() {
            assert_eq!(loc.index(), i, "{}", loc);
            assert_eq!(Location::from_index(i), Some(*loc));
        }
        assert_eq!(Location::from_index(81), None);
    }

    #[test]
    fn coast_variants_follow_base() {
        let stp = Location::new(Province::Stp).index();
        assert_eq!(ALL_LOCATIONS[stp + 1], Location::with_coast(Province::Stp, Coast::North));
        assert_eq!(ALL_LOCATIONS[stp + 2], Location::with_coast(Province::Stp, Coast::South));
        assert_eq!(ALL_LOCATIONS[stp + 3], Location::new(Province::Swe));
    }

    #[test]
    fn base_of_coastal_variant() {
        let loc = Location::with_coast(Province::Spa, Coast::South);
        assert!(loc.is_coastal_variant());
        assert_eq!(loc.base(), Location::new(Province::Spa));
        assert!(!loc.base().is_coastal_variant());
    }

    #[test]
    fn parse_and_display() {
        let loc = Location::from_abbr("STP/NC").unwrap();
        assert_eq!(loc, Location::with_coast(Province::Stp, Coast::North));
        assert_eq!(loc.to_string(), "stp/nc");
        assert_eq!(Location::from_abbr("vie/nc"), None);
        assert_eq!(Location::from_abbr("bul/nc"), None);
        assert_eq!(Location::from_abbr("xyz"), None);
    }

    #[test]
    fn admits_by_unit_type() {
        assert!(Location::new(Province::Stp).admits(UnitType::Army));
        assert!(!Location::new(Province::Stp).admits(UnitType::Fleet));
        assert!(Location::with_coast(Province::Stp, Coast::North).admits(UnitType::Fleet));
        assert!(!Location::with_coast(Province::Stp, Coast::North).admits(UnitType::Army));
        assert!(!Location::new(Province::Mun).admits(UnitType::Fleet));
        assert!(!Location::new(Province::Nth).admits(UnitType::Army));
    }

    #[test]
    fn order_unit_accessor() {
        let unit = OrderUnit::new(UnitType::Army, Location::new(Province::Vie));
        assert_eq!(Order::Hold { unit }.unit(), Some(unit));
        assert_eq!(Order::Disband { unit }.province(), Some(Province::Vie));
        assert_eq!(Order::Waive.unit(), None);
        assert_ne!(Order::Hold { unit }, Order::Disband { unit });
    }
}
