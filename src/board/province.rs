//! Provinces, coasts and powers of the standard map.
//!
//! The 75 provinces are enumerated alphabetically by their 3-letter ID, so
//! `Province as usize` doubles as a dense table index. Static metadata
//! (display name, terrain, supply-center status, split coasts) lives in
//! `PROVINCE_INFO`.

use std::fmt;

/// The number of provinces on the standard map.
pub const PROVINCE_COUNT: usize = 75;

/// The number of supply centers on the standard map.
pub const SUPPLY_CENTER_COUNT: usize = 34;

/// Supply centers a single power must hold for a solo victory.
pub const SOLO_CENTER_COUNT: usize = SUPPLY_CENTER_COUNT / 2 + 1;

/// A province on the standard map, in alphabetical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Province {
    Adr, Aeg, Alb, Ank, Apu, Arm, Bal, Bar,
    Bel, Ber, Bla, Boh, Bot, Bre, Bud, Bul,
    Bur, Cly, Con, Den, Eas, Edi, Eng, Fin,
    Gal, Gas, Gol, Gre, Hel, Hol, Ion, Iri,
    Kie, Lon, Lvn, Lvp, Mao, Mar, Mos, Mun,
    Naf, Nao, Nap, Nrg, Nth, Nwy, Par, Pic,
    Pie, Por, Pru, Rom, Ruh, Rum, Ser, Sev,
    Sil, Ska, Smy, Spa, Stp, Swe, Syr, Tri,
    Tun, Tus, Tyr, Tys, Ukr, Ven, Vie, Wal,
    War, Wes, Yor,
}

use Province as P;

/// All provinces in index order.
pub const ALL_PROVINCES: [Province; PROVINCE_COUNT] = [
    P::Adr, P::Aeg, P::Alb, P::Ank, P::Apu, P::Arm,
    P::Bal, P::Bar, P::Bel, P::Ber, P::Bla, P::Boh,
    P::Bot, P::Bre, P::Bud, P::Bul, P::Bur, P::Cly,
    P::Con, P::Den, P::Eas, P::Edi, P::Eng, P::Fin,
    P::Gal, P::Gas, P::Gol, P::Gre, P::Hel, P::Hol,
    P::Ion, P::Iri, P::Kie, P::Lon, P::Lvn, P::Lvp,
    P::Mao, P::Mar, P::Mos, P::Mun, P::Naf, P::Nao,
    P::Nap, P::Nrg, P::Nth, P::Nwy, P::Par, P::Pic,
    P::Pie, P::Por, P::Pru, P::Rom, P::Ruh, P::Rum,
    P::Ser, P::Sev, P::Sil, P::Ska, P::Smy, P::Spa,
    P::Stp, P::Swe, P::Syr, P::Tri, P::Tun, P::Tus,
    P::Tyr, P::Tys, P::Ukr, P::Ven, P::Vie, P::Wal,
    P::War, P::Wes, P::Yor,
];

impl Province {
    /// Returns the province at the given table index.
    pub fn from_index(idx: usize) -> Option<Province> {
        ALL_PROVINCES.get(idx).copied()
    }

    /// Returns the 3-letter abbreviation.
    pub const fn abbr(self) -> &'static str {
        PROVINCE_INFO[self as usize].abbr
    }

    /// Returns the display name.
    pub const fn name(self) -> &'static str {
        PROVINCE_INFO[self as usize].name
    }

    pub const fn province_type(self) -> ProvinceType {
        PROVINCE_INFO[self as usize].province_type
    }

    pub const fn is_supply_center(self) -> bool {
        !matches!(PROVINCE_INFO[self as usize].center, Center::None)
    }

    /// Returns the power this province is a home center of, if any.
    pub const fn home_power(self) -> Option<Power> {
        match PROVINCE_INFO[self as usize].center {
            Center::Home(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the coasts of a split-coast province, empty otherwise.
    pub const fn coasts(self) -> &'static [Coast] {
        PROVINCE_INFO[self as usize].coasts
    }

    pub const fn has_coasts(self) -> bool {
        !PROVINCE_INFO[self as usize].coasts.is_empty()
    }

    /// Returns which unit types may stand in this province.
    pub const fn unit_types_allowed(self) -> UnitTypes {
        match self.province_type() {
            ProvinceType::Land => UnitTypes { army: true, fleet: false },
            ProvinceType::Sea => UnitTypes { army: false, fleet: true },
            ProvinceType::Coastal => UnitTypes { army: true, fleet: true },
        }
    }

    /// Looks up a province by its 3-letter abbreviation (case-insensitive).
    pub fn from_abbr(abbr: &str) -> Option<Province> {
        ALL_PROVINCES
            .iter()
            .copied()
            .find(|p| p.abbr().eq_ignore_ascii_case(abbr))
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

/// The set of unit types a location admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitTypes {
    pub army: bool,
    pub fleet: bool,
}

/// Coast specifier for split-coast provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Coast {
    None,
    North,
    South,
    East,
}

impl Coast {
    /// Returns the 2-letter abbreviation (empty string for None).
    pub const fn abbr(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
        }
    }

    /// Parses a coast from its 2-letter abbreviation.
    pub fn from_abbr(s: &str) -> Option<Coast> {
        match s.to_ascii_lowercase().as_str() {
            "" => Some(Coast::None),
            "nc" => Some(Coast::North),
            "sc" => Some(Coast::South),
            "ec" => Some(Coast::East),
            _ => Option::None,
        }
    }
}

/// Classifies a province by terrain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvinceType {
    Land,
    Sea,
    Coastal,
}

/// One of the seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// All seven powers in standard order.
pub const ALL_POWERS: [Power; 7] = [
    Power::Austria,
    Power::England,
    Power::France,
    Power::Germany,
    Power::Italy,
    Power::Russia,
    Power::Turkey,
];

impl Power {
    /// Returns the uppercase name used in order submission and snapshots.
    pub const fn name(self) -> &'static str {
        match self {
            Power::Austria => "AUSTRIA",
            Power::England => "ENGLAND",
            Power::France => "FRANCE",
            Power::Germany => "GERMANY",
            Power::Italy => "ITALY",
            Power::Russia => "RUSSIA",
            Power::Turkey => "TURKEY",
        }
    }

    /// Returns the single-character abbreviation used in DFEN.
    pub const fn dui_char(self) -> char {
        match self {
            Power::Austria => 'A',
            Power::England => 'E',
            Power::France => 'F',
            Power::Germany => 'G',
            Power::Italy => 'I',
            Power::Russia => 'R',
            Power::Turkey => 'T',
        }
    }

    /// Position in `ALL_POWERS`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parses a power from its name, ignoring case.
    pub fn from_name(name: &str) -> Option<Power> {
        ALL_POWERS
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Parses a power from its single-character abbreviation.
    pub fn from_dui_char(c: char) -> Option<Power> {
        ALL_POWERS.iter().copied().find(|p| p.dui_char() == c)
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supply-center status of a province.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Center {
    None,
    Neutral,
    Home(Power),
}

/// Static metadata for a province.
pub struct ProvinceInfo {
    pub abbr: &'static str,
    pub name: &'static str,
    pub province_type: ProvinceType,
    pub center: Center,
    pub coasts: &'static [Coast],
}

const LAND: ProvinceType = ProvinceType::Land;
const SEA: ProvinceType = ProvinceType::Sea;
const COAST: ProvinceType = ProvinceType::Coastal;
const NO_SC: Center = Center::None;
const NEUTRAL_SC: Center = Center::Neutral;
const NC: Coast = Coast::North;
const SC: Coast = Coast::South;
const EC: Coast = Coast::East;

const fn home(power: Power) -> Center {
    Center::Home(power)
}

const fn info(
    abbr: &'static str,
    name: &'static str,
    province_type: ProvinceType,
    center: Center,
    coasts: &'static [Coast],
) -> ProvinceInfo {
    ProvinceInfo { abbr, name, province_type, center, coasts }
}

use Power::{Austria, England, France, Germany, Italy, Russia, Turkey};

/// Metadata table, indexed by `Province as usize`.
pub static PROVINCE_INFO: [ProvinceInfo; PROVINCE_COUNT] = [
    info("adr", "Adriatic Sea", SEA, NO_SC, &[]),
    info("aeg", "Aegean Sea", SEA, NO_SC, &[]),
    info("alb", "Albania", COAST, NO_SC, &[]),
    info("ank", "Ankara", COAST, home(Turkey), &[]),
    info("apu", "Apulia", COAST, NO_SC, &[]),
    info("arm", "Armenia", COAST, NO_SC, &[]),
    info("bal", "Baltic Sea", SEA, NO_SC, &[]),
    info("bar", "Barents Sea", SEA, NO_SC, &[]),
    info("bel", "Belgium", COAST, NEUTRAL_SC, &[]),
    info("ber", "Berlin", COAST, home(Germany), &[]),
    info("bla", "Black Sea", SEA, NO_SC, &[]),
    info("boh", "Bohemia", LAND, NO_SC, &[]),
    info("bot", "Gulf of Bothnia", SEA, NO_SC, &[]),
    info("bre", "Brest", COAST, home(France), &[]),
    info("bud", "Budapest", LAND, home(Austria), &[]),
    info("bul", "Bulgaria", COAST, NEUTRAL_SC, &[EC, SC]),
    info("bur", "Burgundy", LAND, NO_SC, &[]),
    info("cly", "Clyde", COAST, NO_SC, &[]),
    info("con", "Constantinople", COAST, home(Turkey), &[]),
    info("den", "Denmark", COAST, NEUTRAL_SC, &[]),
    info("eas", "Eastern Mediterranean", SEA, NO_SC, &[]),
    info("edi", "Edinburgh", COAST, home(England), &[]),
    info("eng", "English Channel", SEA, NO_SC, &[]),
    info("fin", "Finland", COAST, NO_SC, &[]),
    info("gal", "Galicia", LAND, NO_SC, &[]),
    info("gas", "Gascony", COAST, NO_SC, &[]),
    info("gol", "Gulf of Lyon", SEA, NO_SC, &[]),
    info("gre", "Greece", COAST, NEUTRAL_SC, &[]),
    info("hel", "Heligoland Bight", SEA, NO_SC, &[]),
    info("hol", "Holland", COAST, NEUTRAL_SC, &[]),
    info("ion", "Ionian Sea", SEA, NO_SC, &[]),
    info("iri", "Irish Sea", SEA, NO_SC, &[]),
    info("kie", "Kiel", COAST, home(Germany), &[]),
    info("lon", "London", COAST, home(England), &[]),
    info("lvn", "Livonia", COAST, NO_SC, &[]),
    info("lvp", "Liverpool", COAST, home(England), &[]),
    info("mao", "Mid-Atlantic Ocean", SEA, NO_SC, &[]),
    info("mar", "Marseilles", COAST, home(France), &[]),
    info("mos", "Moscow", LAND, home(Russia), &[]),
    info("mun", "Munich", LAND, home(Germany), &[]),
    info("naf", "North Africa", COAST, NO_SC, &[]),
    info("nao", "North Atlantic Ocean", SEA, NO_SC, &[]),
    info("nap", "Naples", COAST, home(Italy), &[]),
    info("nrg", "Norwegian Sea", SEA, NO_SC, &[]),
    info("nth", "North Sea", SEA, NO_SC, &[]),
    info("nwy", "Norway", COAST, NEUTRAL_SC, &[]),
    info("par", "Paris", LAND, home(France), &[]),
    info("pic", "Picardy", COAST, NO_SC, &[]),
    info("pie", "Piedmont", COAST, NO_SC, &[]),
    info("por", "Portugal", COAST, NEUTRAL_SC, &[]),
    info("pru", "Prussia", COAST, NO_SC, &[]),
    info("rom", "Rome", COAST, home(Italy), &[]),
    info("ruh", "Ruhr", LAND, NO_SC, &[]),
    info("rum", "Rumania", COAST, NEUTRAL_SC, &[]),
    info("ser", "Serbia", LAND, NEUTRAL_SC, &[]),
    info("sev", "Sevastopol", COAST, home(Russia), &[]),
    info("sil", "Silesia", LAND, NO_SC, &[]),
    info("ska", "Skagerrak", SEA, NO_SC, &[]),
    info("smy", "Smyrna", COAST, home(Turkey), &[]),
    info("spa", "Spain", COAST, NEUTRAL_SC, &[NC, SC]),
    info("stp", "St. Petersburg", COAST, home(Russia), &[NC, SC]),
    info("swe", "Sweden", COAST, NEUTRAL_SC, &[]),
    info("syr", "Syria", COAST, NO_SC, &[]),
    info("tri", "Trieste", COAST, home(Austria), &[]),
    info("tun", "Tunisia", COAST, NEUTRAL_SC, &[]),
    info("tus", "Tuscany", COAST, NO_SC, &[]),
    info("tyr", "Tyrolia", LAND, NO_SC, &[]),
    info("tys", "Tyrrhenian Sea", SEA, NO_SC, &[]),
    info("ukr", "Ukraine", LAND, NO_SC, &[]),
    info("ven", "Venice", COAST, home(Italy), &[]),
    info("vie", "Vienna", LAND, home(Austria), &[]),
    info("wal", "Wales", COAST, NO_SC, &[]),
    info("war", "Warsaw", LAND, home(Russia), &[]),
    info("wes", "Western Mediterranean", SEA, NO_SC, &[]),
    info("yor", "Yorkshire", COAST, NO_SC, &[]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_table_order() {
        for (i, p) in ALL_PROVINCES.iter().enumerate() {
            assert_eq!(*p as usize, i, "{:?} has wrong index", p);
            assert_eq!(Province::from_index(i), Some(*p));
        }
        assert_eq!(Province::from_index(PROVINCE_COUNT), None);
    }

    #[test]
    fn abbreviations_resolve_in_any_case() {
        for p in ALL_PROVINCES {
            assert_eq!(Province::from_abbr(p.abbr()), Some(p));
            assert_eq!(Province::from_abbr(&p.abbr().to_uppercase()), Some(p));
        }
        assert_eq!(Province::from_abbr("xyz"), None);
        assert_eq!(Province::from_abbr(""), None);
    }

    #[test]
    fn thirty_four_centers_twelve_neutral() {
        let centers = ALL_PROVINCES.iter().filter(|p| p.is_supply_center()).count();
        assert_eq!(centers, SUPPLY_CENTER_COUNT);
        let neutral = ALL_PROVINCES
            .iter()
            .filter(|p| p.is_supply_center() && p.home_power().is_none())
            .count();
        assert_eq!(neutral, 12);
        assert_eq!(SOLO_CENTER_COUNT, 18);
    }

    #[test]
    fn home_center_counts() {
        let count_for = |power: Power| ALL_PROVINCES.iter().filter(|p| p.home_power() == Some(power)).count();
        for power in ALL_POWERS {
            let expected = if power == Power::Russia { 4 } else { 3 };
            assert_eq!(count_for(power), expected, "{}", power);
        }
    }

    #[test]
    fn terrain_counts() {
        let count = |t: ProvinceType| ALL_PROVINCES.iter().filter(|p| p.province_type() == t).count();
        assert_eq!(count(ProvinceType::Land), 14);
        assert_eq!(count(ProvinceType::Sea), 19);
        assert_eq!(count(ProvinceType::Coastal), 42);
    }

    #[test]
    fn split_coasts() {
        assert_eq!(Province::Bul.coasts(), &[Coast::East, Coast::South]);
        assert_eq!(Province::Spa.coasts(), &[Coast::North, Coast::South]);
        assert_eq!(Province::Stp.coasts(), &[Coast::North, Coast::South]);
        assert_eq!(ALL_PROVINCES.iter().filter(|p| p.has_coasts()).count(), 3);
    }

    #[test]
    fn unit_types_follow_terrain() {
        assert_eq!(Province::Mun.unit_types_allowed(), UnitTypes { army: true, fleet: false });
        assert_eq!(Province::Nth.unit_types_allowed(), UnitTypes { army: false, fleet: true });
        assert_eq!(Province::Bre.unit_types_allowed(), UnitTypes { army: true, fleet: true });
    }

    #[test]
    fn power_names_roundtrip() {
        for p in ALL_POWERS {
            assert_eq!(Power::from_name(p.name()), Some(p));
            assert_eq!(Power::from_name(&p.name().to_lowercase()), Some(p));
            assert_eq!(Power::from_dui_char(p.dui_char()), Some(p));
        }
        assert_eq!(Power::from_name("NONE"), None);
    }

    #[test]
    fn coast_abbr_roundtrip() {
        for c in [Coast::None, Coast::North, Coast::South, Coast::East] {
            assert_eq!(Coast::from_abbr(c.abbr()), Some(c));
        }
        assert_eq!(Coast::from_abbr("wc"), None);
    }
}
