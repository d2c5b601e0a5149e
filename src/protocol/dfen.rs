//! DFEN (Diplomacy FEN) encoding and decoding.
//!
//! DFEN is a compact single-line board notation inspired by chess FEN.
//!
//! Format: `<phase>/<units>/<supply_centers>/<dislodged>/<standoffs>`
//!
//! - phase: year, season char (`s`/`f`/`w`), kind char (`m`/`r`/`a`): `1901sm`
//! - units: `<power><type><loc>` entries, coasts written `stp.sc`
//! - supply centers: `<power|N><prov>`, all 34 listed
//! - dislodged: `<power><type><loc><<attacker>`, `*` suffix when the attacker
//!   was convoyed
//! - standoffs: province abbreviations
//!
//! Empty list sections are written as `-`.

use crate::board::province::{Coast, Power, Province, ALL_POWERS, ALL_PROVINCES};
use crate::board::state::{BoardState, DislodgedUnit, PhaseId, PhaseKind, Season};
use crate::board::unit::UnitType;

/// DFEN of the standard opening position.
pub const INITIAL_DFEN: &str = "1901sm/Aabud,Aftri,Aavie,Efedi,Eflon,Ealvp,Ffbre,Famar,Fapar,Gaber,Gfkie,Gamun,Ifnap,Iarom,Iaven,Ramos,Rfsev,Rfstp.sc,Rawar,Tfank,Tacon,Tasmy/Abud,Atri,Avie,Eedi,Elon,Elvp,Fbre,Fmar,Fpar,Gber,Gkie,Gmun,Inap,Irom,Iven,Rmos,Rsev,Rstp,Rwar,Tank,Tcon,Tsmy,Nbel,Nbul,Nden,Ngre,Nhol,Nnwy,Npor,Nrum,Nser,Nspa,Nswe,Ntun/-/-";

/// Errors that can occur during DFEN parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DfenError {
    #[error("expected 5 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid year in phase info: '{0}'")]
    InvalidYear(String),

    #[error("invalid season character: '{0}'")]
    InvalidSeason(char),

    #[error("invalid phase character: '{0}'")]
    InvalidPhase(char),

    #[error("phase {0} does not exist")]
    MalformedPhase(PhaseId),

    #[error("invalid power character: '{0}'")]
    InvalidPower(char),

    #[error("invalid unit type character: '{0}'")]
    InvalidUnitType(char),

    #[error("unknown province abbreviation: '{0}'")]
    UnknownProvince(String),

    #[error("invalid coast abbreviation: '{0}'")]
    InvalidCoast(String),

    #[error("unit cannot stand at '{0}'")]
    UnitCannotOccupy(String),

    #[error("duplicate unit at province '{0}'")]
    DuplicateUnit(String),

    #[error("duplicate SC entry for province '{0}'")]
    DuplicateSc(String),

    #[error("'{0}' is not a supply center")]
    NotSupplyCenter(String),

    #[error("duplicate dislodged unit at province '{0}'")]
    DuplicateDislodged(String),

    #[error("invalid unit entry: '{0}'")]
    InvalidUnitEntry(String),

    #[error("invalid SC entry: '{0}'")]
    InvalidScEntry(String),

    #[error("invalid dislodged entry: '{0}'")]
    InvalidDislodgedEntry(String),

    #[error("phase info too short: '{0}'")]
    PhaseInfoTooShort(String),
}

/// Parses a DFEN string into a BoardState.
pub fn parse_dfen(s: &str) -> Result<BoardState, DfenError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    if sections.len() != 5 {
        return Err(DfenError::WrongSectionCount(sections.len()));
    }

    let phase = parse_phase_info(sections[0])?;
    let mut state = BoardState::empty(phase);

    parse_units(sections[1], &mut state)?;
    parse_supply_centers(sections[2], &mut state)?;
    parse_dislodged(sections[3], &mut state)?;
    parse_standoffs(sections[4], &mut state)?;

    Ok(state)
}

fn parse_power_or_neutral(c: char) -> Result<Option<Power>, DfenError> {
    if c == 'N' {
        return Ok(None);
    }
    Power::from_dui_char(c).map(Some).ok_or(DfenError::InvalidPower(c))
}

fn parse_power(c: char) -> Result<Power, DfenError> {
    Power::from_dui_char(c).ok_or(DfenError::InvalidPower(c))
}

fn parse_province(s: &str) -> Result<Province, DfenError> {
    Province::from_abbr(s).ok_or_else(|| DfenError::UnknownProvince(s.to_string()))
}

/// Parses "vie", "stp.sc", "bul.ec".
fn parse_location(s: &str) -> Result<(Province, Coast), DfenError> {
    match s.split_once('.') {
        Some((prov, coast_str)) => {
            let province = parse_province(prov)?;
            let coast = Coast::from_abbr(coast_str)
                .filter(|c| *c != Coast::None && province.coasts().contains(c))
                .ok_or_else(|| DfenError::InvalidCoast(coast_str.to_string()))?;
            Ok((province, coast))
        }
        None => Ok((parse_province(s)?, Coast::None)),
    }
}

fn parse_phase_info(s: &str) -> Result<PhaseId, DfenError> {
    if s.len() < 3 || !s.is_ascii() {
        return Err(DfenError::PhaseInfoTooShort(s.to_string()));
    }

    let bytes = s.as_bytes();
    let kind_char = bytes[s.len() - 1] as char;
    let season_char = bytes[s.len() - 2] as char;
    let year_str = &s[..s.len() - 2];

    let year: u16 = year_str
        .parse()
        .map_err(|_| DfenError::InvalidYear(year_str.to_string()))?;
    let season = Season::from_dfen_char(season_char).ok_or(DfenError::InvalidSeason(season_char))?;
    let kind = PhaseKind::from_dfen_char(kind_char).ok_or(DfenError::InvalidPhase(kind_char))?;

    let phase = PhaseId::new(year, season, kind);
    if !phase.is_well_formed() {
        return Err(DfenError::MalformedPhase(phase));
    }
    Ok(phase)
}

/// Splits `<power><type><location>` into its parts.
fn split_unit_entry(entry: &str) -> Option<(char, char, &str)> {
    let mut chars = entry.char_indices();
    let (_, power) = chars.next()?;
    let (_, unit) = chars.next()?;
    let (rest_at, _) = chars.next()?;
    Some((power, unit, &entry[rest_at..]))
}

fn parse_unit_entry(entry: &str) -> Result<(Power, UnitType, Province, Coast), DfenError> {
    let (power_char, unit_char, location_str) =
        split_unit_entry(entry).ok_or_else(|| DfenError::InvalidUnitEntry(entry.to_string()))?;

    let power = parse_power(power_char)?;
    let unit_type = UnitType::from_dui_char(unit_char).ok_or(DfenError::InvalidUnitType(unit_char))?;
    let (province, coast) = parse_location(location_str)?;

    let fleet_needs_coast = unit_type == UnitType::Fleet && province.has_coasts() && coast == Coast::None;
    let army_has_coast = unit_type == UnitType::Army && coast != Coast::None;
    if !unit_type.can_occupy(province.province_type()) || fleet_needs_coast || army_has_coast {
        return Err(DfenError::UnitCannotOccupy(entry.to_string()));
    }
    Ok((power, unit_type, province, coast))
}

fn parse_units(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    if s == "-" {
        return Ok(());
    }

    for entry in s.split(',') {
        let (power, unit_type, province, coast) = parse_unit_entry(entry)?;
        if !state.place_unit(province, power, unit_type, coast) {
            return Err(DfenError::DuplicateUnit(province.abbr().to_string()));
        }
    }

    Ok(())
}

fn parse_supply_centers(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    if s == "-" {
        return Ok(());
    }

    let mut seen = [false; crate::board::PROVINCE_COUNT];
    for entry in s.split(',') {
        let mut chars = entry.chars();
        let power_char = chars
            .next()
            .ok_or_else(|| DfenError::InvalidScEntry(entry.to_string()))?;
        let prov_str = chars.as_str();

        let owner = parse_power_or_neutral(power_char)?;
        let province = parse_province(prov_str)?;
        if !province.is_supply_center() {
            return Err(DfenError::NotSupplyCenter(prov_str.to_string()));
        }

        let idx = province as usize;
        if seen[idx] {
            return Err(DfenError::DuplicateSc(province.abbr().to_string()));
        }
        seen[idx] = true;
        state.sc_owner[idx] = owner;
    }

    Ok(())
}

fn parse_dislodged(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    if s == "-" {
        return Ok(());
    }

    for entry in s.split(',') {
        let (unit_part, attacker_part) = entry
            .split_once('<')
            .ok_or_else(|| DfenError::InvalidDislodgedEntry(entry.to_string()))?;
        let (attacker_str, by_convoy) = match attacker_part.strip_suffix('*') {
            Some(stripped) => (stripped, true),
            None => (attacker_part, false),
        };

        let (power, unit_type, province, coast) = parse_unit_entry(unit_part)?;
        let attacker_from = parse_province(attacker_str)?;

        let idx = province as usize;
        if state.dislodged[idx].is_some() {
            return Err(DfenError::DuplicateDislodged(province.abbr().to_string()));
        }

        state.dislodged[idx] = Some(DislodgedUnit {
            power,
            unit_type,
            coast,
            attacker_from,
            by_convoy,
        });
    }

    Ok(())
}

fn parse_standoffs(s: &str, state: &mut BoardState) -> Result<(), DfenError> {
    if s == "-" {
        return Ok(());
    }
    for entry in s.split(',') {
        state.contested[parse_province(entry)? as usize] = true;
    }
    Ok(())
}

fn encode_location(province: Province, coast: Coast) -> String {
    if coast == Coast::None {
        province.abbr().to_string()
    } else {
        format!("{}.{}", province.abbr(), coast.abbr())
    }
}

fn join_or_dash(entries: Vec<String>) -> String {
    if entries.is_empty() {
        "-".to_string()
    } else {
        entries.join(",")
    }
}

/// Encodes a BoardState into a canonical DFEN string.
///
/// Units, centers and dislodged entries are grouped by power (A, E, F, G, I,
/// R, T) and sorted by province within each group; neutral centers come last.
pub fn encode_dfen(state: &BoardState) -> String {
    let phase = state.phase;
    format!(
        "{}{}{}/{}/{}/{}/{}",
        phase.year,
        phase.season.dfen_char(),
        phase.kind.dfen_char(),
        encode_units(state),
        encode_supply_centers(state),
        encode_dislodged(state),
        encode_standoffs(state),
    )
}

fn encode_units(state: &BoardState) -> String {
    let mut entries = Vec::new();
    for power in ALL_POWERS {
        for unit in state.units_of(power) {
            let loc = encode_location(unit.location.province, unit.location.coast);
            entries.push(format!("{}{}{}", power.dui_char(), unit.unit_type.dui_char(), loc));
        }
    }
    join_or_dash(entries)
}

fn encode_supply_centers(state: &BoardState) -> String {
    let mut entries = Vec::new();
    for power in ALL_POWERS {
        for prov in state.centers_of(power) {
            entries.push(format!("{}{}", power.dui_char(), prov.abbr()));
        }
    }
    for prov in ALL_PROVINCES {
        if prov.is_supply_center() && state.sc_owner[prov as usize].is_none() {
            entries.push(format!("N{}", prov.abbr()));
        }
    }
    join_or_dash(entries)
}

fn encode_dislodged(state: &BoardState) -> String {
    let mut entries = Vec::new();
    for power in ALL_POWERS {
        for (prov, d) in state.dislodged_units().filter(|(_, d)| d.power == power) {
            entries.push(format!(
                "{}{}{}<{}{}",
                d.power.dui_char(),
                d.unit_type.dui_char(),
                encode_location(prov, d.coast),
                d.attacker_from.abbr(),
                if d.by_convoy { "*" } else { "" }
            ));
        }
    }
    join_or_dash(entries)
}

fn encode_standoffs(state: &BoardState) -> String {
    let entries = ALL_PROVINCES
        .iter()
        .filter(|p| state.contested[**p as usize])
        .map(|p| p.abbr().to_string())
        .collect();
    join_or_dash(entries)
}
