//! Adjacency graph for the standard map.
//!
//! Each border is written once in `EDGES` as an undirected edge tagged with
//! the unit types that may cross it. Split-coast provinces (bul, spa, stp)
//! carry the named coast on their fleet edges and `Coast::None` on army
//! edges. The directed per-province index used for lookups is derived from
//! `EDGES` on first use, so symmetry holds by construction.

use std::sync::LazyLock;

use super::order::Location;
use super::province::{Coast, Province, ProvinceType, PROVINCE_COUNT};
use super::unit::UnitType;

/// Which unit types may cross a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    Army,
    Fleet,
    Both,
}

impl Passage {
    pub const fn admits(self, unit_type: UnitType) -> bool {
        match (self, unit_type) {
            (Passage::Both, _) => true,
            (Passage::Army, UnitType::Army) => true,
            (Passage::Fleet, UnitType::Fleet) => true,
            _ => false,
        }
    }
}

/// An undirected border between two locations.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub a: Province,
    pub a_coast: Coast,
    pub b: Province,
    pub b_coast: Coast,
    pub passage: Passage,
}

/// A directed view of an edge, as seen from `from`.
#[derive(Debug, Clone, Copy)]
pub struct AdjacencyEntry {
    pub from: Province,
    pub from_coast: Coast,
    pub to: Province,
    pub to_coast: Coast,
    pub army_ok: bool,
    pub fleet_ok: bool,
}

const fn fleet(a: Province, b: Province) -> Edge {
    Edge { a, a_coast: Coast::None, b, b_coast: Coast::None, passage: Passage::Fleet }
}
const fn fleet_to(a: Province, b: Province, b_coast: Coast) -> Edge {
    Edge { a, a_coast: Coast::None, b, b_coast, passage: Passage::Fleet }
}
const fn army(a: Province, b: Province) -> Edge {
    Edge { a, a_coast: Coast::None, b, b_coast: Coast::None, passage: Passage::Army }
}
const fn both(a: Province, b: Province) -> Edge {
    Edge { a, a_coast: Coast::None, b, b_coast: Coast::None, passage: Passage::Both }
}

const NC: Coast = Coast::North;
const SC: Coast = Coast::South;
const EC: Coast = Coast::East;

use Province::*;

/// Number of undirected borders on the map.
pub const EDGE_COUNT: usize = 217;

/// Every border of the standard map, exactly once.
pub static EDGES: [Edge; EDGE_COUNT] = [
    // Fleet only, between unsplit provinces
    fleet(Adr, Alb), fleet(Adr, Apu), fleet(Adr, Ion), fleet(Adr, Tri), fleet(Adr, Ven),
    fleet(Aeg, Con), fleet(Aeg, Eas), fleet(Aeg, Gre), fleet(Aeg, Ion), fleet(Aeg, Smy),
    fleet(Alb, Ion), fleet(Ank, Bla), fleet(Apu, Ion), fleet(Arm, Bla), fleet(Bal, Ber),
    fleet(Bal, Bot), fleet(Bal, Den), fleet(Bal, Kie), fleet(Bal, Lvn), fleet(Bal, Pru),
    fleet(Bal, Swe), fleet(Bar, Nrg), fleet(Bar, Nwy), fleet(Bel, Eng), fleet(Bel, Nth),
    fleet(Bla, Con), fleet(Bla, Rum), fleet(Bla, Sev), fleet(Bot, Fin), fleet(Bot, Lvn),
    fleet(Bot, Swe), fleet(Bre, Eng), fleet(Bre, Mao), fleet(Cly, Nao), fleet(Cly, Nrg),
    fleet(Den, Hel), fleet(Den, Nth), fleet(Den, Ska), fleet(Eas, Ion), fleet(Eas, Smy),
    fleet(Eas, Syr), fleet(Edi, Nrg), fleet(Edi, Nth), fleet(Eng, Iri), fleet(Eng, Lon),
    fleet(Eng, Mao), fleet(Eng, Nth), fleet(Eng, Pic), fleet(Eng, Wal), fleet(Gas, Mao),
    fleet(Gol, Mar), fleet(Gol, Pie), fleet(Gol, Tus), fleet(Gol, Tys), fleet(Gol, Wes),
    fleet(Gre, Ion), fleet(Hel, Hol), fleet(Hel, Kie), fleet(Hel, Nth), fleet(Hol, Nth),
    fleet(Ion, Nap), fleet(Ion, Tun), fleet(Ion, Tys), fleet(Iri, Lvp), fleet(Iri, Mao),
    fleet(Iri, Nao), fleet(Iri, Wal), fleet(Lon, Nth), fleet(Lvp, Nao), fleet(Mao, Naf),
    fleet(Mao, Nao), fleet(Mao, Por), fleet(Mao, Wes), fleet(Naf, Wes), fleet(Nao, Nrg),
    fleet(Nap, Tys), fleet(Nrg, Nth), fleet(Nrg, Nwy), fleet(Nth, Nwy), fleet(Nth, Ska),
    fleet(Nth, Yor), fleet(Nwy, Ska), fleet(Rom, Tys), fleet(Ska, Swe), fleet(Tun, Tys),
    fleet(Tun, Wes), fleet(Tus, Tys), fleet(Tys, Wes),
    // Fleet only, touching a named coast of a split province
    fleet_to(Aeg, Bul, SC), fleet_to(Bar, Stp, NC), fleet_to(Bla, Bul, EC), fleet_to(Bot, Stp, SC),
    fleet_to(Con, Bul, EC), fleet_to(Con, Bul, SC), fleet_to(Fin, Stp, SC), fleet_to(Gas, Spa, NC),
    fleet_to(Gol, Spa, SC), fleet_to(Gre, Bul, SC), fleet_to(Lvn, Stp, SC), fleet_to(Mao, Spa, NC),
    fleet_to(Mao, Spa, SC), fleet_to(Mar, Spa, SC), fleet_to(Nwy, Stp, NC), fleet_to(Por, Spa, NC),
    fleet_to(Por, Spa, SC), fleet_to(Rum, Bul, EC), fleet_to(Wes, Spa, SC),
    // Army only
    army(Alb, Ser), army(Ank, Smy), army(Apu, Rom), army(Arm, Smy), army(Arm, Syr),
    army(Bel, Bur), army(Bel, Ruh), army(Ber, Mun), army(Ber, Sil), army(Boh, Gal),
    army(Boh, Mun), army(Boh, Sil), army(Boh, Tyr), army(Boh, Vie), army(Bre, Par),
    army(Bud, Gal), army(Bud, Rum), army(Bud, Ser), army(Bud, Tri), army(Bud, Vie),
    army(Bul, Con), army(Bul, Gre), army(Bul, Rum), army(Bul, Ser), army(Bur, Gas),
    army(Bur, Mar), army(Bur, Mun), army(Bur, Par), army(Bur, Pic), army(Bur, Ruh),
    army(Edi, Lvp), army(Fin, Nwy), army(Fin, Stp), army(Gal, Rum), army(Gal, Sil),
    army(Gal, Ukr), army(Gal, Vie), army(Gal, War), army(Gas, Mar), army(Gas, Par),
    army(Gas, Spa), army(Gre, Ser), army(Hol, Ruh), army(Kie, Mun), army(Kie, Ruh),
    army(Lvn, Mos), army(Lvn, Stp), army(Lvn, War), army(Lvp, Yor), army(Mar, Spa),
    army(Mos, Sev), army(Mos, Stp), army(Mos, Ukr), army(Mos, War), army(Mun, Ruh),
    army(Mun, Sil), army(Mun, Tyr), army(Nwy, Stp), army(Par, Pic), army(Pie, Tyr),
    army(Pie, Ven), army(Por, Spa), army(Pru, Sil), army(Pru, War), army(Rom, Ven),
    army(Rum, Ser), army(Rum, Ukr), army(Ser, Tri), army(Sev, Ukr), army(Sil, War),
    army(Tri, Tyr), army(Tri, Vie), army(Tus, Ven), army(Tyr, Ven), army(Tyr, Vie),
    army(Ukr, War), army(Wal, Yor),
    // Army and fleet
    both(Alb, Gre), both(Alb, Tri), both(Ank, Arm), both(Ank, Con), both(Apu, Nap),
    both(Apu, Ven), both(Arm, Sev), both(Bel, Hol), both(Bel, Pic), both(Ber, Kie),
    both(Ber, Pru), both(Bre, Gas), both(Bre, Pic), both(Cly, Edi), both(Cly, Lvp),
    both(Con, Smy), both(Den, Kie), both(Den, Swe), both(Edi, Yor), both(Fin, Swe),
    both(Lon, Wal), both(Lon, Yor), both(Lvn, Pru), both(Lvp, Wal), both(Mar, Pie),
    both(Naf, Tun), both(Nap, Rom), both(Nwy, Swe), both(Pie, Tus), both(Rom, Tus),
    both(Rum, Sev), both(Smy, Syr), both(Tri, Ven),
];

struct AdjIndex {
    entries: Vec<AdjacencyEntry>,
    offsets: [(u16, u16); PROVINCE_COUNT],
}

static ADJ_INDEX: LazyLock<AdjIndex> = LazyLock::new(|| {
    let mut entries = Vec::with_capacity(EDGE_COUNT * 2);
    for e in EDGES.iter() {
        let army_ok = e.passage.admits(UnitType::Army);
        let fleet_ok = e.passage.admits(UnitType::Fleet);
        entries.push(AdjacencyEntry {
            from: e.a,
            from_coast: e.a_coast,
            to: e.b,
            to_coast: e.b_coast,
            army_ok,
            fleet_ok,
        });
        entries.push(AdjacencyEntry {
            from: e.b,
            from_coast: e.b_coast,
            to: e.a,
            to_coast: e.a_coast,
            army_ok,
            fleet_ok,
        });
    }
    // Stable sort keeps table order within a province, which keeps
    // move generation deterministic.
    entries.sort_by_key(|a| (a.from as u8, a.to as u8));

    let mut offsets = [(0u16, 0u16); PROVINCE_COUNT];
    let mut i = 0;
    for (p, slot) in offsets.iter_mut().enumerate() {
        let start = i;
        while i < entries.len() && entries[i].from as usize == p {
            i += 1;
        }
        *slot = (start as u16, i as u16);
    }

    AdjIndex { entries, offsets }
});

/// Returns the directed adjacency entries leaving `prov`, sorted by destination.
#[inline]
pub fn adj_from(prov: Province) -> &'static [AdjacencyEntry] {
    let idx = &*ADJ_INDEX;
    let (start, end) = idx.offsets[prov as usize];
    &idx.entries[start as usize..end as usize]
}

fn coast_matches(wanted: Coast, actual: Coast) -> bool {
    wanted == Coast::None || actual == Coast::None || wanted == actual
}

/// Returns true if a unit of the given kind can move from `src` to `dst`.
///
/// `Coast::None` on either side matches any coast, so callers must pin
/// the coast themselves when it matters.
pub fn is_adjacent(
    src: Province,
    src_coast: Coast,
    dst: Province,
    dst_coast: Coast,
    is_fleet: bool,
) -> bool {
    adj_from(src).iter().any(|adj| {
        adj.to == dst
            && if is_fleet { adj.fleet_ok } else { adj.army_ok }
            && coast_matches(src_coast, adj.from_coast)
            && coast_matches(dst_coast, adj.to_coast)
    })
}

/// Location-level adjacency for a given unit type.
pub fn adjacent(unit_type: UnitType, from: Location, to: Location) -> bool {
    is_adjacent(
        from.province,
        from.coast,
        to.province,
        to.coast,
        unit_type == UnitType::Fleet,
    )
}

/// Returns all coasts of `dst` a fleet at `src`/`src_coast` can reach.
pub fn fleet_coasts_to(src: Province, src_coast: Coast, dst: Province) -> Vec<Coast> {
    let mut coasts = Vec::new();
    for adj in adj_from(src) {
        if adj.to != dst || !adj.fleet_ok || !coast_matches(src_coast, adj.from_coast) {
            continue;
        }
        if !coasts.contains(&adj.to_coast) {
            coasts.push(adj.to_coast);
        }
    }
    coasts
}

/// Returns all provinces adjacent to the given location for the given unit kind.
pub fn provinces_adjacent_to(prov: Province, coast: Coast, is_fleet: bool) -> Vec<Province> {
    let mut result = Vec::new();
    for adj in adj_from(prov) {
        let passable = if is_fleet { adj.fleet_ok } else { adj.army_ok };
        if !passable || !coast_matches(coast, adj.from_coast) {
            continue;
        }
        if !result.contains(&adj.to) {
            result.push(adj.to);
        }
    }
    result
}

/// Returns every province sharing any border with `prov`, regardless of unit type.
pub fn neighbors(prov: Province) -> impl Iterator<Item = Province> {
    let entries = adj_from(prov);
    entries
        .iter()
        .enumerate()
        .filter(move |(i, adj)| *i == 0 || entries[*i - 1].to != adj.to)
        .map(|(_, adj)| adj.to)
}

/// Sea provinces a fleet could reach from `prov`, from any of its coasts.
pub fn sea_neighbors(prov: Province) -> impl Iterator<Item = Province> {
    neighbors(prov).filter(move |&to| {
        to.province_type() == ProvinceType::Sea && is_adjacent(prov, Coast::None, to, Coast::None, true)
    })
}

/// Whether an army at `from` can reach `to` through a chain of sea
/// provinces accepted by `is_link`.
///
/// `is_link` decides whether a sea province carries a usable convoying
/// fleet; the caller chooses how strict that is.
pub fn convoy_path_exists(from: Province, to: Province, mut is_link: impl FnMut(Province) -> bool) -> bool {
    if from == to
        || from.province_type() != ProvinceType::Coastal
        || to.province_type() != ProvinceType::Coastal
    {
        return false;
    }

    let mut visited = [false; PROVINCE_COUNT];
    let mut queue = Vec::new();
    for sea in sea_neighbors(from) {
        if is_link(sea) {
            visited[sea as usize] = true;
            queue.push(sea);
        }
    }

    while let Some(sea) = queue.pop() {
        if is_adjacent(sea, Coast::None, to, Coast::None, true) {
            return true;
        }
        for next in sea_neighbors(sea) {
            if !visited[next as usize] && is_link(next) {
                visited[next as usize] = true;
                queue.push(next);
            }
        }
    }
    false
}
