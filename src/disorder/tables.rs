//! Civil-disorder distance data.
//!
//! Rows follow `ALL_POWERS`; columns follow `SOURCE_LOCATIONS`, which is the
//! order the tables were generated in, not `Location::index()` order.

use super::UNREACHABLE;

const X: u8 = UNREACHABLE;

pub(super) const SOURCE_LOCATION_COUNT: usize = 81;

pub(super) const SOURCE_LOCATIONS: [&str; SOURCE_LOCATION_COUNT] = [
    "yor", "edi", "lon", "lvp", "nth", "wal", "cly", "nrg", "eng",
    "iri", "nao", "bel", "den", "hel", "hol", "nwy", "ska", "bar",
    "bre", "mao", "pic", "bur", "ruh", "bal", "kie", "swe", "fin",
    "stp", "stp/nc", "gas", "par", "naf", "por", "spa", "spa/nc", "spa/sc",
    "wes", "mar", "mun", "ber", "bot", "lvn", "pru", "stp/sc", "mos",
    "tun", "gol", "tys", "pie", "boh", "sil", "tyr", "war", "sev",
    "ukr", "ion", "tus", "nap", "rom", "ven", "gal", "vie", "tri",
    "arm", "bla", "rum", "adr", "aeg", "alb", "apu", "eas", "gre",
    "bud", "ser", "ank", "smy", "syr", "bul", "bul/ec", "con", "bul/sc",
];

/// Army moves to the nearest home center. Sea areas carry convoy distance.
pub(super) const ARMY: [[u8; SOURCE_LOCATION_COUNT]; 7] = [
    // Austria
    [
         6,  6,  6,  7,  5,  6,  7,  6,  5,  6,  6,  4,  4,  4,  4,  5,  5,  5,  5,  5,  4,
         3,  3,  4,  3,  5,  5,  4,  4,  4,  4,  4,  5,  4,  4,  4,  4,  3,  2,  3,  4,  3,
         3,  4,  3,  3,  3,  3,  2,  1,  2,  1,  2,  2,  2,  2,  2,  3,  2,  1,  1,  0,  0,
         3,  2,  1,  1,  3,  1,  2,  3,  2,  0,  1,  3,  4,  4,  2,  2,  3,  2,
    ],
    // England
    [
         1,  0,  0,  0,  1,  1,  1,  1,  1,  1,  1,  2,  2,  2,  2,  2,  2,  2,  2,  2,  2,
         3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  3,  4,  4,  4,  4,  4,
         4,  3,  4,  4,  4,  4,  5,  5,  5,  5,  5,  5,  5,  5,  5,  5,  5,  6,  6,  6,  6,
         6,  6,  6,  6,  6,  6,  6,  6,  6,  7,  7,  7,  7,  7,  7,  7,  7,  7,
    ],
    // France
    [
         3,  3,  2,  3,  2,  2,  3,  3,  1,  2,  2,  2,  3,  3,  3,  3,  3,  4,  0,  1,  1,
         1,  2,  4,  3,  4,  4,  4,  4,  1,  0,  2,  2,  1,  1,  1,  2,  0,  2,  3,  5,  5,
         4,  4,  5,  3,  1,  2,  1,  3,  3,  2,  4,  6,  5,  3,  2,  3,  3,  2,  4,  3,  3,
         6,  6,  5,  3,  4,  4,  3,  4,  4,  4,  4,  6,  5,  5,  5,  5,  5,  5,
    ],
    // Germany
    [
         3,  3,  3,  4,  2,  4,  4,  3,  3,  4,  4,  2,  1,  1,  1,  3,  2,  4,  3,  3,  2,
         1,  1,  1,  0,  2,  3,  3,  3,  2,  2,  4,  4,  3,  3,  3,  4,  2,  0,  0,  2,  2,
         1,  3,  3,  5,  3,  4,  2,  1,  1,  1,  2,  4,  3,  4,  3,  4,  3,  2,  2,  2,  2,
         5,  4,  3,  3,  5,  3,  3,  5,  4,  3,  3,  5,  6,  6,  4,  4,  5,  4,
    ],
    // Italy
    [
         6,  6,  5,  5,  5,  5,  5,  5,  4,  4,  4,  4,  4,  4,  4,  6,  5,  6,  4,  3,  4,
         3,  3,  4,  3,  5,  6,  6,  6,  3,  4,  3,  4,  3,  3,  3,  2,  2,  2,  3,  5,  5,
         4,  6,  5,  2,  2,  1,  1,  2,  3,  1,  4,  4,  4,  1,  1,  0,  0,  0,  3,  2,  1,
         4,  4,  3,  1,  2,  2,  1,  2,  2,  2,  2,  4,  3,  3,  3,  3,  3,  3,
    ],
    // Russia
    [
         3,  3,  3,  4,  2,  4,  3,  2,  3,  4,  3,  3,  3,  3,  3,  1,  2,  1,  4,  4,  4,
         3,  3,  2,  3,  2,  1,  0,  0,  4,  4,  5,  5,  5,  5,  5,  5,  4,  2,  2,  1,  1,
         1,  0,  0,  5,  5,  5,  4,  2,  1,  3,  0,  0,  1,  4,  5,  5,  5,  4,  1,  2,  3,
         1,  1,  1,  4,  3,  3,  5,  3,  3,  2,  2,  2,  2,  2,  2,  2,  2,  2,
    ],
    // Turkey
    [
         7,  7,  7,  7,  6,  7,  7,  6,  6,  6,  6,  7,  6,  7,  7,  5,  6,  5,  6,  5,  7,
         6,  6,  5,  6,  6,  5,  4,  4,  6,  7,  4,  6,  5,  5,  5,  4,  5,  5,  5,  5,  4,
         5,  4,  3,  3,  4,  3,  5,  4,  4,  4,  4,  2,  3,  2,  4,  3,  4,  4,  3,  4,  3,
         1,  1,  2,  3,  1,  3,  3,  1,  2,  3,  2,  0,  0,  1,  1,  1,  0,  1,
    ],
];

/// Fleet moves to the nearest home center; inland home centers read 0.
pub(super) const FLEET: [[u8; SOURCE_LOCATION_COUNT]; 7] = [
    // Austria
    [
         8,  8,  7,  7,  7,  7,  7,  7,  6,  6,  6,  7,  8,  8,  8,  8,  8,  8,  6,  5,  7,
         X,  X,  9,  9,  9, 10,  X,  9,  6,  X,  4,  6,  X,  6,  5,  4,  5,  X, 10, 10, 10,
        10, 11,  X,  3,  4,  3,  5,  X,  X,  X,  X,  6,  X,  2,  4,  3,  4,  1,  X,  0,  0,
         6,  5,  6,  1,  3,  1,  2,  3,  2,  0,  X,  5,  4,  4,  X,  5,  4,  3,
    ],
    // England
    [
         1,  0,  0,  0,  1,  1,  1,  1,  1,  1,  1,  2,  2,  2,  2,  2,  2,  2,  2,  2,  2,
         X,  X,  3,  3,  3,  4,  X,  3,  3,  X,  3,  3,  X,  3,  3,  3,  4,  X,  4,  4,  4,
         4,  5,  X,  4,  4,  4,  5,  X,  X,  X,  X,  9,  X,  5,  5,  5,  5,  7,  X,  X,  7,
         9,  8,  9,  6,  6,  6,  6,  6,  6,  X,  X,  8,  7,  7,  X,  8,  7,  7,
    ],
    // France
    [
         3,  3,  2,  3,  2,  2,  3,  3,  1,  2,  2,  2,  3,  3,  3,  3,  3,  4,  0,  1,  1,
         X,  X,  4,  4,  4,  5,  X,  4,  1,  0,  2,  2,  X,  2,  1,  2,  0,  X,  5,  5,  5,
         5,  6,  X,  3,  1,  2,  1,  X,  X,  X,  X,  7,  X,  3,  2,  3,  3,  5,  X,  X,  5,
         7,  6,  7,  4,  4,  4,  4,  4,  4,  X,  X,  6,  5,  5,  X,  6,  5,  5,
    ],
    // Germany
    [
         3,  3,  3,  5,  2,  4,  4,  3,  3,  4,  4,  2,  1,  1,  1,  3,  2,  4,  4,  4,  3,
         X,  X,  1,  0,  2,  3,  X,  4,  5,  X,  5,  5,  X,  5,  5,  5,  6,  0,  0,  2,  2,
         1,  3,  X,  6,  6,  6,  7,  X,  X,  X,  X, 11,  X,  7,  7,  7,  7,  9,  X,  X,  9,
        11, 10, 11,  8,  8,  8,  8,  8,  8,  X,  X, 10,  9,  9,  X, 10,  9,  9,
    ],
    // Italy
    [
         6,  6,  5,  5,  5,  5,  5,  5,  4,  4,  4,  5,  6,  6,  6,  6,  6,  6,  4,  3,  5,
         X,  X,  7,  7,  7,  8,  X,  7,  4,  X,  3,  4,  X,  4,  3,  2,  3,  X,  8,  8,  8,
         8,  9,  X,  2,  2,  1,  2,  X,  X,  X,  X,  5,  X,  1,  1,  0,  0,  0,  X,  X,  1,
         5,  4,  5,  1,  2,  2,  1,  2,  2,  X,  X,  4,  3,  3,  X,  4,  3,  3,
    ],
    // Russia
    [
         3,  3,  3,  4,  2,  4,  3,  2,  3,  4,  3,  3,  3,  3,  3,  1,  2,  1,  4,  4,  4,
         X,  X,  2,  3,  2,  1,  0,  0,  5,  X,  5,  5,  X,  5,  5,  5,  6,  X,  3,  1,  1,
         2,  0,  0,  5,  6,  5,  7,  X,  X,  X,  0,  0,  X,  4,  6,  5,  6,  6,  X,  X,  6,
         1,  1,  1,  5,  3,  5,  5,  4,  4,  X,  X,  2,  3,  4,  X,  2,  2,  3,
    ],
    // Turkey
    [
         8,  8,  7,  7,  7,  7,  7,  7,  6,  6,  6,  7,  8,  8,  8,  8,  8,  8,  6,  5,  7,
         X,  X,  9,  9,  9, 10,  X,  9,  6,  X,  4,  6,  X,  6,  5,  4,  5,  X, 10, 10, 10,
        10, 11,  X,  3,  4,  3,  5,  X,  X,  X,  X,  2,  X,  2,  4,  3,  4,  4,  X,  X,  4,
         1,  1,  2,  3,  1,  3,  3,  1,  2,  X,  X,  0,  0,  1,  X,  1,  0,  1,
    ],
];
