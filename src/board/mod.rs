//! Board representation and game-state types.
//!
//! Contains the core data structures for provinces, units, adjacency,
//! orders, and the board position.

pub mod adjacency;
pub mod order;
pub mod province;
pub mod state;
pub mod unit;

pub use adjacency::{
    adj_from, adjacent, fleet_coasts_to, is_adjacent, neighbors, provinces_adjacent_to,
    AdjacencyEntry, Edge, Passage, EDGES, EDGE_COUNT,
};
pub use order::{Location, Order, OrderUnit, ALL_LOCATIONS, LOCATION_COUNT};
pub use province::{
    Coast, Power, Province, ProvinceInfo, ProvinceType, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT,
    PROVINCE_INFO, SOLO_CENTER_COUNT, SUPPLY_CENTER_COUNT,
};
pub use state::{BoardState, DislodgedUnit, PhaseId, PhaseKind, Season};
pub use unit::{Unit, UnitType, ALL_UNIT_TYPES};
