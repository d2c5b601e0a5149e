//! Text and JSON formats.
//!
//! DFEN encodes a board position on one line, DSON encodes orders, and
//! snapshots carry a whole game as JSON. The command parser drives the
//! `concordat` binary.

pub mod dfen;
pub mod dson;
pub mod parser;
pub mod snapshot;

pub use dfen::{encode_dfen, parse_dfen, DfenError};
pub use dson::{format_order, format_orders, parse_order, parse_orders, DsonError};
pub use parser::{parse_command, Command, RollbackPoint};
pub use snapshot::{GameSnapshot, PhaseSnapshot};
