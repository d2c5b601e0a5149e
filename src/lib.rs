//! Concordat: a Diplomacy adjudicator.
//!
//! Exposes the board model, order legality, the movement/retreat/adjustment
//! resolvers, the phase state machine with its rollback history, and the
//! DFEN/DSON/JSON codecs.

pub mod board;
pub mod config;
pub mod disorder;
pub mod error;
pub mod game;
pub mod movegen;
pub mod press;
pub mod protocol;
pub mod resolve;
pub mod simulate;

pub use config::GameConfig;
pub use error::{GameError, InvariantViolation};
pub use game::{Game, GameStatus, Preserve};
