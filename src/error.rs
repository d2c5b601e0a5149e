//! Engine-level error types.
//!
//! Order-level problems (`DsonError`, `LegalityError`) never abort a phase;
//! they are reported per order and the unit falls back to its default. The
//! errors here abort the whole operation and leave history untouched.

use thiserror::Error;

use crate::board::{PhaseId, Power, Province};
use crate::movegen::LegalityError;
use crate::protocol::dfen::DfenError;
use crate::resolve::ParadoxError;

/// A state the engine should never produce. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("two units in {province} after resolving {phase}")]
    DoubleOccupancy { phase: PhaseId, province: Province },
    #[error("phase {0} is not in the game history")]
    PhaseNotInHistory(PhaseId),
    #[error("{0} is the current phase and has no recorded end")]
    PhaseNotCompleted(PhaseId),
    #[error("adjustment orders would leave {power} with {units} units for {centers} centers")]
    AdjustmentMismatch { power: Power, units: usize, centers: usize },
}

/// Errors surfaced by [`Game`](crate::game::Game) operations.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Paradox(#[from] ParadoxError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error("the game is over")]
    GameOver,
    #[error("bad board in snapshot: {0}")]
    Dfen(#[from] DfenError),
    #[error("unknown phase name {0:?}")]
    PhaseName(String),
    #[error("unknown power {0:?}")]
    UnknownPower(String),
    #[error("order {text:?} in {phase} was rejected on replay: {source}")]
    Replay {
        phase: PhaseId,
        text: String,
        #[source]
        source: LegalityError,
    },
    #[error("replay of {phase} produced {found}, snapshot expected {expected}")]
    ReplayDiverged { phase: PhaseId, expected: String, found: String },
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
