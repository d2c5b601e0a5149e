//! Order resolution.
//!
//! Resolves a set of simultaneous orders into outcomes for each phase kind:
//! movement through the Kruijswijk algorithm, retreats and adjustments in a
//! single pass. Phase sequencing lives in [`phase`].

pub mod build;
pub mod kruijswijk;
pub mod phase;
pub mod retreat;

pub use build::{apply_builds, resolve_builds};
pub use kruijswijk::{
    apply_resolution, resolve_orders, DislodgedUnit, OrderResult, Paradox, ParadoxError, Resolution,
    ResolvedOrder, Resolver,
};
pub use phase::{advance_state, needs_adjustment, next_phase, solo_winner, update_sc_ownership};
pub use retreat::{apply_retreats, resolve_retreats};
