//! Phase sequencing.
//!
//! Spring and Fall each have a movement phase, followed by a retreat phase
//! only when something was dislodged. Centers change hands at the end of
//! Fall; a Winter adjustment phase follows whenever some power's unit count
//! no longer matches its center count.

use crate::board::{BoardState, PhaseId, PhaseKind, Power, Season, ALL_POWERS, ALL_PROVINCES, SOLO_CENTER_COUNT};

/// The phase following `phase`, given whether it left dislodged units and
/// whether any power is owed an adjustment.
///
/// - Spring Movement -> Spring Retreat (if dislodged) or Fall Movement
/// - Spring Retreat  -> Fall Movement
/// - Fall Movement   -> Fall Retreat (if dislodged), else as Fall Retreat
/// - Fall Retreat    -> Winter Adjustment if needed, else next Spring Movement
/// - Winter Adjustment -> next Spring Movement
pub fn next_phase(phase: PhaseId, has_dislodged: bool, needs_adjustment: bool) -> PhaseId {
    match phase.kind {
        PhaseKind::Movement if has_dislodged => PhaseId::new(phase.year, phase.season, PhaseKind::Retreat),
        PhaseKind::Movement | PhaseKind::Retreat => match phase.season {
            Season::Spring => PhaseId::new(phase.year, Season::Fall, PhaseKind::Movement),
            _ if needs_adjustment => PhaseId::new(phase.year, Season::Winter, PhaseKind::Adjustment),
            _ => PhaseId::spring(phase.year + 1),
        },
        PhaseKind::Adjustment => PhaseId::spring(phase.year + 1),
    }
}

/// Returns true if any power has a unit/center mismatch.
pub fn needs_adjustment(state: &BoardState) -> bool {
    ALL_POWERS
        .iter()
        .any(|&power| state.unit_count(power) != state.center_count(power))
}

/// Centers are captured by the power whose unit stands in them; empty
/// centers keep their owner.
pub fn update_sc_ownership(state: &mut BoardState) {
    for prov in ALL_PROVINCES {
        if !prov.is_supply_center() {
            continue;
        }
        if let Some((power, _)) = state.units[prov as usize] {
            state.sc_owner[prov as usize] = Some(power);
        }
    }
}

/// Moves a freshly resolved board on to its next phase.
///
/// Captures centers at the end of Fall and drops retreat bookkeeping unless
/// a retreat phase comes next.
pub fn advance_state(state: &mut BoardState) {
    let resolved = state.phase;
    let has_dislodged = resolved.kind == PhaseKind::Movement && state.has_dislodged();

    if resolved.season == Season::Fall && !has_dislodged && resolved.kind != PhaseKind::Adjustment {
        update_sc_ownership(state);
    }

    let next = next_phase(resolved, has_dislodged, needs_adjustment(state));
    if next.kind != PhaseKind::Retreat {
        state.clear_retreat_state();
    }
    state.phase = next;
}

/// The power holding a majority of supply centers, if any.
pub fn solo_winner(state: &BoardState) -> Option<Power> {
    ALL_POWERS
        .into_iter()
        .find(|&power| state.center_count(power) >= SOLO_CENTER_COUNT)
}
