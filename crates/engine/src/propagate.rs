// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child-driven propagation up the ancestor chain.
//!
//! After the kernel runs on the originating location, each ancestor receives
//! a synthetic contribution derived from the child's new snapshot. The walk
//! stops at a non-contributing child, a frozen parent, or the first ancestor
//! that does not transition.

use crate::engine::Engine;
use crate::kernel;
use chrono::{DateTime, Utc};
use occ_core::{
    LocationId, LocationState, LockState, OccupancyEvent, OccupantId, SourceId, Transition,
    PROPAGATED_CATEGORY,
};
use tracing::trace;

pub(crate) fn run(
    engine: &mut Engine,
    origin: &LocationId,
    origin_old: &LocationState,
    now: DateTime<Utc>,
    out: &mut Vec<Transition>,
) {
    let mut child_id = origin.clone();
    let mut child_old = origin_old.clone();

    loop {
        let Some(parent_id) = engine.index().parent(&child_id).cloned() else { break };
        let Some(child_config) = engine.config(&child_id) else { break };
        if !child_config.contributes_to_parent {
            // The backyard rule: this child never contributes upward.
            break;
        }
        let Some(parent_state) = engine.raw_state(&parent_id).cloned() else { break };
        if parent_state.lock_state == LockState::LockedFrozen {
            // Locks do not let propagated events through.
            break;
        }
        let Some(child_state) = engine.raw_state(&child_id).cloned() else { break };

        let Some(event) =
            contribution(&parent_id, &child_id, &child_old, &child_state, &parent_state, now)
        else {
            break;
        };
        trace!(parent = %parent_id, child = %child_id, event = %event.event_type, "propagating");

        let Some(parent_config) = engine.config(&parent_id) else { break };
        let (new_state, kind) = kernel::apply(&parent_state, &event, now, parent_config);
        let Some(kind) = kind else { break };

        engine.replace_state(parent_id.clone(), new_state.clone());
        out.push(Transition {
            location_id: parent_id.clone(),
            old: parent_state.clone(),
            new: new_state,
            kind,
        });

        child_old = parent_state;
        child_id = parent_id;
    }
}

/// Derive the synthetic event a child sends its parent, if any.
///
/// An indefinitely held child asserts a hold keyed by its own id and merges
/// its occupants upward. A child that stopped being held while the parent
/// still tracks its hold sends the matching release so the parent's fudge
/// factor engages. A child with a finite remainder sends a pulse for that
/// remainder. A plain vacancy sends nothing; parents expire on their own
/// timers.
fn contribution(
    parent_id: &LocationId,
    child_id: &LocationId,
    child_old: &LocationState,
    child_state: &LocationState,
    parent_state: &LocationState,
    now: DateTime<Utc>,
) -> Option<OccupancyEvent> {
    let departed: Vec<OccupantId> =
        child_old.active_occupants.difference(&child_state.active_occupants).cloned().collect();
    let carried: Vec<OccupantId> = child_state.active_occupants.iter().cloned().collect();

    if child_state.is_indefinite() && child_state.is_held() {
        return Some(
            OccupancyEvent::propagated(parent_id.clone(), child_id, now)
                .carrying(carried)
                .departing(departed),
        );
    }

    if parent_state.active_holds.contains(&SourceId::from(child_id)) {
        return Some(
            OccupancyEvent::hold_end(parent_id.clone(), PROPAGATED_CATEGORY, child_id.as_str(), now)
                .carrying(departed),
        );
    }

    if child_state.is_occupied {
        if let Some(until) = child_state.occupied_until {
            if until > now {
                let remainder = (until - now).to_std().ok()?;
                return Some(
                    OccupancyEvent::propagated(parent_id.clone(), child_id, now)
                        .duration(remainder)
                        .carrying(carried)
                        .departing(departed),
                );
            }
        }
    }

    None
}

#[cfg(test)]
#[path = "propagate_tests.rs"]
mod tests;
