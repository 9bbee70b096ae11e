// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The timeout sweep.
//!
//! Expired timers vacate. Vacancy does not propagate; an occupied parent
//! expires in the same sweep only when its own timer has run out.

use crate::engine::Engine;
use chrono::{DateTime, Utc};
use occ_core::{LocationId, LockState, OccupancyStrategy, Transition, TransitionKind};
use tracing::debug;

pub(crate) fn run(engine: &mut Engine, now: DateTime<Utc>) -> Vec<Transition> {
    let expired: Vec<LocationId> = engine
        .states()
        .iter()
        .filter(|(_, state)| {
            state.is_occupied
                && state.lock_state == LockState::Unlocked
                && state.active_holds.is_empty()
                && state.occupied_until.is_some_and(|until| until <= now)
        })
        .map(|(id, _)| id.clone())
        .collect();

    // Clear everything first so follow-parent emission decisions see the
    // post-sweep tree.
    let mut cleaned = Vec::with_capacity(expired.len());
    for id in expired {
        let Some(old) = engine.raw_state(&id).cloned() else { continue };
        engine.replace_state(id.clone(), old.cleared());
        cleaned.push((id, old));
    }

    let mut transitions = Vec::new();
    for (id, old) in cleaned {
        if follows_occupied_ancestor(engine, &id) {
            // The follower still reports occupied; nothing observable changed.
            continue;
        }
        let new = engine.raw_state(&id).cloned().unwrap_or_default();
        debug!(location = %id, until = ?old.occupied_until, "timer expired");
        transitions.push(Transition { location_id: id, old, new, kind: TransitionKind::Vacated });
    }
    transitions
}

fn follows_occupied_ancestor(engine: &Engine, id: &LocationId) -> bool {
    engine
        .config(id)
        .is_some_and(|c| c.occupancy_strategy == OccupancyStrategy::FollowParent)
        && engine.has_occupied_ancestor(id)
}
