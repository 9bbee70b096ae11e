// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observable transitions and per-call results.

use crate::id::LocationId;
use crate::state::LocationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What changed between two snapshots of the same location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    /// Vacant → occupied.
    Occupied,
    /// Still occupied with a changed timer.
    Extended,
    /// Occupied → vacant.
    Vacated,
    /// Still occupied with a changed occupant set.
    IdentityChanged,
    /// Still occupied with a changed hold set.
    HoldChanged,
    /// Lock state flipped.
    LockChanged,
}

crate::simple_display! {
    TransitionKind {
        Occupied => "occupied",
        Extended => "extended",
        Vacated => "vacated",
        IdentityChanged => "identity_changed",
        HoldChanged => "hold_changed",
        LockChanged => "lock_changed",
    }
}

impl TransitionKind {
    /// Classify the observable difference between two snapshots.
    ///
    /// `None` when nothing observable changed. When several fields change
    /// between two occupied snapshots the priority is
    /// lock > hold set > occupant set > timer.
    pub fn classify(old: &LocationState, new: &LocationState) -> Option<TransitionKind> {
        if old == new {
            return None;
        }
        if old.lock_state != new.lock_state {
            return Some(TransitionKind::LockChanged);
        }
        match (old.is_occupied, new.is_occupied) {
            (false, true) => Some(TransitionKind::Occupied),
            (true, false) => Some(TransitionKind::Vacated),
            (true, true) => {
                if old.active_holds != new.active_holds {
                    Some(TransitionKind::HoldChanged)
                } else if old.active_occupants != new.active_occupants {
                    Some(TransitionKind::IdentityChanged)
                } else if old.occupied_until != new.occupied_until {
                    Some(TransitionKind::Extended)
                } else {
                    None
                }
            }
            // Two vacant snapshots with equal locks carry nothing else
            // observable.
            (false, false) => None,
        }
    }
}

/// One observable state change, old and new snapshots included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub location_id: LocationId,
    pub old: LocationState,
    pub new: LocationState,
    pub kind: TransitionKind,
}

/// Result of an engine call: what changed, and when to poll next.
///
/// `next_expiration` drives the wake-me-up protocol: the host arms a single
/// timer at that instant and calls `check_timeouts` when it fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResult {
    pub transitions: Vec<Transition>,
    pub next_expiration: Option<DateTime<Utc>>,
}

impl EngineResult {
    /// Find this call's transition for a location, if any.
    pub fn transition_for(&self, location_id: &LocationId) -> Option<&Transition> {
        self.transitions.iter().find(|t| &t.location_id == location_id)
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
