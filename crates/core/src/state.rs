// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime occupancy snapshots.
//!
//! Snapshots are immutable: the transition kernel replaces whole values and
//! never mutates one in place, so readers may hold references indefinitely.

use crate::id::{OccupantId, SourceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lock state of a location.
///
/// Serialized names are part of the snapshot wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockState {
    Unlocked,
    /// Frozen: only manual and lock-change events touch the snapshot.
    LockedFrozen,
}

impl Default for LockState {
    fn default() -> Self {
        LockState::Unlocked
    }
}

crate::simple_display! {
    LockState {
        Unlocked => "unlocked",
        LockedFrozen => "locked_frozen",
    }
}

/// Immutable runtime snapshot of one location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState {
    pub is_occupied: bool,
    /// The instant the location goes vacant unless something keeps it open.
    /// `None` while occupied means indefinitely occupied.
    #[serde(default)]
    pub occupied_until: Option<DateTime<Utc>>,
    /// Identities currently believed present.
    #[serde(default)]
    pub active_occupants: BTreeSet<OccupantId>,
    /// One entry per device currently asserting presence.
    #[serde(default)]
    pub active_holds: BTreeSet<SourceId>,
    #[serde(default)]
    pub lock_state: LockState,
}

impl LocationState {
    pub fn is_vacant(&self) -> bool {
        !self.is_occupied
    }

    /// Whether holds or identities keep this location open.
    pub fn is_held(&self) -> bool {
        !self.active_holds.is_empty() || !self.active_occupants.is_empty()
    }

    /// Occupied with no timer: vacates only on an explicit event.
    pub fn is_indefinite(&self) -> bool {
        self.is_occupied && self.occupied_until.is_none()
    }

    /// Whether this snapshot would be omitted from an exported snapshot.
    pub fn is_default(&self) -> bool {
        *self == LocationState::default()
    }

    /// Vacancy cleanup: everything clears except the lock. Identity does not
    /// survive a vacancy.
    pub fn cleared(&self) -> Self {
        Self { lock_state: self.lock_state, ..Self::default() }
    }
}

crate::builder! {
    pub struct LocationStateBuilder => LocationState {
        set {
            is_occupied: bool = false,
            active_occupants: BTreeSet<OccupantId> = BTreeSet::new(),
            active_holds: BTreeSet<SourceId> = BTreeSet::new(),
            lock_state: LockState = LockState::Unlocked,
        }
        option {
            occupied_until: DateTime<Utc> = None,
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
