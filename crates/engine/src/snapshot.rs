// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot export and restore with stale-data protection.
//!
//! The wire format is a map of `location_id → entry`; fully-default
//! locations are omitted. Restore is tolerant: unknown locations are
//! skipped, unknown fields ignored, malformed timestamps degrade to none.

use crate::engine::Engine;
use chrono::{DateTime, Utc};
use occ_core::{
    LocationId, LocationState, LockState, OccupantId, SourceId, Transition, TransitionKind,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Exported engine state, keyed by location id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub BTreeMap<LocationId, SnapshotEntry>);

/// One location's persisted state.
///
/// Every field is optional on the way in so that partial or damaged
/// snapshots still restore what they can.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    #[serde(default)]
    pub is_occupied: bool,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub occupied_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_occupants: BTreeSet<OccupantId>,
    #[serde(default)]
    pub active_holds: BTreeSet<SourceId>,
    #[serde(default)]
    pub lock_state: LockState,
}

impl SnapshotEntry {
    fn from_state(state: &LocationState) -> Self {
        Self {
            is_occupied: state.is_occupied,
            occupied_until: state.occupied_until,
            active_occupants: state.active_occupants.clone(),
            active_holds: state.active_holds.clone(),
            lock_state: state.lock_state,
        }
    }

    /// Convert to a runtime snapshot, normalizing occupancy so that live
    /// holds or identities always read as occupied.
    fn into_state(self) -> LocationState {
        let held = !self.active_holds.is_empty() || !self.active_occupants.is_empty();
        let is_occupied = self.is_occupied || held;
        LocationState {
            is_occupied,
            occupied_until: if is_occupied { self.occupied_until } else { None },
            active_occupants: self.active_occupants,
            active_holds: self.active_holds,
            lock_state: self.lock_state,
        }
    }
}

pub(crate) fn export(states: &BTreeMap<LocationId, LocationState>) -> Snapshot {
    Snapshot(
        states
            .iter()
            .filter(|(_, state)| !state.is_default())
            .map(|(id, state)| (id.clone(), SnapshotEntry::from_state(state)))
            .collect(),
    )
}

pub(crate) fn restore(
    engine: &mut Engine,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
) -> Vec<Transition> {
    for unknown in snapshot.0.keys().filter(|id| !engine.is_configured(id)) {
        warn!(location = %unknown, "snapshot entry for unconfigured location; skipping");
    }

    let ids: Vec<LocationId> = engine.states().keys().cloned().collect();
    let mut transitions = Vec::new();
    for id in ids {
        let old = engine.raw_state(&id).cloned().unwrap_or_default();
        let new = match snapshot.0.get(&id) {
            None => LocationState::default(),
            Some(entry) => protected(entry.clone().into_state(), now, &id),
        };
        let kind = TransitionKind::classify(&old, &new);
        engine.replace_state(id.clone(), new.clone());
        if let Some(kind) = kind {
            transitions.push(Transition { location_id: id, old, new, kind });
        }
    }
    transitions
}

/// Stale-data protection: locks are timeless, live presence outweighs an
/// expired timer, and an expired timer without presence restores vacant.
fn protected(candidate: LocationState, now: DateTime<Utc>, id: &LocationId) -> LocationState {
    if candidate.lock_state == LockState::LockedFrozen {
        return candidate;
    }
    if candidate.is_held() {
        return candidate;
    }
    if candidate.occupied_until.is_some_and(|until| until <= now) {
        warn!(location = %id, "stale timer in snapshot; restoring vacant");
        return LocationState::default();
    }
    candidate
}

fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => match DateTime::parse_from_rfc3339(&text) {
            Ok(instant) => Some(instant.with_timezone(&Utc)),
            Err(error) => {
                warn!(%error, value = %text, "malformed occupied_until in snapshot");
                None
            }
        },
        Some(other) => {
            warn!(value = %other, "malformed occupied_until in snapshot");
            None
        }
    })
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
