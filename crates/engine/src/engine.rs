// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine facade: one state map, synchronous entry points, and the
//! wake-me-up contract.
//!
//! The engine never reads a clock: every entry point takes `now` from the
//! caller and returns the next instant it wants to be polled. Concurrent
//! callers must serialize externally.

use crate::error::EngineError;
use crate::hierarchy::HierarchyIndex;
use crate::snapshot::{self, Snapshot};
use crate::{kernel, propagate, sweep};
use chrono::{DateTime, Utc};
use occ_core::{
    ConfigError, EngineResult, LocationConfig, LocationId, LocationState, LockState,
    OccupancyEvent, OccupancyStrategy, Transition, TransitionKind,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug)]
pub struct Engine {
    configs: HashMap<LocationId, LocationConfig>,
    index: HierarchyIndex,
    /// Ordered so sweeps, exports, and restores walk locations
    /// deterministically.
    states: BTreeMap<LocationId, LocationState>,
}

impl Engine {
    /// Validate the forest and initialize every location to a default
    /// vacant snapshot.
    pub fn new(configs: Vec<LocationConfig>) -> Result<Self, ConfigError> {
        let index = HierarchyIndex::build(&configs)?;
        let states =
            configs.iter().map(|c| (c.id.clone(), LocationState::default())).collect();
        let configs = configs.into_iter().map(|c| (c.id.clone(), c)).collect();
        Ok(Self { configs, index, states })
    }

    /// Run the kernel on the targeted location, propagate up the ancestor
    /// chain, and recompute the next wake-up instant.
    pub fn handle_event(
        &mut self,
        event: &OccupancyEvent,
        now: DateTime<Utc>,
    ) -> Result<EngineResult, EngineError> {
        let Some(config) = self.configs.get(&event.location_id) else {
            return Err(EngineError::UnknownLocation(event.location_id.clone()));
        };
        let old = self.states.get(&event.location_id).cloned().unwrap_or_default();
        let (new, kind) = kernel::apply(&old, event, now, config);

        let mut transitions = Vec::new();
        if let Some(kind) = kind {
            debug!(location = %event.location_id, event = %event.event_type, %kind, "transition");
            self.states.insert(event.location_id.clone(), new.clone());
            transitions.push(Transition {
                location_id: event.location_id.clone(),
                old: old.clone(),
                new,
                kind,
            });
            // Lock flips stay local; everything else may concern ancestors.
            if kind != TransitionKind::LockChanged {
                propagate::run(self, &event.location_id, &old, now, &mut transitions);
            }
        }

        Ok(EngineResult { transitions, next_expiration: self.next_expiration() })
    }

    /// Vacate every location whose timer has run out, then recompute the
    /// next wake-up instant. Arriving late is harmless; early is a no-op.
    pub fn check_timeouts(&mut self, now: DateTime<Utc>) -> EngineResult {
        let transitions = sweep::run(self, now);
        EngineResult { transitions, next_expiration: self.next_expiration() }
    }

    /// Effective snapshot of a location.
    ///
    /// A would-be-vacant `FollowParent` location reports occupied while an
    /// ancestor is occupied; the overlay is never stored, so the follower
    /// carries no timer of its own.
    pub fn state(&self, id: &LocationId) -> Option<LocationState> {
        let raw = self.states.get(id)?;
        let config = self.configs.get(id)?;
        if config.occupancy_strategy == OccupancyStrategy::FollowParent
            && raw.is_vacant()
            && self.has_occupied_ancestor(id)
        {
            let mut view = raw.clone();
            view.is_occupied = true;
            return Some(view);
        }
        Some(raw.clone())
    }

    /// Export every non-default snapshot.
    pub fn export_state(&self) -> Snapshot {
        snapshot::export(&self.states)
    }

    /// Replace the state map from a snapshot with stale-data protection,
    /// then recompute the next wake-up instant. The host should call
    /// [`check_timeouts`](Self::check_timeouts) immediately afterward.
    pub fn restore_state(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> EngineResult {
        let transitions = snapshot::restore(self, snapshot, now);
        EngineResult { transitions, next_expiration: self.next_expiration() }
    }

    /// The earliest instant any non-held timer fires. Frozen timers never
    /// fire, so they do not drive wake-ups.
    fn next_expiration(&self) -> Option<DateTime<Utc>> {
        self.states
            .values()
            .filter(|state| {
                state.active_holds.is_empty() && state.lock_state == LockState::Unlocked
            })
            .filter_map(|state| state.occupied_until)
            .min()
    }

    pub(crate) fn has_occupied_ancestor(&self, id: &LocationId) -> bool {
        self.index
            .ancestors(id)
            .any(|ancestor| self.states.get(ancestor).is_some_and(|s| s.is_occupied))
    }

    pub(crate) fn index(&self) -> &HierarchyIndex {
        &self.index
    }

    pub(crate) fn config(&self, id: &LocationId) -> Option<&LocationConfig> {
        self.configs.get(id)
    }

    pub(crate) fn is_configured(&self, id: &LocationId) -> bool {
        self.configs.contains_key(id)
    }

    pub(crate) fn raw_state(&self, id: &LocationId) -> Option<&LocationState> {
        self.states.get(id)
    }

    pub(crate) fn states(&self) -> &BTreeMap<LocationId, LocationState> {
        &self.states
    }

    pub(crate) fn replace_state(&mut self, id: LocationId, state: LocationState) {
        self.states.insert(id, state);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
