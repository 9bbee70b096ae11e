// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Occupancy events, the engine's only input.

use crate::id::{LocationId, OccupantId, SourceId};
use crate::state::LockState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout-lookup category used by synthetic parent contributions.
pub const PROPAGATED_CATEGORY: &str = "propagated";

/// What kind of signal an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A transient pulse (motion) that starts or extends a bounded timer.
    Momentary,
    /// A device began continuously asserting presence.
    HoldStart,
    /// A device stopped asserting presence.
    HoldEnd,
    /// Manual override from the host (force occupied/vacant, or a plain pulse).
    Manual,
    /// Lock or unlock the location.
    LockChange,
    /// Synthetic child→parent contribution built by the propagation driver.
    /// Never originates from a sensor.
    Propagated,
}

impl EventType {
    /// Whether this event passes the lock gate on a frozen location.
    pub fn bypasses_lock(self) -> bool {
        matches!(self, EventType::Manual | EventType::LockChange)
    }
}

crate::simple_display! {
    EventType {
        Momentary => "momentary",
        HoldStart => "hold_start",
        HoldEnd => "hold_end",
        Manual => "manual",
        LockChange => "lock_change",
        Propagated => "propagated",
    }
}

/// An immutable occupancy input.
///
/// Sensor-facing constructors cover the common shapes; the optional fields
/// chain on afterwards. `occupants` is freight for synthetic propagated
/// events (identity merges and removals) and stays empty on sensor events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyEvent {
    pub location_id: LocationId,
    pub event_type: EventType,
    /// Key for the per-location timeout lookup (e.g. "motion", "presence").
    pub category: String,
    /// Device asserting the event, or the child location for `Propagated`.
    pub source_id: SourceId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant_id: Option<OccupantId>,
    /// Explicit duration overriding the config lookup.
    #[serde(default, with = "opt_duration_ms", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// `Manual` only: Some(true) forces occupied, Some(false) forces vacant,
    /// None processes as an ordinary pulse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_state: Option<bool>,
    /// `LockChange` only: the lock value to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_state: Option<LockState>,
    /// Identities carried by synthetic propagated events: merged into the
    /// target on `Propagated`, removed on `HoldEnd`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occupants: Vec<OccupantId>,
    /// Identities a still-contributing child dropped; removed from the
    /// target on `Propagated`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub departed: Vec<OccupantId>,
}

impl OccupancyEvent {
    fn new(
        location_id: impl Into<LocationId>,
        event_type: EventType,
        category: impl Into<String>,
        source_id: impl Into<SourceId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            event_type,
            category: category.into(),
            source_id: source_id.into(),
            timestamp,
            occupant_id: None,
            duration: None,
            force_state: None,
            lock_state: None,
            occupants: Vec::new(),
            departed: Vec::new(),
        }
    }

    pub fn momentary(
        location_id: impl Into<LocationId>,
        category: impl Into<String>,
        source_id: impl Into<SourceId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(location_id, EventType::Momentary, category, source_id, timestamp)
    }

    pub fn hold_start(
        location_id: impl Into<LocationId>,
        category: impl Into<String>,
        source_id: impl Into<SourceId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(location_id, EventType::HoldStart, category, source_id, timestamp)
    }

    pub fn hold_end(
        location_id: impl Into<LocationId>,
        category: impl Into<String>,
        source_id: impl Into<SourceId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(location_id, EventType::HoldEnd, category, source_id, timestamp)
    }

    /// Manual override. Chain [`force`](Self::force) to pick a direction;
    /// without it the event processes as an ordinary pulse.
    pub fn manual(
        location_id: impl Into<LocationId>,
        source_id: impl Into<SourceId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(location_id, EventType::Manual, "manual", source_id, timestamp)
    }

    pub fn lock_change(
        location_id: impl Into<LocationId>,
        lock_state: LockState,
        source_id: impl Into<SourceId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut event =
            Self::new(location_id, EventType::LockChange, "lock", source_id, timestamp);
        event.lock_state = Some(lock_state);
        event
    }

    /// Synthetic contribution from `child` to `parent`. Without a chained
    /// duration it behaves as a hold keyed by the child id.
    pub fn propagated(
        parent: impl Into<LocationId>,
        child: &LocationId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(
            parent,
            EventType::Propagated,
            PROPAGATED_CATEGORY,
            SourceId::from(child),
            timestamp,
        )
    }

    pub fn occupant(mut self, occupant_id: impl Into<OccupantId>) -> Self {
        self.occupant_id = Some(occupant_id.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn force(mut self, occupied: bool) -> Self {
        self.force_state = Some(occupied);
        self
    }

    pub fn carrying(mut self, occupants: impl IntoIterator<Item = OccupantId>) -> Self {
        self.occupants = occupants.into_iter().collect();
        self
    }

    pub fn departing(mut self, occupants: impl IntoIterator<Item = OccupantId>) -> Self {
        self.departed = occupants.into_iter().collect();
        self
    }
}

mod opt_duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let millis = Option::<u64>::deserialize(d)?;
        Ok(millis.map(Duration::from_millis))
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
