// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::event::OccupancyEvent;
use crate::state::LockState;
use chrono::{DateTime, Utc};

/// Parse an RFC 3339 literal into an instant.
#[allow(clippy::expect_used)]
pub fn instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).expect("valid RFC 3339 literal").with_timezone(&Utc)
}

/// The scenario suite's `now₀`.
pub fn noon() -> DateTime<Utc> {
    instant("2025-01-01T12:00:00Z")
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn motion_event(location: &str, timestamp: DateTime<Utc>) -> OccupancyEvent {
    OccupancyEvent::momentary(location, "motion", "pir", timestamp)
}

pub fn hold_start_event(location: &str, source: &str, timestamp: DateTime<Utc>) -> OccupancyEvent {
    OccupancyEvent::hold_start(location, "presence", source, timestamp)
}

pub fn hold_end_event(location: &str, source: &str, timestamp: DateTime<Utc>) -> OccupancyEvent {
    OccupancyEvent::hold_end(location, "presence", source, timestamp)
}

pub fn force_vacant_event(location: &str, timestamp: DateTime<Utc>) -> OccupancyEvent {
    OccupancyEvent::manual(location, "app", timestamp).force(false)
}

pub fn force_occupied_event(location: &str, timestamp: DateTime<Utc>) -> OccupancyEvent {
    OccupancyEvent::manual(location, "app", timestamp).force(true)
}

pub fn lock_event(location: &str, lock: LockState, timestamp: DateTime<Utc>) -> OccupancyEvent {
    OccupancyEvent::lock_change(location, lock, "keypad", timestamp)
}

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::event::EventType;
    use crate::state::LockState;
    use proptest::prelude::*;

    pub fn arb_event_type() -> impl Strategy<Value = EventType> {
        prop_oneof![
            Just(EventType::Momentary),
            Just(EventType::HoldStart),
            Just(EventType::HoldEnd),
            Just(EventType::Manual),
            Just(EventType::LockChange),
            Just(EventType::Propagated),
        ]
    }

    /// Event types a sensor can emit (everything but the synthetic
    /// `Propagated`).
    pub fn arb_sensor_event_type() -> impl Strategy<Value = EventType> {
        prop_oneof![
            Just(EventType::Momentary),
            Just(EventType::HoldStart),
            Just(EventType::HoldEnd),
            Just(EventType::Manual),
            Just(EventType::LockChange),
        ]
    }

    pub fn arb_lock_state() -> impl Strategy<Value = LockState> {
        prop_oneof![Just(LockState::Unlocked), Just(LockState::LockedFrozen)]
    }

    pub fn arb_force_state() -> impl Strategy<Value = Option<bool>> {
        prop_oneof![Just(None), Just(Some(true)), Just(Some(false))]
    }
}
