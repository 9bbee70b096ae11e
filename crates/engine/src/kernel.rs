// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-location transition kernel.
//!
//! `apply` is a pure function from `(state, event, now, config)` to a new
//! snapshot plus the observable transition kind. All engine mutation funnels
//! through here; callers replace whole snapshots with the result.
//!
//! Phase order matters: lock gate, then lock/manual handling, then identity
//! and hold updates, then expiration, so later phases see the updated sets.

use chrono::{DateTime, Utc};
use occ_core::{
    EventType, LocationConfig, LocationState, LockState, OccupancyEvent, TransitionKind,
    DEFAULT_PULSE_TIMEOUT, HOLD_RELEASE_TIMEOUT,
};
use std::time::Duration;

pub(crate) fn apply(
    state: &LocationState,
    event: &OccupancyEvent,
    now: DateTime<Utc>,
    config: &LocationConfig,
) -> (LocationState, Option<TransitionKind>) {
    // Lock gate: a frozen location swallows everything except manual and
    // lock-change events, propagated ones included.
    if state.lock_state == LockState::LockedFrozen && !event.event_type.bypasses_lock() {
        return (state.clone(), None);
    }

    let mut next = state.clone();

    match event.event_type {
        EventType::LockChange => {
            if let Some(lock) = event.lock_state {
                next.lock_state = lock;
            }
            return finish(state, next);
        }
        EventType::Manual => match event.force_state {
            Some(true) => {
                next.is_occupied = true;
                // Active holds dominate a finite manual override.
                next.occupied_until = if next.active_holds.is_empty() {
                    event.duration.map(|d| now + d)
                } else {
                    None
                };
                return finish(state, next);
            }
            Some(false) => return finish(state, state.cleared()),
            // Without a direction, a manual event is an ordinary pulse.
            None => {}
        },
        _ => {}
    }

    update_identities(&mut next, event);
    let hold_removed = update_holds(&mut next, event);
    update_expiry(&mut next, state, event, now, config, hold_removed);

    finish(state, next)
}

fn finish(old: &LocationState, new: LocationState) -> (LocationState, Option<TransitionKind>) {
    let kind = TransitionKind::classify(old, &new);
    (new, kind)
}

fn update_identities(next: &mut LocationState, event: &OccupancyEvent) {
    match event.event_type {
        EventType::HoldStart | EventType::Momentary => {
            if let Some(occupant) = &event.occupant_id {
                next.active_occupants.insert(occupant.clone());
            }
        }
        EventType::Propagated => {
            next.active_occupants.extend(event.occupants.iter().cloned());
            for occupant in &event.departed {
                next.active_occupants.remove(occupant);
            }
        }
        EventType::HoldEnd => {
            if let Some(occupant) = &event.occupant_id {
                next.active_occupants.remove(occupant);
            }
            for occupant in &event.occupants {
                next.active_occupants.remove(occupant);
            }
        }
        _ => {}
    }
}

/// Returns whether the event actually removed a hold (sensors double-fire;
/// removing an absent source is a tolerated no-op).
fn update_holds(next: &mut LocationState, event: &OccupancyEvent) -> bool {
    match event.event_type {
        EventType::HoldStart => {
            next.active_holds.insert(event.source_id.clone());
            false
        }
        // A propagated event with no finite remainder is a hold keyed by
        // the contributing child.
        EventType::Propagated if event.duration.is_none() => {
            next.active_holds.insert(event.source_id.clone());
            false
        }
        EventType::HoldEnd => next.active_holds.remove(&event.source_id),
        _ => false,
    }
}

fn update_expiry(
    next: &mut LocationState,
    old: &LocationState,
    event: &OccupancyEvent,
    now: DateTime<Utc>,
    config: &LocationConfig,
    hold_removed: bool,
) {
    match event.event_type {
        EventType::HoldStart => {
            next.is_occupied = true;
            next.occupied_until = None;
        }
        EventType::Propagated if event.duration.is_none() => {
            next.is_occupied = true;
            next.occupied_until = None;
        }
        EventType::HoldEnd => {
            let changed = hold_removed || old.active_occupants != next.active_occupants;
            if !changed {
                return;
            }
            if next.is_held() {
                // Other devices or identities still keep it open.
                next.is_occupied = true;
                next.occupied_until = None;
            } else if old.is_occupied {
                // Fudge factor: trail the release so transient sensors can
                // reacquire before the location vacates. A timer that is
                // already running never shortens.
                let trailing = now + effective_duration(event, config, HOLD_RELEASE_TIMEOUT);
                next.is_occupied = true;
                next.occupied_until = match next.occupied_until {
                    Some(current) => Some(current.max(trailing)),
                    None => Some(trailing),
                };
            }
        }
        EventType::Momentary | EventType::Manual | EventType::Propagated => {
            if !next.active_holds.is_empty() {
                next.is_occupied = true;
                next.occupied_until = None;
                return;
            }
            let duration = effective_duration(event, config, DEFAULT_PULSE_TIMEOUT);
            let expiry = event.timestamp + duration;
            next.is_occupied = true;
            // Timers never shorten; an indefinite timer downgrades only when
            // no hold can re-assert it.
            next.occupied_until = match next.occupied_until {
                Some(current) => Some(current.max(expiry)),
                None => Some(expiry),
            };
        }
        EventType::LockChange => {}
    }
}

fn effective_duration(
    event: &OccupancyEvent,
    config: &LocationConfig,
    fallback: Duration,
) -> Duration {
    event.duration.unwrap_or_else(|| config.timeout_for(&event.category, fallback))
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
