// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock semantics: frozen locations ignore everything but manual overrides
//! and lock changes.

use occ_core::test_support::{instant, noon};
use occ_core::{LocationConfig, LockState, OccupancyEvent, TransitionKind};
use occ_engine::Engine;

fn kitchen() -> Engine {
    Engine::new(vec![LocationConfig::new("kitchen").timeout("motion", 10)]).unwrap()
}

fn lock(engine: &mut Engine, lock: LockState) {
    let event = OccupancyEvent::lock_change("kitchen", lock, "keypad", noon());
    engine.handle_event(&event, noon()).unwrap();
}

#[test]
fn frozen_location_ignores_motion() {
    let mut engine = kitchen();
    lock(&mut engine, LockState::LockedFrozen);

    let result = engine
        .handle_event(&OccupancyEvent::momentary("kitchen", "motion", "pir", noon()), noon())
        .unwrap();
    assert!(result.transitions.is_empty());
    assert!(engine.state(&"kitchen".into()).unwrap().is_vacant());
}

#[test]
fn manual_force_vacant_beats_the_lock() {
    let mut engine = kitchen();
    engine
        .handle_event(&OccupancyEvent::momentary("kitchen", "motion", "pir", noon()), noon())
        .unwrap();
    lock(&mut engine, LockState::LockedFrozen);

    let at = instant("2025-01-01T12:05:00Z");
    let result = engine
        .handle_event(&OccupancyEvent::manual("kitchen", "app", at).force(false), at)
        .unwrap();
    assert_eq!(result.transitions.len(), 1);
    assert_eq!(result.transitions[0].kind, TransitionKind::Vacated);

    let kitchen = engine.state(&"kitchen".into()).unwrap();
    assert!(kitchen.is_vacant());
    assert_eq!(kitchen.lock_state, LockState::LockedFrozen);
}

#[test]
fn unlock_restores_normal_behavior() {
    let mut engine = kitchen();
    lock(&mut engine, LockState::LockedFrozen);
    lock(&mut engine, LockState::Unlocked);

    let result = engine
        .handle_event(&OccupancyEvent::momentary("kitchen", "motion", "pir", noon()), noon())
        .unwrap();
    assert_eq!(result.transitions.len(), 1);
    assert_eq!(result.next_expiration, Some(instant("2025-01-01T12:10:00Z")));
}

#[test]
fn frozen_occupied_location_outlasts_its_timer() {
    let mut engine = kitchen();
    engine
        .handle_event(&OccupancyEvent::momentary("kitchen", "motion", "pir", noon()), noon())
        .unwrap();
    lock(&mut engine, LockState::LockedFrozen);

    let result = engine.check_timeouts(instant("2025-01-01T13:00:00Z"));
    assert!(result.transitions.is_empty());
    assert!(engine.state(&"kitchen".into()).unwrap().is_occupied);

    // Unlocking lets the overdue timer sweep normally.
    let at = instant("2025-01-01T13:00:00Z");
    engine
        .handle_event(&OccupancyEvent::lock_change("kitchen", LockState::Unlocked, "keypad", at), at)
        .unwrap();
    let result = engine.check_timeouts(at);
    assert_eq!(result.transitions.len(), 1);
    assert_eq!(result.transitions[0].kind, TransitionKind::Vacated);
}

#[test]
fn frozen_parent_keeps_children_out() {
    let mut engine = Engine::new(vec![
        LocationConfig::new("main_floor"),
        LocationConfig::new("kitchen").parent("main_floor").timeout("motion", 10),
    ])
    .unwrap();
    let event = OccupancyEvent::lock_change("main_floor", LockState::LockedFrozen, "keypad", noon());
    engine.handle_event(&event, noon()).unwrap();

    engine
        .handle_event(&OccupancyEvent::momentary("kitchen", "motion", "pir", noon()), noon())
        .unwrap();
    assert!(engine.state(&"main_floor".into()).unwrap().is_vacant());
}
