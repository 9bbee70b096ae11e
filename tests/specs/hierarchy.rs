// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical propagation and the vacancy asymmetry.

use occ_core::test_support::{instant, noon};
use occ_core::{LocationConfig, OccupancyEvent, OccupancyStrategy, TransitionKind};
use occ_engine::Engine;
use std::time::Duration;

#[test]
fn vacancy_asymmetry() {
    let mut engine = Engine::new(vec![
        LocationConfig::new("main_floor").timeout("propagated", 5),
        LocationConfig::new("kitchen").parent("main_floor"),
    ])
    .unwrap();

    let event = OccupancyEvent::momentary("kitchen", "motion", "pir", noon())
        .duration(Duration::from_secs(10 * 60));
    engine.handle_event(&event, noon()).unwrap();

    assert_eq!(
        engine.state(&"kitchen".into()).unwrap().occupied_until,
        Some(instant("2025-01-01T12:10:00Z"))
    );
    assert_eq!(
        engine.state(&"main_floor".into()).unwrap().occupied_until,
        Some(instant("2025-01-01T12:10:00Z"))
    );

    // Nothing vacates early; both expire together on their own timers.
    assert!(engine.check_timeouts(instant("2025-01-01T12:09:00Z")).transitions.is_empty());
    let result = engine.check_timeouts(instant("2025-01-01T12:10:00Z"));
    let order: Vec<&str> = result.transitions.iter().map(|t| t.location_id.as_str()).collect();
    assert_eq!(order, vec!["kitchen", "main_floor"]);
    assert!(result.transitions.iter().all(|t| t.kind == TransitionKind::Vacated));
}

#[test]
fn child_vacated_alone_never_transitions_a_timed_parent() {
    let mut engine = Engine::new(vec![
        LocationConfig::new("main_floor").timeout("propagated", 30),
        LocationConfig::new("kitchen").parent("main_floor").timeout("motion", 5),
    ])
    .unwrap();
    engine
        .handle_event(&OccupancyEvent::momentary("kitchen", "motion", "pir", noon()), noon())
        .unwrap();
    // The floor's propagated timer outlives the kitchen's.
    engine
        .handle_event(
            &OccupancyEvent::momentary("main_floor", "propagated", "hall_pir", noon()),
            noon(),
        )
        .unwrap();

    let result = engine.check_timeouts(instant("2025-01-01T12:05:00Z"));
    let order: Vec<&str> = result.transitions.iter().map(|t| t.location_id.as_str()).collect();
    assert_eq!(order, vec!["kitchen"]);
    assert!(engine.state(&"main_floor".into()).unwrap().is_occupied);
}

#[test]
fn grandparent_chain_settles_in_one_call() {
    let mut engine = Engine::new(vec![
        LocationConfig::new("house"),
        LocationConfig::new("upstairs").parent("house"),
        LocationConfig::new("bedroom").parent("upstairs").timeout("motion", 15),
    ])
    .unwrap();

    let result = engine
        .handle_event(&OccupancyEvent::momentary("bedroom", "motion", "pir", noon()), noon())
        .unwrap();
    assert_eq!(result.transitions.len(), 3);
    for id in ["bedroom", "upstairs", "house"] {
        assert_eq!(
            engine.state(&id.into()).unwrap().occupied_until,
            Some(instant("2025-01-01T12:15:00Z")),
            "{id}"
        );
    }
}

#[test]
fn backyard_rule_isolates_subtrees() {
    let mut engine = Engine::new(vec![
        LocationConfig::new("property"),
        LocationConfig::new("backyard").parent("property").contributes(false),
        LocationConfig::new("shed").parent("backyard"),
    ])
    .unwrap();

    // The shed contributes to the backyard, but the backyard keeps it all
    // to itself.
    let result = engine
        .handle_event(&OccupancyEvent::momentary("shed", "motion", "pir", noon()), noon())
        .unwrap();
    let order: Vec<&str> = result.transitions.iter().map(|t| t.location_id.as_str()).collect();
    assert_eq!(order, vec!["shed", "backyard"]);
    assert!(engine.state(&"property".into()).unwrap().is_vacant());
}

#[test]
fn follow_parent_follows_across_levels() {
    let mut engine = Engine::new(vec![
        LocationConfig::new("house"),
        LocationConfig::new("main_floor").parent("house"),
        LocationConfig::new("pantry")
            .parent("main_floor")
            .strategy(OccupancyStrategy::FollowParent),
        LocationConfig::new("kitchen").parent("main_floor").timeout("motion", 10),
    ])
    .unwrap();

    engine
        .handle_event(&OccupancyEvent::momentary("kitchen", "motion", "pir", noon()), noon())
        .unwrap();

    let pantry = engine.state(&"pantry".into()).unwrap();
    assert!(pantry.is_occupied);
    assert!(pantry.occupied_until.is_none());

    engine.check_timeouts(instant("2025-01-01T12:10:00Z"));
    assert!(engine.state(&"pantry".into()).unwrap().is_vacant());
}
