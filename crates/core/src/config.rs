// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static per-location configuration.

use crate::id::LocationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default timer started by a pulse (motion) when the event carries no
/// duration and the config has no entry for the event's category.
pub const DEFAULT_PULSE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Trailing timeout after the last hold releases, giving transient sensors
/// time to reacquire before the location vacates.
pub const HOLD_RELEASE_TIMEOUT: Duration = Duration::from_secs(2 * 60);

/// Physical or virtual nature of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationKind {
    /// A physical area with its own sensors.
    Area,
    /// A virtual container (floor, zone) aggregating children.
    Virtual,
}

impl Default for LocationKind {
    fn default() -> Self {
        LocationKind::Area
    }
}

crate::simple_display! {
    LocationKind {
        Area => "area",
        Virtual => "virtual",
    }
}

/// How a location derives its occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupancyStrategy {
    /// Occupancy comes only from the location's own events.
    Independent,
    /// A would-be-vacant location reports occupied while an ancestor is
    /// occupied. Resolved at query time; never stored.
    FollowParent,
}

impl Default for OccupancyStrategy {
    fn default() -> Self {
        OccupancyStrategy::Independent
    }
}

crate::simple_display! {
    OccupancyStrategy {
        Independent => "independent",
        FollowParent => "follow_parent",
    }
}

/// Immutable static rule for one node of the location tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub id: LocationId,
    /// Parent link by id; the parent relation must form a forest.
    #[serde(default, alias = "parent", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<LocationId>,
    #[serde(default)]
    pub kind: LocationKind,
    #[serde(default)]
    pub occupancy_strategy: OccupancyStrategy,
    /// When false, this location never propagates occupancy upward
    /// (the "backyard" rule).
    #[serde(default = "default_true")]
    pub contributes_to_parent: bool,
    /// Category → timeout in whole minutes (e.g. `motion = 10`).
    /// Missing categories fall back to the engine defaults.
    #[serde(default)]
    pub timeouts: BTreeMap<String, u64>,
}

fn default_true() -> bool {
    true
}

impl LocationConfig {
    pub fn new(id: impl Into<LocationId>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            kind: LocationKind::default(),
            occupancy_strategy: OccupancyStrategy::default(),
            contributes_to_parent: true,
            timeouts: BTreeMap::new(),
        }
    }

    pub fn parent(mut self, id: impl Into<LocationId>) -> Self {
        self.parent_id = Some(id.into());
        self
    }

    pub fn kind(mut self, kind: LocationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn strategy(mut self, strategy: OccupancyStrategy) -> Self {
        self.occupancy_strategy = strategy;
        self
    }

    pub fn contributes(mut self, contributes: bool) -> Self {
        self.contributes_to_parent = contributes;
        self
    }

    pub fn timeout(mut self, category: impl Into<String>, minutes: u64) -> Self {
        self.timeouts.insert(category.into(), minutes);
        self
    }

    /// Resolve the configured timeout for a category, falling back to the
    /// given engine default.
    pub fn timeout_for(&self, category: &str, fallback: Duration) -> Duration {
        self.timeouts
            .get(category)
            .map(|minutes| Duration::from_secs(minutes * 60))
            .unwrap_or(fallback)
    }
}

/// Errors raised while assembling the location forest.
///
/// All of these are fatal at engine construction; nothing is validated
/// lazily afterwards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("duplicate location id: {0}")]
    DuplicateId(LocationId),

    #[error("location {id} references unknown parent {parent}")]
    UnknownParent { id: LocationId, parent: LocationId },

    #[error("parent cycle involving location {0}")]
    ParentCycle(LocationId),

    #[error("invalid locations document: {0}")]
    Parse(String),
}

#[derive(Deserialize)]
struct LocationsDoc {
    #[serde(default, rename = "location")]
    locations: Vec<LocationConfig>,
}

/// Parse a `[[location]]` TOML document into location configs.
///
/// Convenience for hosts and tests; the engine itself takes ready-made
/// configs. Forest validation happens at engine construction, not here.
pub fn locations_from_toml(doc: &str) -> Result<Vec<LocationConfig>, ConfigError> {
    let parsed: LocationsDoc =
        toml::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(parsed.locations)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
