// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Precomputed parent/child adjacency for the location forest.
//!
//! Parent links are ids, never owning references; traversal is index lookup,
//! acyclic by construction-time check.

use occ_core::{ConfigError, LocationConfig, LocationId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyIndex {
    parents: HashMap<LocationId, LocationId>,
    children: HashMap<LocationId, Vec<LocationId>>,
}

impl HierarchyIndex {
    /// Validate the forest and build the adjacency maps.
    pub fn build(configs: &[LocationConfig]) -> Result<Self, ConfigError> {
        let mut ids = HashSet::new();
        for config in configs {
            if !ids.insert(config.id.clone()) {
                return Err(ConfigError::DuplicateId(config.id.clone()));
            }
        }

        let mut parents = HashMap::new();
        let mut children: HashMap<LocationId, Vec<LocationId>> = HashMap::new();
        for config in configs {
            let Some(parent) = &config.parent_id else { continue };
            if !ids.contains(parent) {
                return Err(ConfigError::UnknownParent {
                    id: config.id.clone(),
                    parent: parent.clone(),
                });
            }
            parents.insert(config.id.clone(), parent.clone());
            children.entry(parent.clone()).or_default().push(config.id.clone());
        }

        // A chain longer than the node count can only mean a cycle.
        for config in configs {
            let mut hops = 0;
            let mut cursor = &config.id;
            while let Some(parent) = parents.get(cursor) {
                hops += 1;
                if hops > configs.len() {
                    return Err(ConfigError::ParentCycle(config.id.clone()));
                }
                cursor = parent;
            }
        }

        for siblings in children.values_mut() {
            siblings.sort();
        }
        Ok(Self { parents, children })
    }

    pub fn parent(&self, id: &LocationId) -> Option<&LocationId> {
        self.parents.get(id)
    }

    pub fn children(&self, id: &LocationId) -> &[LocationId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walk from a location's parent up to its root.
    pub fn ancestors<'a>(&'a self, id: &LocationId) -> impl Iterator<Item = &'a LocationId> + 'a {
        std::iter::successors(self.parents.get(id), move |cursor| self.parents.get(*cursor))
    }
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod tests;
