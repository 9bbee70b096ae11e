// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for locations, devices, and people.

crate::define_id! {
    /// Unique identifier for a configured location (room, floor, zone).
    ///
    /// Location IDs come from static configuration; the engine never
    /// generates them. A location's ID doubles as the `source_id` of the
    /// synthetic events it contributes to its parent.
    pub struct LocationId;
}

crate::define_id! {
    /// Identifier of the device (or child location) asserting presence.
    pub struct SourceId;
}

crate::define_id! {
    /// Identity string for a person believed present.
    pub struct OccupantId;
}

impl From<&LocationId> for SourceId {
    fn from(id: &LocationId) -> Self {
        SourceId::new(id.as_str())
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
