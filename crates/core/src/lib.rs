// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! occ-core: Value types for the hierarchical occupancy engine

pub mod macros;

pub mod config;
pub mod event;
pub mod id;
pub mod state;
pub mod transition;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{
    locations_from_toml, ConfigError, LocationConfig, LocationKind, OccupancyStrategy,
    DEFAULT_PULSE_TIMEOUT, HOLD_RELEASE_TIMEOUT,
};
pub use event::{EventType, OccupancyEvent, PROPAGATED_CATEGORY};
pub use id::{LocationId, OccupantId, SourceId};
pub use state::{LocationState, LockState};
pub use transition::{EngineResult, Transition, TransitionKind};
