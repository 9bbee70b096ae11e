// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! occ-engine: the hierarchical occupancy state machine.
//!
//! Pure and I/O-free: the caller supplies `now` on every call and owns the
//! single timer the returned `next_expiration` asks for.

mod engine;
mod error;
mod hierarchy;
mod kernel;
mod propagate;
mod snapshot;
mod sweep;

pub use engine::Engine;
pub use error::EngineError;
pub use hierarchy::HierarchyIndex;
pub use snapshot::{Snapshot, SnapshotEntry};
