// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types.
//!
//! Construction failures use [`occ_core::ConfigError`]; everything raised at
//! event time lives here. Tolerant paths (double-fired hold releases,
//! malformed snapshot fields) never surface as errors.

use occ_core::LocationId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The event targets a location that is not configured.
    #[error("unknown location: {0}")]
    UnknownLocation(LocationId),
}
