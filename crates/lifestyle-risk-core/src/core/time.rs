// crates/lifestyle-risk-core/src/core/time.rs
// ============================================================================
// Module: Lifestyle Risk Time Model
// Description: Canonical timestamp representation for prediction records.
// Purpose: Keep record timestamps explicit and host-supplied.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The core never reads wall-clock time directly. Hosts supply timestamps
//! through the [`crate::Clock`] interface, which keeps the pipeline
//! deterministic under test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Creation timestamp attached to prediction records.
///
/// # Invariants
/// - Values are unix epoch milliseconds supplied by the host.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(value: i64) -> Self {
        Self(value)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
