// crates/lifestyle-risk-server/src/clock.rs
// ============================================================================
// Module: System Clock
// Description: Wall-clock time source for prediction records.
// Dependencies: lifestyle-risk-core
// ============================================================================

//! Wall-clock time source for prediction records.

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use lifestyle_risk_core::Clock;
use lifestyle_risk_core::Timestamp;

/// Clock backed by the host wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Timestamp::from_unix_millis(i64::try_from(now.as_millis()).unwrap_or(i64::MAX))
    }
}
