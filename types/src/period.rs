//! Period arithmetic.
//!
//! The proposal pipeline is clocked in fixed-length periods counted from the
//! summoning time. Voting and grace windows are expressed as period counts,
//! never as raw seconds.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Converts host timestamps into period indices.
///
/// Period 0 starts at `summoning_time`; the clock never runs backwards
/// because elapsed time saturates at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodClock {
    summoning_time: Timestamp,
    period_duration_secs: u64,
}

impl PeriodClock {
    /// Create a clock. `period_duration_secs` must be non-zero — enforced by
    /// `GuildConfig::validate` before any clock is constructed.
    pub fn new(summoning_time: Timestamp, period_duration_secs: u64) -> Self {
        debug_assert!(period_duration_secs > 0);
        Self {
            summoning_time,
            period_duration_secs,
        }
    }

    pub fn summoning_time(&self) -> Timestamp {
        self.summoning_time
    }

    /// The period index containing `now`.
    pub fn current_period(&self, now: Timestamp) -> u64 {
        now.seconds_since(self.summoning_time) / self.period_duration_secs
    }

    /// The earliest timestamp falling inside `period`. Useful for tests that
    /// need to "move forward N periods".
    pub fn period_start(&self, period: u64) -> Timestamp {
        Timestamp::new(
            self.summoning_time
                .as_secs()
                .saturating_add(period.saturating_mul(self.period_duration_secs)),
        )
    }
}
