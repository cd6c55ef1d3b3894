//! Construction deadline evaluation
//!
//! Pure computation of a client's construction deadline and whether it has
//! passed or is close. The caller supplies `now` so results are reproducible.

use chrono::{DateTime, TimeDelta, Utc};

/// Days remaining (inclusive) at which a deadline counts as near
pub const NEAR_DEADLINE_DAYS: i64 = 5;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Deadline state of one construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineStatus {
    /// Start plus the construction duration
    pub deadline: DateTime<Utc>,
    /// Whole days until the deadline, rounded up; negative once passed
    pub days_left: i64,
    /// `now` is strictly after the deadline
    pub passed: bool,
    /// `0 <= days_left <= threshold`
    pub near: bool,
}

impl DeadlineStatus {
    /// Evaluate with the default threshold of five days
    pub fn evaluate(now: DateTime<Utc>, start: DateTime<Utc>, duration_days: i64) -> Self {
        Self::evaluate_with_threshold(now, start, duration_days, NEAR_DEADLINE_DAYS)
    }

    /// Evaluate with an explicit "near" threshold in days
    ///
    /// `passed` and `near` are independent: during the first (partial) day
    /// after the deadline both hold.
    pub fn evaluate_with_threshold(
        now: DateTime<Utc>,
        start: DateTime<Utc>,
        duration_days: i64,
        near_days: i64,
    ) -> Self {
        let deadline = deadline_after(start, duration_days);
        let days_left = ceil_days((deadline - now).num_milliseconds());

        Self {
            deadline,
            days_left,
            passed: now > deadline,
            near: (0..=near_days).contains(&days_left),
        }
    }

    /// Either flag set; the card highlights both the same way
    pub fn needs_attention(&self) -> bool {
        self.passed || self.near
    }
}

/// `start` plus whole days, clamped to the representable range
fn deadline_after(start: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    TimeDelta::try_days(days)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

fn ceil_days(millis: i64) -> i64 {
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}
