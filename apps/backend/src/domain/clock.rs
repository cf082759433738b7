//! Countdown derived only from a round's absolute start instant.

use time::{Duration, OffsetDateTime};

/// Stateless view over a round's timing; every caller computing at the same
/// `now` gets the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundClock {
    started_at: OffsetDateTime,
    duration: Duration,
}

impl RoundClock {
    pub fn new(started_at: OffsetDateTime, duration_minutes: i16) -> Self {
        Self {
            started_at,
            duration: Duration::minutes(i64::from(duration_minutes.max(0))),
        }
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration.whole_seconds()
    }

    pub fn ends_at(&self) -> OffsetDateTime {
        self.started_at + self.duration
    }

    /// Whole seconds left, clamped to `[0, duration]`.
    pub fn remaining_seconds(&self, now: OffsetDateTime) -> i64 {
        let elapsed = (now - self.started_at).whole_seconds();
        let total = self.duration_seconds();
        (total - elapsed).clamp(0, total)
    }

    pub fn is_over(&self, now: OffsetDateTime) -> bool {
        self.remaining_seconds(now) == 0
    }
}
