//! Test utilities shared by unit tests and integration tests.
//!
//! Compiled for `cargo test` and when the `test-support` feature is enabled.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock whose time only moves when a test advances it.
///
/// # Examples
/// ```
/// use habits_backend::test_support::MutableClock;
/// use mockable::Clock;
///
/// let clock = MutableClock::fixed();
/// let before = clock.utc();
/// clock.advance_seconds(5);
/// assert_eq!((clock.utc() - before).num_seconds(), 5);
/// ```
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock pinned at 2025-01-01T00:00:00Z.
    pub fn fixed() -> Self {
        Self::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default())
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn advancing_moves_time_forward() {
        let clock = MutableClock::fixed();
        let start = clock.utc();
        clock.advance_seconds(90);
        assert_eq!(clock.utc() - start, TimeDelta::seconds(90));
    }
}
