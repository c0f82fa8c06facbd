//! Time sources
//!
//! Everything that reads "now" goes through a [`Clock`], so the craving flow and
//! its timers can be driven deterministically in tests.

use std::cell::Cell;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Source of wall-clock and monotonic time
pub trait Clock {
    /// Current wall-clock time (used for quit timestamps)
    fn now(&self) -> DateTime<Utc>;

    /// Current monotonic instant (used for timer deadlines)
    fn instant(&self) -> Instant;
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock
///
/// Wall time and monotonic time move together when [`ManualClock::advance`] is
/// called. [`ManualClock::set_now`] only moves the wall clock, which is how clock
/// skew is simulated.
#[derive(Debug)]
pub struct ManualClock {
    base_instant: Instant,
    base_wall: DateTime<Utc>,
    offset: Cell<Duration>,
    wall_override: Cell<Option<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock frozen at the given wall time
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            base_instant: Instant::now(),
            base_wall: start,
            offset: Cell::new(Duration::ZERO),
            wall_override: Cell::new(None),
        }
    }

    /// Move both clocks forward
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
        if let Some(wall) = self.wall_override.get() {
            let step = chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
            self.wall_override.set(Some(wall + step));
        }
    }

    /// Move both clocks forward by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Pin the wall clock to a specific time (monotonic time is untouched)
    pub fn set_now(&self, now: DateTime<Utc>) {
        self.wall_override.set(Some(now));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        if let Some(wall) = self.wall_override.get() {
            return wall;
        }
        let offset = chrono::Duration::from_std(self.offset.get())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.base_wall + offset
    }

    fn instant(&self) -> Instant {
        self.base_instant + self.offset.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances_both_sources() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let first = clock.instant();

        clock.advance_secs(90);

        assert_eq!(clock.now(), start + chrono::Duration::seconds(90));
        assert_eq!(clock.instant() - first, Duration::from_secs(90));
    }

    #[test]
    fn test_manual_clock_set_now_only_moves_wall_time() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let first = clock.instant();

        let skewed = start - chrono::Duration::hours(1);
        clock.set_now(skewed);

        assert_eq!(clock.now(), skewed);
        assert_eq!(clock.instant(), first);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.instant();
        let b = clock.instant();
        assert!(b >= a);
    }
}
