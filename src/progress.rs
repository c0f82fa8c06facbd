//! Progress since the quit timestamp
//!
//! Pure functions over a [`UserProgressSnapshot`] and a wall-clock time. The
//! dashboard recomputes them on every 1 Hz tick.

use chrono::{DateTime, Utc};

use crate::i18n::Language;
use crate::profile::UserProgressSnapshot;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Elapsed time split into non-cumulative components
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElapsedBreakdown {
    pub days: u64,
    /// 0..24
    pub hours: u64,
    /// 0..60
    pub minutes: u64,
    /// 0..60
    pub seconds: u64,
    /// Fractional days, millisecond precision
    pub total_days: f64,
}

impl ElapsedBreakdown {
    /// Break down the time between `since` and `now`
    ///
    /// A `since` in the future (clock skew) yields zero.
    pub fn between(since: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let millis = (now - since).num_milliseconds().max(0);
        let total_secs = (millis / 1000) as u64;

        Self {
            days: total_secs / SECS_PER_DAY,
            hours: (total_secs % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total_secs % SECS_PER_MINUTE,
            total_days: millis as f64 / MILLIS_PER_DAY,
        }
    }

    /// Whole seconds represented by the components
    pub fn total_seconds(&self) -> u64 {
        self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub elapsed: ElapsedBreakdown,
    pub cost_per_unit: f64,
    pub money_saved: f64,
    pub units_avoided: f64,
    /// Capped at 100. A goal cost of zero or less reports 0.
    pub goal_progress_percent: f64,
}

/// Compute progress for `snapshot` as of `now`
pub fn compute(snapshot: &UserProgressSnapshot, now: DateTime<Utc>) -> ProgressReport {
    let elapsed = ElapsedBreakdown::between(snapshot.quit_since, now);
    let cost_per_unit = snapshot.cost_per_unit();
    let money_saved = elapsed.total_days * snapshot.daily_count * cost_per_unit;
    let units_avoided = (elapsed.total_days * snapshot.daily_count).floor();

    let goal_progress_percent = if snapshot.goal_cost > 0.0 {
        (money_saved / snapshot.goal_cost * 100.0).min(100.0)
    } else {
        0.0
    };

    ProgressReport {
        elapsed,
        cost_per_unit,
        money_saved,
        units_avoided,
        goal_progress_percent,
    }
}

/// Money saved today and on each of the following days
///
/// Entry `i` is the projected total `i` days from now, so the first entry is
/// the current amount.
pub fn savings_projection(
    snapshot: &UserProgressSnapshot,
    report: &ProgressReport,
    days: usize,
) -> Vec<f64> {
    let per_day = snapshot.daily_count * report.cost_per_unit;
    (0..days)
        .map(|i| report.money_saved + i as f64 * per_day)
        .collect()
}

/// Elapsed time as prose, e.g. "3 days 4 hours 12 minutes"
pub fn format_elapsed(elapsed: &ElapsedBreakdown, language: Language) -> String {
    let strings = language.strings();
    let unit = |value: u64, (singular, plural): (&str, &str)| {
        format!("{} {}", value, if value == 1 { singular } else { plural })
    };

    format!(
        "{} {} {}",
        unit(elapsed.days, strings.day),
        unit(elapsed.hours, strings.hour),
        unit(elapsed.minutes, strings.minute)
    )
}

/// Countdown as MM:SS
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::sample_snapshot;
    use chrono::Duration;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_one_day_scenario() {
        let snapshot = sample_snapshot();
        let report = compute(&snapshot, snapshot.quit_since + Duration::days(1));

        assert!(approx(report.cost_per_unit, 0.30));
        assert!(approx(report.money_saved, 3.00));
        assert_eq!(report.units_avoided, 10.0);
        assert!(approx(report.goal_progress_percent, 0.3));
        assert_eq!(report.elapsed.days, 1);
        assert_eq!(report.elapsed.hours, 0);
    }

    #[test]
    fn test_components_are_remainders() {
        let since = sample_snapshot().quit_since;
        let now = since
            + Duration::days(3)
            + Duration::hours(23)
            + Duration::minutes(59)
            + Duration::seconds(58)
            + Duration::milliseconds(999);

        let elapsed = ElapsedBreakdown::between(since, now);
        assert_eq!(
            (elapsed.days, elapsed.hours, elapsed.minutes, elapsed.seconds),
            (3, 23, 59, 58)
        );
        assert_eq!(elapsed.total_seconds(), (now - since).num_seconds() as u64);
    }

    #[test]
    fn test_components_sum_to_floored_delta() {
        let since = sample_snapshot().quit_since;
        for millis in [0_i64, 999, 1_000, 59_999, 3_600_000, 86_399_999, 1_234_567_890] {
            let elapsed = ElapsedBreakdown::between(since, since + Duration::milliseconds(millis));
            assert_eq!(elapsed.total_seconds(), (millis / 1000) as u64);
            assert!(elapsed.hours < 24);
            assert!(elapsed.minutes < 60);
            assert!(elapsed.seconds < 60);
        }
    }

    #[test]
    fn test_future_quit_date_clamps_to_zero() {
        let snapshot = sample_snapshot();
        let report = compute(&snapshot, snapshot.quit_since - Duration::hours(2));

        assert_eq!(report.elapsed, ElapsedBreakdown::default());
        assert_eq!(report.money_saved, 0.0);
        assert_eq!(report.units_avoided, 0.0);
    }

    #[test]
    fn test_goal_progress_is_capped() {
        let mut snapshot = sample_snapshot();
        snapshot.goal_cost = 10.0;
        let report = compute(&snapshot, snapshot.quit_since + Duration::days(30));
        assert_eq!(report.goal_progress_percent, 100.0);
    }

    #[test]
    fn test_zero_goal_cost_reports_zero_progress() {
        let mut snapshot = sample_snapshot();
        snapshot.goal_cost = 0.0;
        let report = compute(&snapshot, snapshot.quit_since + Duration::days(2));
        assert_eq!(report.goal_progress_percent, 0.0);
    }

    #[test]
    fn test_zero_pack_size_propagates() {
        let mut snapshot = sample_snapshot();
        snapshot.pack_size = 0.0;
        let report = compute(&snapshot, snapshot.quit_since + Duration::days(1));
        assert!(!report.cost_per_unit.is_finite());
        assert!(!report.money_saved.is_finite());
    }

    #[test]
    fn test_projection_starts_at_current_savings() {
        let snapshot = sample_snapshot();
        let report = compute(&snapshot, snapshot.quit_since + Duration::days(1));
        let projection = savings_projection(&snapshot, &report, 30);

        assert_eq!(projection.len(), 30);
        assert!(approx(projection[0], 3.0));
        assert!(approx(projection[1], 6.0));
        assert!(approx(projection[29], 90.0));
    }

    #[test]
    fn test_format_elapsed() {
        let elapsed = ElapsedBreakdown {
            days: 3,
            hours: 1,
            minutes: 12,
            seconds: 5,
            total_days: 3.05,
        };
        assert_eq!(format_elapsed(&elapsed, Language::En), "3 days 1 hour 12 minutes");
        assert_eq!(format_elapsed(&elapsed, Language::It), "3 giorni 1 ora 12 minuti");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(600), "10:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(0), "00:00");
    }
}
