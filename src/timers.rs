//! Session-scoped timer registry
//!
//! Timers are plain deadlines owned by the craving session. Nothing runs in the
//! background: the owner polls [`TimerRegistry::poll_due`] with the current
//! instant and handles each fire in deadline order. Cancelling is just removing
//! the entry, so a drained registry can never fire again.

use std::time::{Duration, Instant};

/// Identifier of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// 1 Hz countdown of the guided phase
    Countdown,
    /// Periodic switch to the next distraction activity
    ActivityRotation,
    /// End of the current breathing phase
    BreathingPhase,
    /// Spawn of a new tap target
    TargetSpawn,
    /// Expiry of one tap target
    TargetExpiry(u32),
    /// Move the quiz to its next question after an answer
    QuizAdvance,
}

impl TimerKind {
    /// Whether the timer belongs to the currently mounted activity
    ///
    /// Activity timers are cancelled whenever the rotator switches activity.
    pub fn is_activity_scoped(&self) -> bool {
        matches!(
            self,
            TimerKind::BreathingPhase
                | TimerKind::TargetSpawn
                | TimerKind::TargetExpiry(_)
                | TimerKind::QuizAdvance
        )
    }
}

/// A timer that has reached its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFire {
    pub id: TimerId,
    pub kind: TimerKind,
    /// The deadline that was reached (not the poll instant)
    pub deadline: Instant,
}

#[derive(Debug, Clone)]
struct ScheduledTimer {
    id: TimerId,
    kind: TimerKind,
    deadline: Instant,
    period: Option<Duration>,
}

/// Registry of pending timers
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: Vec<ScheduledTimer>,
    next_id: u64,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer `delay` after `now`
    pub fn schedule_once(&mut self, kind: TimerKind, now: Instant, delay: Duration) -> TimerId {
        self.insert(kind, now + delay, None)
    }

    /// Schedule a periodic timer whose first fire is one `period` after `now`
    pub fn schedule_every(&mut self, kind: TimerKind, now: Instant, period: Duration) -> TimerId {
        // A zero period would fire forever within a single poll loop
        let period = period.max(Duration::from_millis(1));
        self.insert(kind, now + period, Some(period))
    }

    fn insert(&mut self, kind: TimerKind, deadline: Instant, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(ScheduledTimer {
            id,
            kind,
            deadline,
            period,
        });
        id
    }

    /// Cancel a single timer. Returns false if it was not pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every timer of the given kind
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.kind != kind);
        before - self.timers.len()
    }

    /// Cancel every timer owned by the mounted activity
    pub fn cancel_activity_timers(&mut self) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| !t.kind.is_activity_scoped());
        before - self.timers.len()
    }

    /// Cancel everything. Returns the number of timers that were pending.
    pub fn drain(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    /// Pop the earliest timer whose deadline is at or before `now`
    ///
    /// Periodic timers are re-armed at `deadline + period`, so a caller that
    /// jumps far ahead sees every intermediate fire in order.
    pub fn poll_due(&mut self, now: Instant) -> Option<TimerFire> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[index];
        let fire = TimerFire {
            id: timer.id,
            kind: timer.kind,
            deadline: timer.deadline,
        };

        match timer.period {
            Some(period) => timer.deadline += period,
            None => {
                self.timers.swap_remove(index);
            }
        }

        Some(fire)
    }

    /// Whether a timer of this kind is pending
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest pending deadline, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.deadline).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_fires_exactly_once() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.schedule_once(TimerKind::QuizAdvance, start, Duration::from_millis(1500));

        assert!(timers.poll_due(start + Duration::from_secs(1)).is_none());

        let fire = timers.poll_due(start + Duration::from_secs(2)).unwrap();
        assert_eq!(fire.kind, TimerKind::QuizAdvance);
        assert_eq!(fire.deadline, start + Duration::from_millis(1500));
        assert!(timers.poll_due(start + Duration::from_secs(10)).is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_periodic_catches_up_in_order() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.schedule_every(TimerKind::Countdown, start, Duration::from_secs(1));

        let now = start + Duration::from_secs(3);
        let mut deadlines = Vec::new();
        while let Some(fire) = timers.poll_due(now) {
            deadlines.push(fire.deadline);
        }

        assert_eq!(
            deadlines,
            vec![
                start + Duration::from_secs(1),
                start + Duration::from_secs(2),
                start + Duration::from_secs(3),
            ]
        );
        assert!(timers.is_active(TimerKind::Countdown));
    }

    #[test]
    fn test_interleaved_kinds_fire_by_deadline() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        timers.schedule_every(TimerKind::Countdown, start, Duration::from_secs(2));
        timers.schedule_once(TimerKind::BreathingPhase, start, Duration::from_secs(3));

        let now = start + Duration::from_secs(4);
        let kinds: Vec<_> = std::iter::from_fn(|| timers.poll_due(now))
            .map(|f| f.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                TimerKind::Countdown,
                TimerKind::BreathingPhase,
                TimerKind::Countdown
            ]
        );
    }

    #[test]
    fn test_cancel_and_drain() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let id = timers.schedule_once(TimerKind::TargetExpiry(1), start, Duration::from_secs(3));
        timers.schedule_every(TimerKind::Countdown, start, Duration::from_secs(1));
        timers.schedule_every(TimerKind::TargetSpawn, start, Duration::from_millis(1500));

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.cancel_activity_timers(), 1);
        assert!(timers.is_active(TimerKind::Countdown));

        assert_eq!(timers.drain(), 1);
        assert!(timers.poll_due(start + Duration::from_secs(60)).is_none());
    }

    #[test]
    fn test_activity_scope() {
        assert!(TimerKind::BreathingPhase.is_activity_scoped());
        assert!(TimerKind::TargetExpiry(7).is_activity_scoped());
        assert!(!TimerKind::Countdown.is_activity_scoped());
        assert!(!TimerKind::ActivityRotation.is_activity_scoped());
    }
}
