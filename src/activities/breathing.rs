//! Paced breathing: inhale 4s, hold 4s, exhale 6s, repeat

use std::time::{Duration, Instant};

use crate::timers::{TimerKind, TimerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn duration(&self) -> Duration {
        match self {
            BreathPhase::Inhale => Duration::from_secs(4),
            BreathPhase::Hold => Duration::from_secs(4),
            BreathPhase::Exhale => Duration::from_secs(6),
        }
    }

    pub fn next(&self) -> Self {
        match self {
            BreathPhase::Inhale => BreathPhase::Hold,
            BreathPhase::Hold => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::Inhale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breathing {
    phase: BreathPhase,
    phase_started: Instant,
    cycles: u32,
}

impl Breathing {
    /// Start at the beginning of an inhale
    pub fn start(timers: &mut TimerRegistry, now: Instant) -> Self {
        timers.schedule_once(TimerKind::BreathingPhase, now, BreathPhase::Inhale.duration());
        Self {
            phase: BreathPhase::Inhale,
            phase_started: now,
            cycles: 0,
        }
    }

    /// The current phase ran out at `at`
    pub fn on_phase_end(&mut self, timers: &mut TimerRegistry, at: Instant) {
        self.phase = self.phase.next();
        self.phase_started = at;
        if self.phase == BreathPhase::Inhale {
            self.cycles += 1;
        }
        timers.schedule_once(TimerKind::BreathingPhase, at, self.phase.duration());
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    /// Completed inhale-hold-exhale cycles
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// How far through the current phase we are, 0.0 to 1.0
    pub fn phase_progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.phase_started);
        (elapsed.as_secs_f64() / self.phase.duration().as_secs_f64()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until(breathing: &mut Breathing, timers: &mut TimerRegistry, now: Instant) {
        while let Some(fire) = timers.poll_due(now) {
            assert_eq!(fire.kind, TimerKind::BreathingPhase);
            breathing.on_phase_end(timers, fire.deadline);
        }
    }

    #[test]
    fn test_phase_sequence() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let mut breathing = Breathing::start(&mut timers, start);
        assert_eq!(breathing.phase(), BreathPhase::Inhale);

        run_until(&mut breathing, &mut timers, start + Duration::from_secs(4));
        assert_eq!(breathing.phase(), BreathPhase::Hold);

        run_until(&mut breathing, &mut timers, start + Duration::from_secs(8));
        assert_eq!(breathing.phase(), BreathPhase::Exhale);
        assert_eq!(breathing.cycles(), 0);

        run_until(&mut breathing, &mut timers, start + Duration::from_secs(14));
        assert_eq!(breathing.phase(), BreathPhase::Inhale);
        assert_eq!(breathing.cycles(), 1);
    }

    #[test]
    fn test_cycles_over_a_minute() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let mut breathing = Breathing::start(&mut timers, start);

        // 60s = four full 14s cycles plus 4s into the fifth
        run_until(&mut breathing, &mut timers, start + Duration::from_secs(60));
        assert_eq!(breathing.cycles(), 4);
        assert_eq!(breathing.phase(), BreathPhase::Hold);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_phase_progress() {
        let start = Instant::now();
        let mut timers = TimerRegistry::new();
        let breathing = Breathing::start(&mut timers, start);

        assert_eq!(breathing.phase_progress(start), 0.0);
        assert_eq!(breathing.phase_progress(start + Duration::from_secs(2)), 0.5);
        assert_eq!(breathing.phase_progress(start + Duration::from_secs(9)), 1.0);
    }
}
