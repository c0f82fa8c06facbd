//! Distraction activities shown during the guided wait
//!
//! The rotator cycles through a fixed order of mini-activities, either every
//! rotation period or when the user asks for the next one. Switching away
//! from an activity throws its state away and cancels its timers.

pub mod breathing;
pub mod quick_tap;
pub mod quiz;
pub mod tap_target;

pub use breathing::{BreathPhase, Breathing};
pub use quick_tap::QuickTap;
pub use quiz::Quiz;
pub use tap_target::TapTargets;

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::i18n::Language;
use crate::timers::{TimerFire, TimerKind, TimerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Breathing,
    TapTarget,
    Quiz,
    QuickTap,
}

impl ActivityKind {
    /// Rotation order
    pub const ORDER: [ActivityKind; 4] = [
        ActivityKind::Breathing,
        ActivityKind::TapTarget,
        ActivityKind::Quiz,
        ActivityKind::QuickTap,
    ];

    pub fn next(&self) -> Self {
        match self {
            ActivityKind::Breathing => ActivityKind::TapTarget,
            ActivityKind::TapTarget => ActivityKind::Quiz,
            ActivityKind::Quiz => ActivityKind::QuickTap,
            ActivityKind::QuickTap => ActivityKind::Breathing,
        }
    }

    pub fn title(&self, language: Language) -> &'static str {
        let strings = language.strings();
        match self {
            ActivityKind::Breathing => strings.breathing_title,
            ActivityKind::TapTarget => strings.tap_title,
            ActivityKind::Quiz => strings.quiz_title,
            ActivityKind::QuickTap => strings.quick_tap_title,
        }
    }
}

/// User input aimed at the mounted activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityIntent {
    /// Switch to the next activity now
    Next,
    /// Hit a tap target by id
    TapTarget(u32),
    /// Pick a quiz option by index
    AnswerQuiz(usize),
    /// Press the quick-tap control
    QuickTap,
}

/// State of whichever activity is mounted
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityState {
    Breathing(Breathing),
    TapTarget(TapTargets),
    Quiz(Quiz),
    QuickTap(QuickTap),
}

impl ActivityState {
    fn mount<R: Rng>(
        kind: ActivityKind,
        timers: &mut TimerRegistry,
        now: Instant,
        language: Language,
        rng: &mut R,
    ) -> Self {
        match kind {
            ActivityKind::Breathing => ActivityState::Breathing(Breathing::start(timers, now)),
            ActivityKind::TapTarget => ActivityState::TapTarget(TapTargets::start(timers, now)),
            ActivityKind::Quiz => ActivityState::Quiz(Quiz::start(language, rng)),
            ActivityKind::QuickTap => ActivityState::QuickTap(QuickTap::default()),
        }
    }

    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityState::Breathing(_) => ActivityKind::Breathing,
            ActivityState::TapTarget(_) => ActivityKind::TapTarget,
            ActivityState::Quiz(_) => ActivityKind::Quiz,
            ActivityState::QuickTap(_) => ActivityKind::QuickTap,
        }
    }
}

/// Owns the mounted activity and the rotation timer
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRotator {
    state: ActivityState,
    period: Duration,
}

impl ActivityRotator {
    /// Mount the first activity and start rotating
    pub fn mount<R: Rng>(
        timers: &mut TimerRegistry,
        now: Instant,
        period: Duration,
        language: Language,
        rng: &mut R,
    ) -> Self {
        timers.schedule_every(TimerKind::ActivityRotation, now, period);
        let state = ActivityState::mount(ActivityKind::ORDER[0], timers, now, language, rng);
        Self { state, period }
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    pub fn kind(&self) -> ActivityKind {
        self.state.kind()
    }

    /// Handle a fired timer. Returns the new kind if the activity changed.
    pub fn on_timer<R: Rng>(
        &mut self,
        fire: &TimerFire,
        timers: &mut TimerRegistry,
        language: Language,
        rng: &mut R,
    ) -> Option<ActivityKind> {
        if fire.kind == TimerKind::ActivityRotation {
            // The periodic timer has already re-armed itself
            let next = self.kind().next();
            self.replace(next, timers, fire.deadline, language, rng);
            return Some(next);
        }

        match (fire.kind, &mut self.state) {
            (TimerKind::BreathingPhase, ActivityState::Breathing(breathing)) => {
                breathing.on_phase_end(timers, fire.deadline);
            }
            (TimerKind::TargetSpawn, ActivityState::TapTarget(game)) => {
                game.spawn(rng, timers, fire.deadline);
            }
            (TimerKind::TargetExpiry(id), ActivityState::TapTarget(game)) => {
                game.expire(id);
            }
            (TimerKind::QuizAdvance, ActivityState::Quiz(quiz)) => {
                quiz.advance();
            }
            (kind, _) => {
                debug!(?kind, "Ignoring timer for an activity that is not mounted");
            }
        }
        None
    }

    /// Handle user input. Returns the new kind if the activity changed.
    pub fn on_intent<R: Rng>(
        &mut self,
        intent: ActivityIntent,
        timers: &mut TimerRegistry,
        now: Instant,
        language: Language,
        rng: &mut R,
    ) -> Option<ActivityKind> {
        if intent == ActivityIntent::Next {
            timers.cancel_kind(TimerKind::ActivityRotation);
            timers.schedule_every(TimerKind::ActivityRotation, now, self.period);
            let next = self.kind().next();
            self.replace(next, timers, now, language, rng);
            return Some(next);
        }

        match (intent, &mut self.state) {
            (ActivityIntent::TapTarget(id), ActivityState::TapTarget(game)) => {
                game.tap(id, timers);
            }
            (ActivityIntent::AnswerQuiz(option), ActivityState::Quiz(quiz)) => {
                quiz.answer(option, timers, now);
            }
            (ActivityIntent::QuickTap, ActivityState::QuickTap(game)) => {
                game.tap();
            }
            _ => {}
        }
        None
    }

    /// Language changed while mounted
    pub fn set_language<R: Rng>(
        &mut self,
        language: Language,
        timers: &mut TimerRegistry,
        rng: &mut R,
    ) {
        if let ActivityState::Quiz(quiz) = &mut self.state {
            quiz.set_language(language, rng, timers);
        }
    }

    fn replace<R: Rng>(
        &mut self,
        kind: ActivityKind,
        timers: &mut TimerRegistry,
        now: Instant,
        language: Language,
        rng: &mut R,
    ) {
        timers.cancel_activity_timers();
        self.state = ActivityState::mount(kind, timers, now, language, rng);
        debug!(?kind, "Activity switched");
    }
}
