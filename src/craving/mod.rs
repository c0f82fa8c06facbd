//! Craving intervention flow
//!
//! A [`CravingSession`] lives while the craving modal is open. It moves
//! through `Rating -> Analyzing -> Guided | HighUrge -> Resolved` and is
//! driven by two entry points:
//!
//! - [`CravingSession::dispatch`] for user intents and the motivation reply
//! - [`CravingSession::advance`] to fire due timers
//!
//! Both return [`Effect`]s for the shell to carry out. The session never
//! touches the profile store; a relapse is reported as an effect.
//!
//! Every timer lives in the session's [`TimerRegistry`], which is drained on
//! each phase change, so closing the session cannot leave a timer behind.

pub mod milestones;

pub use milestones::MilestoneSet;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::activities::{ActivityIntent, ActivityKind, ActivityRotator};
use crate::clock::Clock;
use crate::i18n::Language;
use crate::motivation::{
    fallback_for, IntensityBand, Motivation, MotivationRequest, ToneThresholds, UrgeContext,
};
use crate::profile::UserProgressSnapshot;
use crate::progress::{format_elapsed, ElapsedBreakdown};
use crate::rating::RatingDial;
use crate::timers::{TimerKind, TimerRegistry};

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CravingSettings {
    /// Length of the guided wait
    pub countdown_secs: u32,
    /// Intensities below this go to Guided, the rest to HighUrge
    pub branch_threshold: u8,
    /// Time between automatic activity switches
    pub rotation_period: Duration,
    /// Tone bands for the motivational text
    pub tone: ToneThresholds,
}

impl Default for CravingSettings {
    fn default() -> Self {
        Self {
            countdown_secs: 600,
            branch_threshold: 6,
            rotation_period: Duration::from_secs(90),
            tone: ToneThresholds::default(),
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The user rode the craving out
    Resisted,
    /// The user smoked; the quit timestamp is reset
    Relapsed,
    /// Dismissed without an answer
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Rating,
    Analyzing,
    Guided,
    HighUrge,
    Resolved(Resolution),
}

/// Pointer events on the rating dial, relative to its centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingInput {
    Down { dx: f64, dy: f64 },
    Move { dx: f64, dy: f64 },
    Up,
    Leave,
}

/// Everything the presentation layer can tell the session
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Rating(RatingInput),
    SetRating(u8),
    StepRating(i8),
    SetContext(UrgeContext),
    ConfirmAnalysis,
    /// The requester finished. `None` means the request task itself died.
    MotivationResolved(Option<Motivation>),
    Activity(ActivityIntent),
    SetLanguage(Language),
    Resisted,
    Smoked,
    Close,
}

/// Work for the shell
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the requester and send the result back as `MotivationResolved`
    RequestMotivation {
        session_id: Uuid,
        request: MotivationRequest,
    },
    /// Reset the quit timestamp to `at` and persist it
    ConfirmRelapse { at: DateTime<Utc> },
    MilestoneUnlocked(u32),
    ActivityChanged(ActivityKind),
    /// The guided countdown reached zero; the session stays open
    CountdownFinished,
    /// The session is over and can be dropped
    Closed(Resolution),
}

/// One run of the craving flow
#[derive(Debug)]
pub struct CravingSession {
    id: Uuid,
    phase: Phase,
    dial: RatingDial,
    context: UrgeContext,
    snapshot: UserProgressSnapshot,
    language: Language,
    settings: CravingSettings,
    remaining_secs: u32,
    pending_request: Option<MotivationRequest>,
    motivation: Option<Motivation>,
    milestones: MilestoneSet,
    rotator: Option<ActivityRotator>,
    timers: TimerRegistry,
    rng: StdRng,
}

impl CravingSession {
    /// Open a fresh session in the Rating phase
    pub fn new(
        snapshot: UserProgressSnapshot,
        language: Language,
        settings: CravingSettings,
    ) -> Self {
        Self::with_rng(snapshot, language, settings, StdRng::from_entropy())
    }

    /// Same as [`CravingSession::new`] with a chosen random source
    pub fn with_rng(
        snapshot: UserProgressSnapshot,
        language: Language,
        settings: CravingSettings,
        rng: StdRng,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "Craving session opened");
        Self {
            id,
            phase: Phase::Rating,
            dial: RatingDial::new(),
            context: UrgeContext::default(),
            snapshot,
            language,
            settings,
            remaining_secs: settings.countdown_secs,
            pending_request: None,
            motivation: None,
            milestones: MilestoneSet::new(),
            rotator: None,
            timers: TimerRegistry::new(),
            rng,
        }
    }

    /// Apply one intent
    pub fn dispatch(&mut self, intent: Intent, clock: &dyn Clock) -> Vec<Effect> {
        if self.is_resolved() {
            debug!(session = %self.id, ?intent, "Ignoring intent after resolution");
            return Vec::new();
        }

        match (intent, self.phase) {
            (Intent::Rating(input), Phase::Rating) => {
                match input {
                    RatingInput::Down { dx, dy } => self.dial.pointer_down(dx, dy),
                    RatingInput::Move { dx, dy } => self.dial.pointer_move(dx, dy),
                    RatingInput::Up => self.dial.pointer_up(),
                    RatingInput::Leave => self.dial.pointer_leave(),
                }
                Vec::new()
            }
            (Intent::SetRating(value), Phase::Rating) => {
                self.dial.set(value);
                Vec::new()
            }
            (Intent::StepRating(delta), Phase::Rating) => {
                self.dial.step(delta);
                Vec::new()
            }
            (Intent::SetContext(context), Phase::Rating) => {
                self.context = context;
                Vec::new()
            }
            (Intent::ConfirmAnalysis, Phase::Rating) => self.begin_analysis(clock),
            (Intent::MotivationResolved(motivation), Phase::Analyzing) => {
                self.finish_analysis(motivation, clock)
            }
            (Intent::Activity(activity), Phase::Guided) => self.activity_intent(activity, clock),
            (Intent::SetLanguage(language), _) => {
                self.language = language;
                if let Some(rotator) = &mut self.rotator {
                    rotator.set_language(language, &mut self.timers, &mut self.rng);
                }
                Vec::new()
            }
            (Intent::Resisted, Phase::Guided | Phase::HighUrge) => {
                self.resolve(Resolution::Resisted)
            }
            (Intent::Smoked, Phase::HighUrge) => {
                let at = clock.now();
                let mut effects = vec![Effect::ConfirmRelapse { at }];
                effects.extend(self.resolve(Resolution::Relapsed));
                effects
            }
            (Intent::Close, _) => self.resolve(Resolution::Closed),
            (intent, phase) => {
                debug!(session = %self.id, ?intent, ?phase, "Intent not accepted in this phase");
                Vec::new()
            }
        }
    }

    /// Fire every timer due at the clock's current instant, in deadline order
    pub fn advance(&mut self, clock: &dyn Clock) -> Vec<Effect> {
        let now = clock.instant();
        let mut effects = Vec::new();

        while let Some(fire) = self.timers.poll_due(now) {
            match fire.kind {
                TimerKind::Countdown => effects.extend(self.tick_countdown()),
                _ => {
                    if let Some(rotator) = &mut self.rotator {
                        if let Some(kind) =
                            rotator.on_timer(&fire, &mut self.timers, self.language, &mut self.rng)
                        {
                            effects.push(Effect::ActivityChanged(kind));
                        }
                    }
                }
            }
        }

        effects
    }

    fn begin_analysis(&mut self, clock: &dyn Clock) -> Vec<Effect> {
        let elapsed = ElapsedBreakdown::between(self.snapshot.quit_since, clock.now());
        let intensity = self.dial.value();
        let request = MotivationRequest {
            language: self.language,
            goal_label: self.snapshot.goal_label.clone(),
            elapsed_text: format_elapsed(&elapsed, self.language),
            urge_intensity: intensity,
            context: self.context,
            band: IntensityBand::from_intensity(intensity, &self.settings.tone),
        };

        self.enter(Phase::Analyzing, clock);
        self.pending_request = Some(request.clone());
        info!(session = %self.id, intensity, "Analysing craving");

        vec![Effect::RequestMotivation {
            session_id: self.id,
            request,
        }]
    }

    fn finish_analysis(
        &mut self,
        motivation: Option<Motivation>,
        clock: &dyn Clock,
    ) -> Vec<Effect> {
        let motivation = motivation.or_else(|| {
            self.pending_request
                .as_ref()
                .map(|request| Motivation::Fallback(fallback_for(request)))
        });
        self.motivation = motivation;
        self.pending_request = None;

        // The text never decides the branch
        let next = if self.dial.value() < self.settings.branch_threshold {
            Phase::Guided
        } else {
            Phase::HighUrge
        };
        self.enter(next, clock);
        Vec::new()
    }

    fn activity_intent(&mut self, intent: ActivityIntent, clock: &dyn Clock) -> Vec<Effect> {
        let Some(rotator) = &mut self.rotator else {
            return Vec::new();
        };
        rotator
            .on_intent(
                intent,
                &mut self.timers,
                clock.instant(),
                self.language,
                &mut self.rng,
            )
            .map(Effect::ActivityChanged)
            .into_iter()
            .collect()
    }

    fn tick_countdown(&mut self) -> Vec<Effect> {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let elapsed = self.settings.countdown_secs - self.remaining_secs;

        let mut effects: Vec<Effect> = self
            .milestones
            .unlock_up_to(elapsed)
            .into_iter()
            .map(Effect::MilestoneUnlocked)
            .collect();

        if self.remaining_secs == 0 {
            // Freeze at zero; the user still decides how the session ends
            self.timers.cancel_kind(TimerKind::Countdown);
            info!(session = %self.id, "Countdown finished");
            effects.push(Effect::CountdownFinished);
        }
        effects
    }

    fn resolve(&mut self, resolution: Resolution) -> Vec<Effect> {
        self.phase = Phase::Resolved(resolution);
        let cancelled = self.timers.drain();
        self.rotator = None;
        self.pending_request = None;
        info!(session = %self.id, ?resolution, cancelled, "Craving session resolved");
        vec![Effect::Closed(resolution)]
    }

    fn enter(&mut self, phase: Phase, clock: &dyn Clock) {
        let cancelled = self.timers.drain();
        self.rotator = None;
        debug!(session = %self.id, from = ?self.phase, to = ?phase, cancelled, "Phase change");
        self.phase = phase;

        if phase == Phase::Guided {
            let now = clock.instant();
            self.remaining_secs = self.settings.countdown_secs;
            if self.remaining_secs > 0 {
                self.timers.schedule_every(TimerKind::Countdown, now, COUNTDOWN_TICK);
            }
            self.rotator = Some(ActivityRotator::mount(
                &mut self.timers,
                now,
                self.settings.rotation_period,
                self.language,
                &mut self.rng,
            ));
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, Phase::Resolved(_))
    }

    pub fn urge_intensity(&self) -> u8 {
        self.dial.value()
    }

    pub fn dial(&self) -> &RatingDial {
        &self.dial
    }

    pub fn context(&self) -> UrgeContext {
        self.context
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn snapshot(&self) -> &UserProgressSnapshot {
        &self.snapshot
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Seconds since the guided wait started
    pub fn elapsed_secs(&self) -> u32 {
        self.settings.countdown_secs - self.remaining_secs
    }

    /// Generated text only; absent when the fallback was used
    pub fn motivational_text(&self) -> Option<&str> {
        match &self.motivation {
            Some(Motivation::Generated(text)) => Some(text),
            _ => None,
        }
    }

    /// Text to show, generated or fallback
    pub fn display_text(&self) -> Option<&str> {
        self.motivation.as_ref().map(Motivation::text)
    }

    pub fn milestones(&self) -> &MilestoneSet {
        &self.milestones
    }

    pub fn activity(&self) -> Option<&ActivityRotator> {
        self.rotator.as_ref()
    }

    /// Number of live timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// When the next timer is due, for sleeping until then
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }
}
