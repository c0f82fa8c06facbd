//! Application state management
//!
//! Everything the shell shows lives here, together with the transitions that
//! don't need the terminal: routing after sign-in, applying craving effects,
//! relapse and stats persistence. `App` owns the terminal and the async
//! plumbing and calls into this.

use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::craving::{milestones, CravingSession, CravingSettings, Effect, Intent};
use crate::i18n::{fill, Language};
use crate::motivation::{Motivation, MotivationRequest};
use crate::onboarding::{FormStep, OnboardingForm};
use crate::profile::{save_stats, ProfileError, ProfileStore, UserId, UserProgressSnapshot};
use crate::relapse::resolve_relapse;
use crate::tui::{NotificationManager, NotificationType};

use super::input_mode::InputMode;
use super::view::View;

/// Longest accepted display name, in characters
pub const MAX_NAME_LEN: usize = 40;

/// Text generation to start in the background
#[derive(Debug, Clone, PartialEq)]
pub struct MotivationJob {
    pub session_id: Uuid,
    pub request: MotivationRequest,
}

/// Result of a background generation, tagged with its session
#[derive(Debug, Clone, PartialEq)]
pub struct MotivationReply {
    pub session_id: Uuid,
    /// `None` when the generation task itself failed
    pub motivation: Option<Motivation>,
}

/// Main application state
#[derive(Debug)]
pub struct AppState {
    pub view: View,
    pub input_mode: InputMode,
    pub language: Language,
    pub user: Option<UserId>,
    pub snapshot: Option<UserProgressSnapshot>,
    /// Open craving session, shown as modal or banner
    pub craving: Option<CravingSession>,
    pub form: Option<OnboardingForm>,
    /// Validation message for the current form step
    pub form_error: Option<String>,
    /// Name typed on the sign-in screen
    pub sign_in_name: String,
    /// Message shown on the setup error screen
    pub setup_error: Option<String>,
    pub notifications: NotificationManager,
    pub should_quit: bool,
    pub needs_render: bool,
}

impl AppState {
    pub fn new(language: Language, notification_ttl: Duration) -> Self {
        Self {
            view: View::default(),
            input_mode: InputMode::default(),
            language,
            user: None,
            snapshot: None,
            craving: None,
            form: None,
            form_error: None,
            sign_in_name: String::new(),
            setup_error: None,
            notifications: NotificationManager::new(3, notification_ttl),
            should_quit: false,
            needs_render: true,
        }
    }

    /// A craving session runs while its modal is hidden
    pub fn is_craving_minimised(&self) -> bool {
        self.craving.is_some() && self.input_mode != InputMode::Craving
    }

    // ========================================================================
    // Account
    // ========================================================================

    /// Append typed or pasted text to the sign-in name, up to the length cap
    pub fn push_sign_in_text(&mut self, text: &str) {
        let room = MAX_NAME_LEN.saturating_sub(self.sign_in_name.chars().count());
        self.sign_in_name.extend(text.chars().filter(|c| !c.is_control()).take(room));
    }

    /// Route to the right screen once a user's record has been looked up
    pub fn signed_in(
        &mut self,
        user: UserId,
        lookup: Result<Option<UserProgressSnapshot>, ProfileError>,
    ) {
        self.user = Some(user.clone());
        self.sign_in_name.clear();
        self.input_mode = InputMode::Normal;
        match lookup {
            Ok(Some(snapshot)) => {
                info!(user = %user, "Profile loaded");
                self.snapshot = Some(snapshot);
                self.view = View::Dashboard;
            }
            Ok(None) => {
                info!(user = %user, "No profile yet, starting onboarding");
                self.start_onboarding();
            }
            Err(e) if e.is_permission_denied() => {
                warn!(user = %user, error = %e, "Profile store refused access");
                self.setup_error = Some(e.to_string());
                self.view = View::SetupError;
            }
            Err(e) => {
                warn!(user = %user, error = %e, "Failed to load profile");
                let message = fill(
                    self.language.strings().profile_load_failed,
                    &[("error", e.to_string().as_str())],
                );
                self.notifications.warn(message);
                self.start_onboarding();
            }
        }
    }

    /// Drop everything tied to the previous user
    pub fn signed_out(&mut self) {
        self.user = None;
        self.snapshot = None;
        self.craving = None;
        self.form = None;
        self.form_error = None;
        self.setup_error = None;
        self.input_mode = InputMode::Normal;
        self.view = View::SignIn;
    }

    // ========================================================================
    // Onboarding / edit stats
    // ========================================================================

    pub fn start_onboarding(&mut self) {
        self.form = Some(OnboardingForm::new(self.language));
        self.form_error = None;
        self.view = View::Onboarding;
    }

    pub fn start_editing(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        self.form = Some(OnboardingForm::for_edit(snapshot));
        self.form_error = None;
        self.view = View::Onboarding;
    }

    /// Leave the form without saving; returns false when there is nowhere to go
    pub fn cancel_form(&mut self) -> bool {
        if self.snapshot.is_none() {
            return false;
        }
        self.form = None;
        self.form_error = None;
        self.view = View::Dashboard;
        true
    }

    /// Confirm the current form step, saving the record after the last one
    ///
    /// A failed save keeps the previous snapshot. New profiles stay on the
    /// form so the user can retry; edits return to the dashboard.
    pub fn submit_form(&mut self, store: &dyn ProfileStore, clock: &dyn Clock) {
        let (Some(form), Some(user)) = (&mut self.form, &self.user) else {
            return;
        };

        let snapshot = match form.next(clock.now()) {
            Ok(FormStep::Continue) => {
                self.form_error = None;
                return;
            }
            Ok(FormStep::Done(snapshot)) => snapshot,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return;
            }
        };

        let editing = form.is_editing();
        match save_stats(store, user, &snapshot) {
            Ok(()) => {
                self.snapshot = Some(snapshot);
                self.form = None;
                self.form_error = None;
                self.view = View::Dashboard;
            }
            Err(e) => {
                warn!(user = %user, error = %e, "Failed to save stats");
                let message = fill(
                    self.language.strings().stats_not_saved,
                    &[("error", e.to_string().as_str())],
                );
                self.notifications.warn(message);
                if editing {
                    self.form = None;
                    self.view = View::Dashboard;
                }
            }
        }
    }

    // ========================================================================
    // Craving flow
    // ========================================================================

    /// Open the craving modal, reusing a minimised session
    pub fn open_craving(&mut self, settings: CravingSettings) -> bool {
        if !self.view.allows_craving() {
            return false;
        }
        if self.craving.is_none() {
            let Some(snapshot) = &self.snapshot else {
                return false;
            };
            self.craving = Some(CravingSession::new(
                snapshot.clone(),
                self.language,
                settings,
            ));
        }
        self.input_mode = InputMode::Craving;
        true
    }

    /// Hide the modal while the session keeps running
    pub fn minimise_craving(&mut self) {
        if self.craving.is_some() {
            self.input_mode = InputMode::Normal;
        }
    }

    /// Forward an intent to the open session
    pub fn dispatch_craving(
        &mut self,
        intent: Intent,
        clock: &dyn Clock,
        store: &dyn ProfileStore,
    ) -> Vec<MotivationJob> {
        let Some(session) = &mut self.craving else {
            return Vec::new();
        };
        let effects = session.dispatch(intent, clock);
        self.apply_effects(effects, store)
    }

    /// Fire due craving timers
    pub fn tick(&mut self, clock: &dyn Clock, store: &dyn ProfileStore) -> Vec<MotivationJob> {
        let Some(session) = &mut self.craving else {
            return Vec::new();
        };
        let effects = session.advance(clock);
        if !effects.is_empty() {
            self.needs_render = true;
        }
        self.apply_effects(effects, store)
    }

    /// Deliver a generation result; replies for other sessions are dropped
    pub fn receive_motivation(
        &mut self,
        reply: MotivationReply,
        clock: &dyn Clock,
        store: &dyn ProfileStore,
    ) -> Vec<MotivationJob> {
        let current = self.craving.as_ref().map(|c| c.id());
        if current != Some(reply.session_id) {
            debug!(
                session = %reply.session_id,
                "Dropping motivation reply for a discarded session"
            );
            return Vec::new();
        }
        self.dispatch_craving(Intent::MotivationResolved(reply.motivation), clock, store)
    }

    /// Toggle the interface language everywhere it is held in memory
    pub fn toggle_language(&mut self, clock: &dyn Clock, store: &dyn ProfileStore) -> Language {
        self.language = self.language.toggle();
        let language = self.language;
        self.dispatch_craving(Intent::SetLanguage(language), clock, store);
        language
    }

    fn apply_effects(
        &mut self,
        effects: Vec<Effect>,
        store: &dyn ProfileStore,
    ) -> Vec<MotivationJob> {
        let mut jobs = Vec::new();
        for effect in effects {
            match effect {
                Effect::RequestMotivation {
                    session_id,
                    request,
                } => jobs.push(MotivationJob {
                    session_id,
                    request,
                }),
                Effect::ConfirmRelapse { at } => self.relapse(store, at),
                Effect::MilestoneUnlocked(threshold) => {
                    let language = self.craving_language();
                    if let Some(label) = milestones::label(threshold, language) {
                        self.notifications.notify(NotificationType::Milestone {
                            label: label.to_string(),
                        });
                    }
                }
                Effect::ActivityChanged(kind) => debug!(?kind, "Activity changed"),
                Effect::CountdownFinished => {
                    let message = self.craving_language().strings().countdown_done;
                    self.notifications.notify(NotificationType::Info {
                        message: message.to_string(),
                    });
                }
                Effect::Closed(resolution) => {
                    debug!(?resolution, "Dropping closed craving session");
                    self.craving = None;
                    if self.input_mode == InputMode::Craving {
                        self.input_mode = InputMode::Normal;
                    }
                }
            }
            self.needs_render = true;
        }
        jobs
    }

    fn craving_language(&self) -> Language {
        self.craving
            .as_ref()
            .map(|c| c.language())
            .unwrap_or(self.language)
    }

    // ========================================================================
    // Relapse
    // ========================================================================

    /// Reset the quit timestamp, keeping the new one even if saving fails
    pub fn relapse(&mut self, store: &dyn ProfileStore, at: chrono::DateTime<chrono::Utc>) {
        let (Some(user), Some(current)) = (&self.user, &self.snapshot) else {
            return;
        };
        let outcome = resolve_relapse(store, user, current, at);
        if let Some(e) = outcome.warning {
            let message = fill(
                self.language.strings().relapse_not_saved,
                &[("error", e.to_string().as_str())],
            );
            self.notifications.warn(message);
        }
        self.snapshot = Some(outcome.snapshot);
        self.needs_render = true;
    }

    /// Answer to the dashboard's "I smoked" dialog
    pub fn answer_relapse_dialog(
        &mut self,
        confirmed: bool,
        clock: &dyn Clock,
        store: &dyn ProfileStore,
    ) {
        if self.input_mode != InputMode::ConfirmingRelapse {
            return;
        }
        self.input_mode = InputMode::Normal;
        if confirmed {
            self.relapse(store, clock.now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::craving::Phase;
    use crate::profile::test_support::{sample_snapshot, MemoryProfileStore};

    fn signed_in_state(store: &MemoryProfileStore) -> AppState {
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        let user = UserId::new("marta");
        store.put_profile(&user, &sample_snapshot()).unwrap();
        store.puts.set(0);
        let lookup = store.get_profile(&user);
        state.signed_in(user, lookup);
        state
    }

    fn clock_after_quit(days: i64) -> ManualClock {
        ManualClock::new(sample_snapshot().quit_since + chrono::Duration::days(days))
    }

    #[test]
    fn test_sign_in_name_is_capped() {
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        state.push_sign_in_text("marta");
        state.push_sign_in_text(&"x".repeat(100));
        assert_eq!(state.sign_in_name.chars().count(), MAX_NAME_LEN);
        assert!(state.sign_in_name.starts_with("marta"));

        state.push_sign_in_text("more");
        assert_eq!(state.sign_in_name.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_app_state_default() {
        let state = AppState::new(Language::It, Duration::from_secs(8));
        assert_eq!(state.view, View::SignIn);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.user.is_none());
        assert!(!state.should_quit);
    }

    #[test]
    fn test_sign_in_with_record_goes_to_dashboard() {
        let store = MemoryProfileStore::new();
        let state = signed_in_state(&store);
        assert_eq!(state.view, View::Dashboard);
        assert_eq!(state.snapshot, Some(sample_snapshot()));
    }

    #[test]
    fn test_sign_in_without_record_starts_onboarding() {
        let mut state = AppState::new(Language::It, Duration::from_secs(8));
        state.signed_in(UserId::new("nuovo"), Ok(None));

        assert_eq!(state.view, View::Onboarding);
        assert_eq!(state.form.as_ref().map(|f| f.currency_symbol()), Some("€"));
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_permission_denied_shows_setup_error() {
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        state.signed_in(
            UserId::new("marta"),
            Err(ProfileError::PermissionDenied("profiles/marta.json".into())),
        );

        assert_eq!(state.view, View::SetupError);
        assert!(state.setup_error.is_some());
        assert!(state.form.is_none());
    }

    #[test]
    fn test_other_load_errors_notify_and_onboard() {
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        state.signed_in(
            UserId::new("marta"),
            Err(ProfileError::Corrupt("expected value".into())),
        );

        assert_eq!(state.view, View::Onboarding);
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn test_onboarding_saves_and_shows_dashboard() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(0);
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        state.signed_in(UserId::new("marta"), Ok(None));

        for _ in 0..3 {
            state.submit_form(&store, &clock);
        }
        state.form.as_mut().unwrap().push_str("Vespa");
        state.submit_form(&store, &clock);
        state.submit_form(&store, &clock);

        assert_eq!(state.view, View::Dashboard);
        assert_eq!(store.puts.get(), 1);
        let saved = store.stored(&UserId::new("marta")).unwrap();
        assert_eq!(saved.quit_since, clock.now());
        assert_eq!(state.snapshot, Some(saved));
    }

    #[test]
    fn test_form_error_is_shown_and_step_kept() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(0);
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        state.signed_in(UserId::new("marta"), Ok(None));
        let form = state.form.as_mut().unwrap();
        form.backspace();
        form.backspace();

        state.submit_form(&store, &clock);
        assert!(state.form_error.is_some());
        assert_eq!(state.form.as_ref().unwrap().step(), 0);
    }

    #[test]
    fn test_failed_edit_keeps_previous_snapshot() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(3);
        let mut state = signed_in_state(&store);
        *store.fail_with.borrow_mut() = Some(ProfileError::Unavailable("disk".into()));

        state.start_editing();
        let form = state.form.as_mut().unwrap();
        form.backspace();
        form.backspace();
        form.push_str("15");
        for _ in 0..5 {
            state.submit_form(&store, &clock);
        }

        assert_eq!(state.view, View::Dashboard);
        assert_eq!(state.snapshot, Some(sample_snapshot()));
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn test_cancel_form_needs_a_snapshot() {
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        state.signed_in(UserId::new("marta"), Ok(None));
        assert!(!state.cancel_form());

        let store = MemoryProfileStore::new();
        let mut state = signed_in_state(&store);
        state.start_editing();
        assert!(state.cancel_form());
        assert_eq!(state.view, View::Dashboard);
    }

    #[test]
    fn test_dashboard_relapse_resets_counter() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(12);
        let mut state = signed_in_state(&store);

        state.input_mode = InputMode::ConfirmingRelapse;
        state.answer_relapse_dialog(true, &clock, &store);

        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.snapshot.as_ref().map(|s| s.quit_since), Some(clock.now()));
        assert_eq!(store.puts.get(), 1);
    }

    #[test]
    fn test_relapse_dialog_cancel_changes_nothing() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(12);
        let mut state = signed_in_state(&store);

        state.input_mode = InputMode::ConfirmingRelapse;
        state.answer_relapse_dialog(false, &clock, &store);

        assert_eq!(state.snapshot, Some(sample_snapshot()));
        assert_eq!(store.puts.get(), 0);
    }

    #[test]
    fn test_failed_relapse_is_optimistic() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(12);
        let mut state = signed_in_state(&store);
        *store.fail_with.borrow_mut() = Some(ProfileError::Unavailable("disk".into()));

        state.relapse(&store, clock.now());

        assert_eq!(state.snapshot.as_ref().map(|s| s.quit_since), Some(clock.now()));
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn test_craving_requires_dashboard() {
        let mut state = AppState::new(Language::En, Duration::from_secs(8));
        assert!(!state.open_craving(CravingSettings::default()));
        assert!(state.craving.is_none());
    }

    #[test]
    fn test_craving_flow_through_state() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(3);
        let mut state = signed_in_state(&store);

        assert!(state.open_craving(CravingSettings::default()));
        assert_eq!(state.input_mode, InputMode::Craving);

        state.dispatch_craving(Intent::SetRating(3), &clock, &store);
        let jobs = state.dispatch_craving(Intent::ConfirmAnalysis, &clock, &store);
        assert_eq!(jobs.len(), 1);
        let session_id = jobs[0].session_id;

        state.receive_motivation(
            MotivationReply {
                session_id,
                motivation: Some(Motivation::Generated("Breathe.".into())),
            },
            &clock,
            &store,
        );
        let phase = state.craving.as_ref().map(|c| c.phase());
        assert_eq!(phase, Some(Phase::Guided));

        state.minimise_craving();
        assert!(state.is_craving_minimised());

        // Reopening keeps the same session
        state.open_craving(CravingSettings::default());
        assert_eq!(state.craving.as_ref().map(|c| c.id()), Some(session_id));

        state.dispatch_craving(Intent::Resisted, &clock, &store);
        assert!(state.craving.is_none());
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_stale_reply_is_dropped() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(3);
        let mut state = signed_in_state(&store);

        state.open_craving(CravingSettings::default());
        state.dispatch_craving(Intent::ConfirmAnalysis, &clock, &store);
        state.receive_motivation(
            MotivationReply {
                session_id: Uuid::new_v4(),
                motivation: None,
            },
            &clock,
            &store,
        );

        let phase = state.craving.as_ref().map(|c| c.phase());
        assert_eq!(phase, Some(Phase::Analyzing));
    }

    #[test]
    fn test_high_urge_relapse_persists_through_effect() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(3);
        let mut state = signed_in_state(&store);

        state.open_craving(CravingSettings::default());
        state.dispatch_craving(Intent::SetRating(9), &clock, &store);
        let jobs = state.dispatch_craving(Intent::ConfirmAnalysis, &clock, &store);
        state.receive_motivation(
            MotivationReply {
                session_id: jobs[0].session_id,
                motivation: None,
            },
            &clock,
            &store,
        );
        let phase = state.craving.as_ref().map(|c| c.phase());
        assert_eq!(phase, Some(Phase::HighUrge));

        state.dispatch_craving(Intent::Smoked, &clock, &store);

        assert!(state.craving.is_none());
        assert_eq!(store.puts.get(), 1);
        assert_eq!(state.snapshot.as_ref().map(|s| s.quit_since), Some(clock.now()));
    }

    #[test]
    fn test_milestones_become_notifications() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(3);
        let mut state = signed_in_state(&store);

        state.open_craving(CravingSettings::default());
        state.dispatch_craving(Intent::SetRating(2), &clock, &store);
        let jobs = state.dispatch_craving(Intent::ConfirmAnalysis, &clock, &store);
        state.receive_motivation(
            MotivationReply {
                session_id: jobs[0].session_id,
                motivation: None,
            },
            &clock,
            &store,
        );

        clock.advance_secs(120);
        state.tick(&clock, &store);

        let labels: Vec<String> = state
            .notifications
            .visible()
            .iter()
            .map(|n| n.notification_type.message().to_string())
            .collect();
        assert_eq!(labels, vec!["2 min - Heart rate normalizes".to_string()]);
    }

    #[test]
    fn test_toggle_language_reaches_session() {
        let store = MemoryProfileStore::new();
        let clock = clock_after_quit(3);
        let mut state = signed_in_state(&store);
        state.open_craving(CravingSettings::default());

        assert_eq!(state.toggle_language(&clock, &store), Language::It);
        assert_eq!(state.craving.as_ref().map(|c| c.language()), Some(Language::It));
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let store = MemoryProfileStore::new();
        let mut state = signed_in_state(&store);
        state.open_craving(CravingSettings::default());

        state.signed_out();

        assert_eq!(state.view, View::SignIn);
        assert!(state.craving.is_none());
        assert!(state.snapshot.is_none());
        assert_eq!(state.input_mode, InputMode::Normal);
    }
}
