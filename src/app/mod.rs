//! Application state and main event loop
//!
//! `App` owns the terminal, the account session, the profile store and the
//! channel motivation replies come back on. Screen logic lives in
//! [`AppState`]; this module wires it to real time and real I/O.

mod input_mode;
mod state;
mod view;

pub use input_mode::InputMode;
pub use state::{AppState, MotivationJob, MotivationReply};
pub use view::View;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;

use crate::account::{AccountEvent, AccountEventReceiver, AccountSession};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::craving::Intent;
use crate::logging::LogFileInfo;
use crate::motivation::command::CommandSource;
use crate::motivation::{MotivationRequester, MotivationSource};
use crate::profile::store::JsonProfileStore;
use crate::profile::ProfileStore;
use crate::tui::views::{
    render_craving_banner, render_craving_modal, render_dashboard, render_notifications,
    render_onboarding, render_relapse_dialog, render_setup_error, render_sign_in,
};
use crate::tui::{theme, Breadcrumb, Header, ScreenLayout, Tui};

/// Poll timeout; bounds timer latency during a craving
const TICK_RATE: Duration = Duration::from_millis(50);
/// Redraw interval for the dashboard clock
const CLOCK_REDRAW: Duration = Duration::from_secs(1);

/// Main application struct
pub struct App {
    pub(crate) config: Config,
    pub(crate) state: AppState,
    pub(crate) account: AccountSession,
    account_rx: AccountEventReceiver,
    pub(crate) store: JsonProfileStore,
    requester: MotivationRequester,
    reply_tx: mpsc::UnboundedSender<MotivationReply>,
    reply_rx: mpsc::UnboundedReceiver<MotivationReply>,
    pub(crate) clock: SystemClock,
    pub(crate) tui: Tui,
    /// Information about the current log file
    log_file_info: LogFileInfo,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, log_file_info: LogFileInfo) -> Result<Self> {
        let mut account = AccountSession::load()?;
        let account_rx = account.subscribe();

        let source = config
            .generator_command
            .as_deref()
            .and_then(CommandSource::from_command)
            .map(|source| Arc::new(source) as Arc<dyn MotivationSource>);
        if source.is_none() {
            tracing::info!("No generator command configured, using local texts");
        }
        let requester = MotivationRequester::new(source, config.generation_timeout());

        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let state = AppState::new(
            config.language,
            Duration::from_secs(config.notification_secs),
        );

        Ok(Self {
            config,
            state,
            account,
            account_rx,
            store: JsonProfileStore::new(),
            requester,
            reply_tx,
            reply_rx,
            clock: SystemClock,
            tui: Tui::new()?,
            log_file_info,
        })
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        tracing::info!(
            "Respira started, logging to {}",
            self.log_file_info.path.display()
        );

        // Resume the remembered user
        if let Some(user) = self.account.current_user_id().cloned() {
            let lookup = self.store.get_profile(&user);
            self.state.signed_in(user, lookup);
        }

        let result = self.event_loop().await;

        self.tui.exit();

        result
    }

    /// Main event loop
    async fn event_loop(&mut self) -> Result<()> {
        self.state.needs_render = true;
        let mut last_render = Instant::now();

        loop {
            if self.state.needs_render
                || self.state.input_mode == InputMode::Craving
                || last_render.elapsed() >= CLOCK_REDRAW
            {
                self.render()?;
                self.state.needs_render = false;
                last_render = Instant::now();
            }

            if event::poll(TICK_RATE)? {
                match event::read()? {
                    Event::Key(key) => {
                        crate::input::dispatcher::handle_key_event(self, key)?;
                        self.state.needs_render = true;
                    }
                    Event::Paste(text) => {
                        self.handle_paste_event(&text);
                        self.state.needs_render = true;
                    }
                    Event::Mouse(mouse) => {
                        if crate::input::craving::handle_mouse_event(self, mouse)? {
                            self.state.needs_render = true;
                        }
                    }
                    Event::Resize(_, _) => self.state.needs_render = true,
                    _ => {}
                }
            }

            if self.process_account_events() {
                self.state.needs_render = true;
            }

            if self.process_motivation_replies() {
                self.state.needs_render = true;
            }

            let jobs = self.state.tick(&self.clock, &self.store);
            self.spawn_motivation_jobs(jobs);

            if self.state.notifications.tick(Instant::now()) {
                self.state.needs_render = true;
            }

            if self.state.should_quit {
                break;
            }

            // Let spawned generations make progress between polls
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Apply sign-in and sign-out events
    /// Returns true if any events were processed
    fn process_account_events(&mut self) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.account_rx.try_recv() {
            tracing::debug!(?event, "Account event");
            match event {
                AccountEvent::SignedIn(user) => {
                    let lookup = self.store.get_profile(&user);
                    self.state.signed_in(user, lookup);
                }
                AccountEvent::SignedOut => self.state.signed_out(),
            }
            had_events = true;
        }
        had_events
    }

    /// Deliver finished generations to the craving session
    fn process_motivation_replies(&mut self) -> bool {
        let mut had_replies = false;
        while let Ok(reply) = self.reply_rx.try_recv() {
            let jobs = self
                .state
                .receive_motivation(reply, &self.clock, &self.store);
            self.spawn_motivation_jobs(jobs);
            had_replies = true;
        }
        had_replies
    }

    /// Start a background generation per job
    ///
    /// The reply always arrives: a panicked generation reports `None`, which
    /// the session turns into local text.
    fn spawn_motivation_jobs(&self, jobs: Vec<MotivationJob>) {
        for job in jobs {
            let requester = self.requester.clone();
            let tx = self.reply_tx.clone();
            tokio::spawn(async move {
                let MotivationJob {
                    session_id,
                    request,
                } = job;
                let handle = tokio::spawn(async move { requester.request(&request).await });
                let motivation = match handle.await {
                    Ok(motivation) => Some(motivation),
                    Err(e) => {
                        tracing::warn!(session = %session_id, error = %e, "Generation task failed");
                        None
                    }
                };
                if tx
                    .send(MotivationReply {
                        session_id,
                        motivation,
                    })
                    .is_err()
                {
                    tracing::debug!(session = %session_id, "App gone before motivation reply");
                }
            });
        }
    }

    /// Handle paste event (for clipboard paste support)
    fn handle_paste_event(&mut self, text: &str) {
        let cleaned = text.lines().next().unwrap_or("").trim();
        match self.state.view {
            View::SignIn => self.state.push_sign_in_text(cleaned),
            View::Onboarding => {
                if let Some(form) = &mut self.state.form {
                    form.push_str(cleaned);
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Actions (called by input handlers)
    // ========================================================================

    /// Forward an intent to the craving session and start any generations
    pub(crate) fn dispatch_craving(&mut self, intent: Intent) {
        let jobs = self
            .state
            .dispatch_craving(intent, &self.clock, &self.store);
        self.spawn_motivation_jobs(jobs);
    }

    pub(crate) fn open_craving(&mut self) {
        if self.state.open_craving(self.config.craving_settings()) {
            tracing::info!("Craving session opened");
        }
    }

    pub(crate) fn submit_form(&mut self) {
        self.state.submit_form(&self.store, &self.clock);
    }

    pub(crate) fn answer_relapse_dialog(&mut self, confirmed: bool) {
        self.state
            .answer_relapse_dialog(confirmed, &self.clock, &self.store);
    }

    /// Switch language and remember the choice
    pub(crate) fn toggle_language(&mut self) {
        let language = self.state.toggle_language(&self.clock, &self.store);
        self.config.language = language;
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "Failed to save language preference");
            self.state.notifications.warn(format!("{:#}", e));
        }
    }

    /// Sign in with the typed name; the account event finishes the switch
    pub(crate) fn sign_in(&mut self) {
        let name = self.state.sign_in_name.clone();
        if let Err(e) = self.account.sign_in(&name) {
            tracing::warn!(error = %e, "Sign-in failed");
            self.state.notifications.warn(format!("{:#}", e));
        }
    }

    pub(crate) fn sign_out(&mut self) {
        if let Err(e) = self.account.sign_out() {
            tracing::warn!(error = %e, "Sign-out failed");
            self.state.notifications.warn(format!("{:#}", e));
        }
    }

    /// Render the current state to the terminal
    fn render(&mut self) -> Result<()> {
        let state = &self.state;
        let now = self.clock.now();
        let instant = self.clock.instant();

        self.tui.draw(|frame| {
            let area = frame.size();
            let strings = state.language.strings();

            let mut header = Header::new(Breadcrumb::new().push(state.view.title()))
                .with_countdown(state.craving.as_ref().map(|c| c.remaining_secs()));
            if let Some(user) = &state.user {
                header = header
                    .with_account(format!("{} \u{00B7} {}", user, state.language.code()));
            }

            let minimised = state.is_craving_minimised();
            let layout = ScreenLayout::new(area)
                .with_header(header)
                .with_footer_height(if minimised { 2 } else { 1 })
                .render(frame);

            match state.view {
                View::SignIn => {
                    render_sign_in(frame, layout.content, &state.sign_in_name, state.language)
                }
                View::Onboarding => {
                    if let Some(form) = &state.form {
                        render_onboarding(
                            frame,
                            layout.content,
                            form,
                            state.form_error.as_deref(),
                            state.language,
                        );
                    }
                }
                View::Dashboard => {
                    if let Some(snapshot) = &state.snapshot {
                        render_dashboard(frame, layout.content, snapshot, state.language, now);
                    }
                }
                View::SetupError => render_setup_error(
                    frame,
                    layout.content,
                    state.setup_error.as_deref().unwrap_or_default(),
                    state.language,
                ),
            }

            if let Some(footer) = layout.footer {
                let hints = match state.view {
                    View::SignIn => strings.sign_in_hints,
                    View::Onboarding => strings.onboarding_hints,
                    View::Dashboard => strings.dashboard_hints,
                    View::SetupError => strings.setup_error_hints,
                };
                let hints_row = Rect {
                    y: footer.bottom().saturating_sub(1),
                    height: 1,
                    ..footer
                };
                frame.render_widget(
                    Paragraph::new(hints).style(theme().muted_style()),
                    hints_row,
                );
                if let (true, Some(session)) = (minimised, &state.craving) {
                    render_craving_banner(frame, Rect { height: 1, ..footer }, session);
                }
            }

            match (state.input_mode, &state.craving, &state.snapshot) {
                (InputMode::Craving, Some(session), _) => {
                    render_craving_modal(frame, area, session, instant)
                }
                (InputMode::ConfirmingRelapse, _, Some(snapshot)) => {
                    render_relapse_dialog(frame, area, snapshot, state.language)
                }
                _ => {}
            }

            render_notifications(frame, area, &state.notifications.visible(), instant);
        })
    }
}
