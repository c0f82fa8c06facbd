//! Main input dispatch logic
//!
//! Routes keyboard events to appropriate handlers based on current mode.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode, View};

/// Handle a key event by routing to the appropriate mode handler
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    // Only process key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.state.should_quit = true;
        return Ok(());
    }

    match app.state.input_mode {
        InputMode::Craving => super::craving::handle_craving_key(app, key),
        InputMode::ConfirmingRelapse => super::dialogs::handle_confirming_relapse_key(app, key),
        InputMode::Normal => match app.state.view {
            View::SignIn => super::text_entry::handle_sign_in_key(app, key),
            View::Onboarding => super::text_entry::handle_onboarding_key(app, key),
            View::Dashboard => super::dashboard::handle_dashboard_key(app, key),
            View::SetupError => super::dialogs::handle_setup_error_key(app, key),
        },
    }
}
