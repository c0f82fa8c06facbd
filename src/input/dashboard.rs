//! Dashboard key handler

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, InputMode};
use crate::craving::Intent;

/// Handle key on the dashboard (no overlay open)
pub fn handle_dashboard_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let minimised = app.state.is_craving_minimised();
    match key.code {
        KeyCode::Char('c') => app.open_craving(),
        KeyCode::Char('o') if minimised => app.open_craving(),
        KeyCode::Char('x') if minimised => app.dispatch_craving(Intent::Close),
        KeyCode::Char('r') => {
            if app.state.snapshot.is_some() {
                app.state.input_mode = InputMode::ConfirmingRelapse;
            }
        }
        KeyCode::Char('e') => app.state.start_editing(),
        KeyCode::Char('l') => app.toggle_language(),
        KeyCode::Char('u') => app.sign_out(),
        KeyCode::Char('q') => app.state.should_quit = true,
        KeyCode::Esc => app.state.notifications.dismiss_latest(),
        _ => {}
    }
    Ok(())
}
