//! Confirmation dialog handlers
//!
//! The relapse confirmation and the setup error screen.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;

/// Handle key when confirming "I smoked" from the dashboard
pub fn handle_confirming_relapse_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_relapse_dialog(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.answer_relapse_dialog(false)
        }
        _ => {}
    }
    Ok(())
}

/// Handle key on the setup error screen
pub fn handle_setup_error_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('u') => app.sign_out(),
        KeyCode::Char('q') | KeyCode::Esc => app.state.should_quit = true,
        _ => {}
    }
    Ok(())
}
