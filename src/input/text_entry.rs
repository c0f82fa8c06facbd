//! Text input handlers
//!
//! The sign-in name and the onboarding answers.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;

/// Handle key on the sign-in screen
pub fn handle_sign_in_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.state.should_quit = true,
        KeyCode::Enter => app.sign_in(),
        KeyCode::Backspace => {
            app.state.sign_in_name.pop();
        }
        KeyCode::Char(c) => {
            let mut buf = [0; 4];
            app.state.push_sign_in_text(c.encode_utf8(&mut buf));
        }
        _ => {}
    }
    Ok(())
}

/// Handle key while answering the onboarding questions
pub fn handle_onboarding_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc => {
            // Step back first; leaving is only possible with a profile to return to
            let stepped_back = app.state.form.as_mut().is_some_and(|form| form.back());
            if stepped_back {
                app.state.form_error = None;
            } else {
                app.state.cancel_form();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = &mut app.state.form {
                form.backspace();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = &mut app.state.form {
                form.push_char(c);
            }
        }
        _ => {}
    }
    Ok(())
}
