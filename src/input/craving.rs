//! Craving modal input
//!
//! Keys and mouse events are turned into session intents here. The mapping
//! functions are pure so they can be tested without a terminal.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::activities::{ActivityIntent, ActivityState};
use crate::app::{App, InputMode};
use crate::craving::{CravingSession, Intent, Phase, RatingInput};
use crate::tui::views::craving::{
    craving_layout, dial_center, guided_areas, hit_target, play_area, pointer_offset,
    CravingLayout,
};

/// What a key press asks for while the modal is open
#[derive(Debug, Clone, PartialEq)]
pub enum CravingAction {
    Intent(Intent),
    /// Hide the modal, keep the session running
    Minimise,
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Rating typed as a digit; '0' stands for 10
fn digit_rating(c: char) -> Option<u8> {
    match c.to_digit(10)? {
        0 => Some(10),
        d => Some(d as u8),
    }
}

/// Key aimed at the mounted activity
pub fn activity_key_intent(state: &ActivityState, code: KeyCode) -> Option<ActivityIntent> {
    match (state, code) {
        (ActivityState::TapTarget(targets), KeyCode::Char(c)) => {
            // Targets are labelled 1-9 in spawn order
            let index = c.to_digit(10)?.checked_sub(1)? as usize;
            targets
                .targets()
                .get(index)
                .map(|target| ActivityIntent::TapTarget(target.id))
        }
        (ActivityState::Quiz(quiz), KeyCode::Char(c)) => {
            let index = c.to_digit(10)?.checked_sub(1)? as usize;
            (index < quiz.current().options.len()).then_some(ActivityIntent::AnswerQuiz(index))
        }
        (ActivityState::QuickTap(_), KeyCode::Char(' ') | KeyCode::Enter) => {
            Some(ActivityIntent::QuickTap)
        }
        _ => None,
    }
}

/// Map a key press to a session action for the current phase
pub fn craving_key_action(session: &CravingSession, key: KeyEvent) -> Option<CravingAction> {
    let intent = match (session.phase(), key.code) {
        (_, KeyCode::Esc) => Intent::Close,

        (Phase::Rating, KeyCode::Left | KeyCode::Down) => Intent::StepRating(-1),
        (Phase::Rating, KeyCode::Right | KeyCode::Up) => Intent::StepRating(1),
        (Phase::Rating, KeyCode::Char(c)) => Intent::SetRating(digit_rating(c)?),
        (Phase::Rating, KeyCode::Tab) => Intent::SetContext(session.context().next()),
        (Phase::Rating, KeyCode::Enter) => Intent::ConfirmAnalysis,

        (Phase::Guided, KeyCode::Char('n')) => Intent::Activity(ActivityIntent::Next),
        (Phase::Guided, KeyCode::Char('y')) => Intent::Resisted,
        (Phase::Guided, KeyCode::Char('m')) => return Some(CravingAction::Minimise),
        (Phase::Guided, code) => {
            let state = session.activity()?.state();
            Intent::Activity(activity_key_intent(state, code)?)
        }

        (Phase::HighUrge, KeyCode::Char('y')) => Intent::Resisted,
        (Phase::HighUrge, KeyCode::Char('s')) => Intent::Smoked,

        _ => return None,
    };
    Some(CravingAction::Intent(intent))
}

/// Map a mouse event to a session intent
///
/// The dial keeps the pointer captured from press to release, so drags that
/// leave the modal still update the rating.
pub fn mouse_intent(
    session: &CravingSession,
    layout: &CravingLayout,
    mouse: MouseEvent,
) -> Option<Intent> {
    let (column, row) = (mouse.column, mouse.row);
    match session.phase() {
        Phase::Rating => {
            let captured = session.dial().is_captured();
            let (dx, dy) = pointer_offset(dial_center(layout.body), column, row);
            let input = match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if contains(layout.body, column, row) => {
                    RatingInput::Down { dx, dy }
                }
                MouseEventKind::Drag(MouseButton::Left) if captured => RatingInput::Move { dx, dy },
                MouseEventKind::Up(MouseButton::Left) if captured => RatingInput::Up,
                // Motion with no button held means the release happened elsewhere
                MouseEventKind::Moved if captured => RatingInput::Leave,
                _ => return None,
            };
            Some(Intent::Rating(input))
        }
        Phase::Guided => {
            if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                return None;
            }
            let activity = guided_areas(layout.body).activity;
            let intent = match session.activity()?.state() {
                ActivityState::TapTarget(targets) => ActivityIntent::TapTarget(hit_target(
                    play_area(activity),
                    targets.targets(),
                    column,
                    row,
                )?),
                ActivityState::QuickTap(_) if contains(activity, column, row) => {
                    ActivityIntent::QuickTap
                }
                _ => return None,
            };
            Some(Intent::Activity(intent))
        }
        _ => None,
    }
}

/// Handle key while the craving modal is open
pub fn handle_craving_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let Some(session) = &app.state.craving else {
        app.state.input_mode = InputMode::Normal;
        return Ok(());
    };
    match craving_key_action(session, key) {
        Some(CravingAction::Intent(intent)) => app.dispatch_craving(intent),
        Some(CravingAction::Minimise) => app.state.minimise_craving(),
        None => {}
    }
    Ok(())
}

/// Handle a mouse event
///
/// Returns true if the event caused a state change requiring re-render.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> Result<bool> {
    if app.state.input_mode != InputMode::Craving {
        return Ok(false);
    }
    let Some(session) = &app.state.craving else {
        return Ok(false);
    };

    let layout = craving_layout(app.tui.size()?);
    let Some(intent) = mouse_intent(session, &layout, mouse) else {
        return Ok(false);
    };
    app.dispatch_craving(intent);
    Ok(true)
}
