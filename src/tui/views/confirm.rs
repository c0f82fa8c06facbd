//! Confirmation dialog
//!
//! Used for "I smoked" from the dashboard: a warning-bordered box with a
//! message and the y/n prompt underneath.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::i18n::{fill, Language};
use crate::profile::UserProgressSnapshot;
use crate::tui::layout::centered_rect;
use crate::tui::theme::theme;

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 9;

/// Configuration for a confirmation dialog
pub struct ConfirmDialogConfig<'a> {
    pub title: &'a str,
    pub message: String,
    /// Key prompt, e.g. "y: confirm | n/Esc: cancel"
    pub hints: &'a str,
}

/// Render a confirmation dialog centred in `area`
///
/// Border in the warning colour, message centred, hints muted at the bottom.
pub fn render_confirm_dialog(frame: &mut Frame, area: Rect, config: ConfirmDialogConfig) {
    let t = theme();
    let dialog = centered_rect(area, DIALOG_WIDTH, DIALOG_HEIGHT);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(config.message, Style::default().fg(t.text))),
        Line::from(""),
        Line::from(Span::styled(
            config.hints,
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.border_warning))
                .title(format!(" {} ", config.title)),
        );

    frame.render_widget(Clear, dialog);
    frame.render_widget(paragraph, dialog);
}

/// Dialog asking whether to restart the counter after smoking
pub fn render_relapse_dialog(
    frame: &mut Frame,
    area: Rect,
    snapshot: &UserProgressSnapshot,
    language: Language,
) {
    let strings = language.strings();
    render_confirm_dialog(
        frame,
        area,
        ConfirmDialogConfig {
            title: strings.lapse_title,
            message: fill(strings.lapse_text, &[("goal", snapshot.goal_label.as_str())]),
            hints: strings.lapse_hints,
        },
    );
}
