//! Onboarding and "edit stats" form

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::i18n::Language;
use crate::onboarding::{OnboardingForm, STEP_COUNT};
use crate::tui::layout::centered_rect;
use crate::tui::theme::theme;

/// Render the current question with its answer box
pub fn render_onboarding(
    frame: &mut Frame,
    area: Rect,
    form: &OnboardingForm,
    error: Option<&str>,
    language: Language,
) {
    let t = theme();
    let strings = language.strings();
    let panel = centered_rect(area, 60, 12);

    let title = format!(" {} ({}/{}) ", strings.welcome, form.step() + 1, STEP_COUNT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.border_focused))
        .title(title);

    let prefix = if form.is_money_step() {
        format!("{} ", form.currency_symbol())
    } else {
        String::new()
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            strings.onboarding_questions[form.step()],
            t.header_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", t.input_style()),
            Span::styled(prefix, t.muted_style()),
            Span::styled(form.input(), Style::default().fg(t.text)),
            Span::styled("\u{2588}", t.input_style()),
        ]),
        Line::from(""),
    ];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error, t.error_banner_style())));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        panel,
    );
}
