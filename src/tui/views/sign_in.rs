//! Sign-in and setup error screens

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::i18n::Language;
use crate::tui::layout::centered_rect;
use crate::tui::theme::theme;

pub fn render_sign_in(frame: &mut Frame, area: Rect, name: &str, language: Language) {
    let t = theme();
    let strings = language.strings();
    let panel = centered_rect(area, 50, 8);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(strings.welcome, t.header_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", strings.sign_in_prompt), t.input_style()),
            Span::styled(name, Style::default().fg(t.text)),
            Span::styled("\u{2588}", t.input_style()),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.border_focused))
                .title(format!(" {} ", strings.sign_in_title)),
        ),
        panel,
    );
}

/// Full-screen notice when the profile store refuses access
pub fn render_setup_error(frame: &mut Frame, area: Rect, message: &str, language: Language) {
    let t = theme();
    let strings = language.strings();
    let panel = centered_rect(area, 64, 10);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(t.text))),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.error_bg))
                .title(Span::styled(
                    format!(" {} ", strings.setup_error_title),
                    t.error_banner_style(),
                )),
        ),
        panel,
    );
}
