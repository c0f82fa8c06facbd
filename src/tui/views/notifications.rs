//! Notification rendering for TUI
//!
//! Renders notifications in the top-right corner of the screen.

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::notifications::{Notification, NotificationType};
use crate::tui::theme::theme;

/// Width of notification popups
const NOTIFICATION_WIDTH: u16 = 45;
/// Height of each notification
const NOTIFICATION_HEIGHT: u16 = 4;
/// Margin from screen edge
const NOTIFICATION_MARGIN: u16 = 2;

/// Popup rectangle for the notification at `index`, if it fits
fn notification_area(area: Rect, index: usize) -> Option<Rect> {
    let y_offset = NOTIFICATION_MARGIN + (index as u16 * (NOTIFICATION_HEIGHT + 1));
    if y_offset + NOTIFICATION_HEIGHT > area.height {
        return None;
    }
    let width = NOTIFICATION_WIDTH.min(area.width);
    Some(Rect {
        x: area.x + area.width.saturating_sub(width + NOTIFICATION_MARGIN),
        y: area.y + y_offset,
        width,
        height: NOTIFICATION_HEIGHT,
    })
}

/// Render notifications in the top-right corner
pub fn render_notifications(
    frame: &mut Frame,
    area: Rect,
    notifications: &[&Notification],
    now: Instant,
) {
    let t = theme();

    for (i, notification) in notifications.iter().enumerate() {
        let Some(notif_area) = notification_area(area, i) else {
            break;
        };

        let color = match &notification.notification_type {
            NotificationType::Milestone { .. } => t.milestone,
            NotificationType::Info { .. } => t.accent,
            NotificationType::Warning { .. } => t.border_warning,
        };

        let title = match notification.remaining_time(now) {
            Some(remaining) => format!(
                " {} ({}s) ",
                notification.notification_type.title(),
                remaining.as_secs()
            ),
            None => format!(" {} ", notification.notification_type.title()),
        };

        frame.render_widget(Clear, notif_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(title, Style::default().fg(color).bold()));

        let paragraph = Paragraph::new(notification.notification_type.message())
            .style(Style::default().fg(t.text))
            .block(block)
            .wrap(ratatui::widgets::Wrap { trim: true });

        frame.render_widget(paragraph, notif_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_stack_from_the_top_right() {
        let area = Rect::new(0, 0, 100, 30);
        let first = notification_area(area, 0).unwrap();
        let second = notification_area(area, 1).unwrap();
        assert_eq!(first, Rect::new(53, 2, 45, 4));
        assert_eq!(second.y, first.y + NOTIFICATION_HEIGHT + 1);
    }

    #[test]
    fn test_notifications_that_do_not_fit_are_skipped() {
        let area = Rect::new(0, 0, 100, 8);
        assert!(notification_area(area, 0).is_some());
        assert!(notification_area(area, 1).is_none());
    }

    #[test]
    fn test_narrow_terminal_clips_width() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(notification_area(area, 0).unwrap().width, 30);
    }
}
