//! Unified header component
//!
//! One line at the top of every screen: breadcrumb on the left, the signed-in
//! user and language on the right, and the craving countdown when a
//! minimised session is still running.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::progress::format_countdown;
use crate::tui::theme::theme;

/// Height constant for the header (including bottom border)
pub const HEADER_HEIGHT: u16 = 2;

/// Breadcrumb navigation path segments
#[derive(Debug, Clone)]
pub struct Breadcrumb {
    segments: Vec<String>,
}

impl Breadcrumb {
    /// Create a new breadcrumb with the root "Respira" segment
    pub fn new() -> Self {
        Self {
            segments: vec!["Respira".to_string()],
        }
    }

    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Format the breadcrumb as a display string with " > " separators
    pub fn display(&self) -> String {
        self.segments.join(" > ")
    }
}

impl Default for Breadcrumb {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified header component for all views
pub struct Header {
    breadcrumb: Breadcrumb,
    /// Right-aligned account info, e.g. "marta · en"
    account: Option<String>,
    /// Remaining seconds of a running craving countdown
    countdown: Option<u32>,
}

impl Header {
    pub fn new(breadcrumb: Breadcrumb) -> Self {
        Self {
            breadcrumb,
            account: None,
            countdown: None,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Show the craving countdown on the right
    pub fn with_countdown(mut self, remaining_secs: Option<u32>) -> Self {
        self.countdown = remaining_secs;
        self
    }

    fn right_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(secs) = self.countdown {
            parts.push(format!("\u{23F1} {}", format_countdown(secs)));
        }
        if let Some(account) = &self.account {
            parts.push(account.clone());
        }
        parts.join("  ")
    }

    /// Render the header to the given area
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let t = theme();

        let left_text = self.breadcrumb.display();
        let right_text = self.right_text();

        let width = area.width as usize;
        let padding = width.saturating_sub(left_text.chars().count() + right_text.chars().count());

        let line = Line::from(vec![
            Span::raw(left_text),
            Span::raw(" ".repeat(padding)),
            Span::styled(right_text, Style::default().fg(t.countdown)),
        ]);

        let paragraph = Paragraph::new(line)
            .style(t.header_style())
            .block(Block::default().borders(Borders::BOTTOM));

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumb_display() {
        let breadcrumb = Breadcrumb::new().push("Dashboard");
        assert_eq!(breadcrumb.display(), "Respira > Dashboard");
    }

    #[test]
    fn test_right_text_without_countdown() {
        let header = Header::new(Breadcrumb::new()).with_account("marta · en");
        assert_eq!(header.right_text(), "marta · en");
    }

    #[test]
    fn test_right_text_with_countdown() {
        let header = Header::new(Breadcrumb::new())
            .with_account("marta · it")
            .with_countdown(Some(452));
        assert_eq!(header.right_text(), "\u{23F1} 07:32  marta · it");
    }
}
