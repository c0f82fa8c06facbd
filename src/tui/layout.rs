//! Screen layout helper
//!
//! Splits a screen into header, content and footer, rendering the header on
//! the way. Views draw into the returned content and footer areas.

use ratatui::prelude::*;

use crate::tui::header::{Header, HEADER_HEIGHT};

/// Default footer height (key hints)
pub const DEFAULT_FOOTER_HEIGHT: u16 = 1;

/// Screen layout builder
pub struct ScreenLayout {
    area: Rect,
    header: Option<Header>,
    footer_height: u16,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            header: None,
            footer_height: DEFAULT_FOOTER_HEIGHT,
        }
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    /// Set the footer height (0 for none)
    pub fn with_footer_height(mut self, height: u16) -> Self {
        self.footer_height = height;
        self
    }

    /// Split the area without rendering anything
    pub fn split(&self) -> LayoutAreas {
        let header_height = if self.header.is_some() {
            HEADER_HEIGHT
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Min(0),
                Constraint::Length(self.footer_height),
            ])
            .split(self.area);

        LayoutAreas {
            header: (header_height > 0).then_some(chunks[0]),
            content: chunks[1],
            footer: (self.footer_height > 0).then_some(chunks[2]),
        }
    }

    /// Render the header (if present) and return layout areas
    pub fn render(self, frame: &mut Frame) -> LayoutAreas {
        let areas = self.split();
        if let (Some(header), Some(area)) = (&self.header, areas.header) {
            header.render(frame, area);
        }
        areas
    }
}

/// Areas calculated by ScreenLayout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutAreas {
    pub header: Option<Rect>,
    pub content: Rect,
    pub footer: Option<Rect>,
}

/// A `width` x `height` rectangle centred in `area`, clipped to it
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::header::Breadcrumb;

    #[test]
    fn test_split_with_header_and_footer() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 100, 30))
            .with_header(Header::new(Breadcrumb::new()));
        let areas = layout.split();

        assert_eq!(areas.header, Some(Rect::new(0, 0, 100, HEADER_HEIGHT)));
        assert_eq!(areas.content.height, 30 - HEADER_HEIGHT - DEFAULT_FOOTER_HEIGHT);
        assert_eq!(areas.footer.map(|f| f.y), Some(29));
    }

    #[test]
    fn test_split_without_footer() {
        let areas = ScreenLayout::new(Rect::new(0, 0, 100, 30))
            .with_footer_height(0)
            .split();

        assert!(areas.header.is_none());
        assert!(areas.footer.is_none());
        assert_eq!(areas.content, Rect::new(0, 0, 100, 30));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(area, 60, 20), Rect::new(20, 10, 60, 20));
        // Larger than the area: clipped
        assert_eq!(centered_rect(area, 200, 50), area);
    }
}
