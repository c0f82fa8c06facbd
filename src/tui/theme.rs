//! Theme module for centralized color and style definitions
//!
//! Semantic colors used throughout the UI. Views ask the theme for a color by
//! meaning (savings, urge level, warning) instead of hardcoding one.

use ratatui::style::{Color, Modifier, Style};

/// Application theme with all color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // === Urge levels ===
    /// Ratings below 4
    pub urge_low: Color,
    /// Ratings 4 to 6
    pub urge_mid: Color,
    /// Ratings 7 and up
    pub urge_high: Color,

    // === Progress ===
    /// Money saved and projection chart
    pub savings: Color,
    /// Goal gauge fill
    pub gauge: Color,
    /// Guided countdown
    pub countdown: Color,
    /// Unlocked milestones
    pub milestone: Color,

    // === UI Elements ===
    /// Primary accent color (headers, titles)
    pub accent: Color,
    /// Text color for normal content
    pub text: Color,
    /// Text color for muted/secondary content
    pub text_muted: Color,
    /// Color for selected/focused items
    pub selected: Color,
    /// Color for text being typed
    pub input_prompt: Color,

    // === Banners ===
    /// Error banner background
    pub error_bg: Color,
    /// Error banner foreground
    pub error_fg: Color,
    /// Minimised craving banner background
    pub banner_bg: Color,
    /// Minimised craving banner foreground
    pub banner_fg: Color,

    // === Borders ===
    /// Normal border color
    pub border: Color,
    /// Focused/active border color
    pub border_focused: Color,
    /// Warning border color
    pub border_warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            urge_low: Color::Green,
            urge_mid: Color::Yellow,
            urge_high: Color::Red,

            savings: Color::Green,
            gauge: Color::Cyan,
            countdown: Color::Cyan,
            milestone: Color::Green,

            accent: Color::Cyan,
            text: Color::White,
            text_muted: Color::DarkGray,
            selected: Color::White,
            input_prompt: Color::Magenta,

            error_bg: Color::Red,
            error_fg: Color::White,
            banner_bg: Color::Cyan,
            banner_fg: Color::Black,

            border: Color::White,
            border_focused: Color::Cyan,
            border_warning: Color::Yellow,
        }
    }

    /// Color for an urge rating: green below 4, yellow below 7, red above
    pub fn rating_color(&self, rating: u8) -> Color {
        if rating < 4 {
            self.urge_low
        } else if rating < 7 {
            self.urge_mid
        } else {
            self.urge_high
        }
    }

    // === Style Builders ===

    /// Style for headers/titles
    pub fn header_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for muted text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for selected items
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for input prompts
    pub fn input_style(&self) -> Style {
        Style::default().fg(self.input_prompt)
    }

    /// Style for big figures on the dashboard
    pub fn figure_style(&self) -> Style {
        Style::default()
            .fg(self.savings)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for error banners
    pub fn error_banner_style(&self) -> Style {
        Style::default().fg(self.error_fg).bg(self.error_bg)
    }

    /// Style for the minimised craving banner
    pub fn craving_banner_style(&self) -> Style {
        Style::default().fg(self.banner_fg).bg(self.banner_bg)
    }
}

/// Global theme instance
static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the current theme
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
