//! Input mode enum
//!
//! Defines which overlay, if any, receives keyboard and mouse input.

/// Input mode determines how keyboard input is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys go to the current view. A running craving session shows as a
    /// banner in this mode (minimised).
    #[default]
    Normal,
    /// The craving modal is open
    Craving,
    /// "I smoked" from the dashboard, waiting for y/n
    ConfirmingRelapse,
}
