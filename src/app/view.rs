//! View enum
//!
//! Defines the screen being displayed underneath any overlay.

/// Current view being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Nobody is signed in
    #[default]
    SignIn,
    /// Answering the five questions (first run or "edit stats")
    Onboarding,
    /// Savings, elapsed time and goal progress
    Dashboard,
    /// The profile store refused access; nothing else is reachable
    SetupError,
}

impl View {
    /// Title used in the header breadcrumb
    pub fn title(&self) -> &'static str {
        match self {
            View::SignIn => "Sign in",
            View::Onboarding => "Setup",
            View::Dashboard => "Dashboard",
            View::SetupError => "Setup error",
        }
    }

    /// Whether a craving can be started from this view
    pub fn allows_craving(&self) -> bool {
        matches!(self, View::Dashboard)
    }
}
