//! View rendering modules
//!
//! Each view in the application has its own module for rendering logic.

pub mod craving;
mod confirm;
mod dashboard;
mod notifications;
mod onboarding;
mod sign_in;

pub use confirm::{render_confirm_dialog, render_relapse_dialog, ConfirmDialogConfig};
pub use craving::{craving_layout, render_craving_banner, render_craving_modal, CravingLayout};
pub use dashboard::render_dashboard;
pub use notifications::render_notifications;
pub use onboarding::render_onboarding;
pub use sign_in::{render_setup_error, render_sign_in};
