//! Input handling module
//!
//! Handles keyboard and mouse input dispatching based on current mode and view.

pub mod craving;
pub mod dashboard;
pub mod dialogs;
pub mod dispatcher;
pub mod text_entry;

// Re-export commonly used items
pub use dispatcher::handle_key_event;
