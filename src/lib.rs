//! Respira - terminal companion for quitting smoking
//!
//! This library provides the core functionality for the Respira application:
//! progress tracking, the craving intervention flow and its terminal UI.

pub mod account;
pub mod activities;
pub mod app;
pub mod clock;
pub mod config;
pub mod craving;
pub mod i18n;
pub mod input;
pub mod logging;
pub mod motivation;
pub mod onboarding;
pub mod profile;
pub mod progress;
pub mod rating;
pub mod relapse;
pub mod timers;
pub mod tui;
