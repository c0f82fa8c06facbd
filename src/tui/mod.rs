//! Terminal UI module
//!
//! Terminal setup and teardown plus the ratatui components the views share.

pub mod header;
pub mod layout;
pub mod notifications;
pub mod theme;
pub mod views;

pub use header::{Breadcrumb, Header};
pub use layout::{centered_rect, LayoutAreas, ScreenLayout};
pub use notifications::{Notification, NotificationManager, NotificationType};
pub use theme::{theme, Theme};

use std::fmt::Display;
use std::io::{self, stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;

type Backend = CrosstermBackend<io::Stdout>;

/// Optional terminal features that were switched on by [`Tui::enter`]
#[derive(Debug, Default, Clone, Copy)]
struct Features {
    /// Paste into the name and goal fields
    bracketed_paste: bool,
    /// The urge dial is dragged with the mouse
    mouse_capture: bool,
}

/// Where teardown problems are reported
#[derive(Clone, Copy)]
enum Reporter {
    /// Normal exit, tracing is up
    Tracing,
    /// Drop during unwinding; tracing may already be gone
    Stderr,
}

impl Reporter {
    fn check<T, E: Display>(self, step: &str, result: std::result::Result<T, E>) {
        if let Err(e) = result {
            match self {
                Reporter::Tracing => tracing::warn!("Terminal restore, {} failed: {}", step, e),
                Reporter::Stderr => eprintln!("Terminal restore, {} failed: {}", step, e),
            }
        }
    }
}

/// Undo everything `enter` did, in reverse order, carrying on past failures
fn restore(terminal: &mut Terminal<Backend>, features: Features, reporter: Reporter) {
    let mut out = stdout();
    if features.mouse_capture {
        reporter.check("disable mouse capture", out.execute(DisableMouseCapture));
    }
    if features.bracketed_paste {
        reporter.check("disable bracketed paste", out.execute(DisableBracketedPaste));
    }
    reporter.check("show cursor", terminal.show_cursor());
    reporter.check("leave alternate screen", out.execute(LeaveAlternateScreen));
    reporter.check("disable raw mode", disable_raw_mode());
}

/// Terminal UI wrapper
///
/// Owns the terminal while the app runs and puts it back the way it was on
/// exit or drop.
pub struct Tui {
    terminal: Terminal<Backend>,
    /// Set between `enter` and `exit`
    active: Option<Features>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal =
            Terminal::new(CrosstermBackend::new(stdout())).context("Failed to create terminal")?;
        Ok(Self {
            terminal,
            active: None,
        })
    }

    /// Switch to raw mode on the alternate screen
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;

        let features = Features {
            bracketed_paste: out.execute(EnableBracketedPaste).is_ok(),
            mouse_capture: out.execute(EnableMouseCapture).is_ok(),
        };
        if !features.mouse_capture {
            tracing::warn!("Mouse capture unavailable, the dial works with arrow keys only");
        }
        self.active = Some(features);

        self.terminal.hide_cursor().context("Failed to hide cursor")?;
        self.terminal.clear().context("Failed to clear terminal")?;
        tracing::debug!(?features, "Terminal ready");
        Ok(())
    }

    /// Restore the terminal; safe to call more than once
    pub fn exit(&mut self) {
        if let Some(features) = self.active.take() {
            restore(&mut self.terminal, features, Reporter::Tracing);
            tracing::debug!("Terminal restored");
        }
    }

    pub fn size(&self) -> Result<Rect> {
        self.terminal.size().context("Failed to read terminal size")
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).context("Failed to draw frame")?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Some(features) = self.active.take() {
            restore(&mut self.terminal, features, Reporter::Stderr);
        }
    }
}
