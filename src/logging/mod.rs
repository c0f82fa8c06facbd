//! Logging for Respira
//!
//! Everything goes to a timestamped file under `~/.respira/logs/`. The terminal
//! is owned by the UI, so nothing is ever written to stdout or stderr.

mod file_writer;
mod retention;

pub use file_writer::{init_file_logging, LogFileInfo, LoggingGuard};
pub use retention::cleanup_old_logs;

/// File name prefix shared by the writer and retention
const LOG_PREFIX: &str = "respira-";
const LOG_SUFFIX: &str = ".log";
