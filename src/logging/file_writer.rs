//! File-based logging with tracing integration

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use super::{LOG_PREFIX, LOG_SUFFIX};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "respira=info";

/// Information about the current log file
#[derive(Debug, Clone)]
pub struct LogFileInfo {
    /// Full path to the log file
    pub path: PathBuf,
}

/// Generate a timestamped log file path
pub fn create_log_file_path(logs_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    logs_dir.join(format!("{}{}{}", LOG_PREFIX, timestamp, LOG_SUFFIX))
}

/// Shared handle to the open log file
#[derive(Clone)]
struct SharedFile(Arc<Mutex<File>>);

/// Writer handed out per event; locks the file for the duration of one write
struct FileWriter(Arc<Mutex<File>>);

impl std::io::Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut file) => file.write(buf),
            // A poisoned lock only means another writer panicked mid-line
            Err(poisoned) => poisoned.into_inner().write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.0.lock() {
            Ok(mut file) => file.flush(),
            Err(poisoned) => poisoned.into_inner().flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter(Arc::clone(&self.0))
    }
}

/// Guard that keeps the log file open
pub struct LoggingGuard {
    _file: Arc<Mutex<File>>,
}

fn open_log_file(logs_dir: &Path) -> Result<(PathBuf, File)> {
    fs::create_dir_all(logs_dir).context("Failed to create logs directory")?;

    let log_path = create_log_file_path(logs_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    Ok((log_path, file))
}

/// Initialize file logging
///
/// Returns the log file info and a guard that must be kept alive for the duration of logging.
pub fn init_file_logging(logs_dir: PathBuf) -> Result<(LogFileInfo, LoggingGuard)> {
    let (log_path, file) = open_log_file(&logs_dir)?;
    let file = Arc::new(Mutex::new(file));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(SharedFile(Arc::clone(&file)))
        .with_ansi(false)
        .with_target(true);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok((LogFileInfo { path: log_path }, LoggingGuard { _file: file }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_create_log_file_path() {
        let logs_dir = PathBuf::from("/tmp/respira/logs");
        let path = create_log_file_path(&logs_dir);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("respira-"));
        assert!(name.ends_with(".log"));
        assert!(path.starts_with(&logs_dir));
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let logs_dir = temp_dir.path().join("nested").join("logs");

        let (path, _file) = open_log_file(&logs_dir).unwrap();

        assert!(logs_dir.is_dir());
        assert!(path.exists());
    }

    #[test]
    fn test_writer_appends_to_shared_file() {
        let temp_dir = TempDir::new().unwrap();
        let (path, file) = open_log_file(temp_dir.path()).unwrap();
        let shared = SharedFile(Arc::new(Mutex::new(file)));

        shared.make_writer().write_all(b"first\n").unwrap();
        shared.make_writer().write_all(b"second\n").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }
}
