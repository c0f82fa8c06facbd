//! Log file retention
//!
//! Log files carry their start time in the name, so age is read from there.
//! Files with an unparsable stamp fall back to their modification time.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};

use super::{LOG_PREFIX, LOG_SUFFIX};

/// Default retention period in days
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Delete our log files older than the default retention period
///
/// Returns the number of files deleted.
pub fn cleanup_old_logs(logs_dir: &Path) -> Result<usize> {
    cleanup_old_logs_before(logs_dir, Local::now(), DEFAULT_RETENTION_DAYS)
}

/// Start time encoded in a log file name, if the name is one of ours
fn stamp_from_name(name: &str) -> Option<Option<DateTime<Local>>> {
    let stamp = name.strip_prefix(LOG_PREFIX)?.strip_suffix(LOG_SUFFIX)?;
    Some(
        NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT)
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest()),
    )
}

/// Delete our log files started more than `retention_days` before `now`
pub fn cleanup_old_logs_before(
    logs_dir: &Path,
    now: DateTime<Local>,
    retention_days: u64,
) -> Result<usize> {
    if !logs_dir.exists() {
        return Ok(0);
    }

    let cutoff = now - Duration::days(retention_days as i64);
    let mut deleted = 0;

    for entry in fs::read_dir(logs_dir).context("Failed to read logs directory")? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stamp) = stamp_from_name(name) else {
            continue;
        };

        let started = match stamp {
            Some(started) => started,
            None => match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => DateTime::<Local>::from(modified),
                Err(_) => continue,
            },
        };
        if started >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => deleted += 1,
            Err(e) => tracing::debug!("Could not remove {}: {}", path.display(), e),
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn at(stamp: &str) -> DateTime<Local> {
        let naive = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    fn touch(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn test_cleanup_nonexistent_dir() {
        let path = Path::new("/nonexistent/path/for/testing");
        assert_eq!(cleanup_old_logs(path).unwrap(), 0);
    }

    #[test]
    fn test_stamp_from_name() {
        assert_eq!(
            stamp_from_name("respira-2026-10-01_09-15-00.log"),
            Some(Some(at("2026-10-01_09-15-00")))
        );
        assert_eq!(stamp_from_name("respira-garbage.log"), Some(None));
        assert_eq!(stamp_from_name("otherapp-2026-10-01_09-15-00.log"), None);
        assert_eq!(stamp_from_name("respira-2026-10-01_09-15-00.txt"), None);
    }

    #[test]
    fn test_old_logs_are_deleted_by_name() {
        let dir = TempDir::new().unwrap();
        let old = touch(&dir, "respira-2026-10-01_09-15-00.log");
        let recent = touch(&dir, "respira-2026-10-12_20-00-00.log");

        let now = at("2026-10-14_10-00-00");
        let count = cleanup_old_logs_before(dir.path(), now, DEFAULT_RETENTION_DAYS).unwrap();

        assert_eq!(count, 1);
        assert!(!old.exists());
        assert!(recent.exists());
    }

    #[test]
    fn test_other_files_are_left_alone() {
        let dir = TempDir::new().unwrap();
        let notes = touch(&dir, "notes.txt");
        let foreign = touch(&dir, "otherapp-2020-01-01_00-00-00.log");

        let now = at("2026-10-14_10-00-00");
        assert_eq!(cleanup_old_logs_before(dir.path(), now, 7).unwrap(), 0);
        assert!(notes.exists());
        assert!(foreign.exists());
    }

    #[test]
    fn test_unparsable_stamp_uses_modification_time() {
        let dir = TempDir::new().unwrap();
        let odd = touch(&dir, "respira-manual.log");

        // Just written, so well inside the window
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
        assert!(odd.exists());
    }
}
