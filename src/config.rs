//! Configuration management for Respira

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::craving::CravingSettings;
use crate::i18n::Language;
use crate::motivation::ToneThresholds;

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "Disk full - free space needed to save",
            DiskErrorKind::PermissionDenied => "Permission denied writing to ~/.respira/",
            DiskErrorKind::NotFound => "File or directory not found",
            DiskErrorKind::Other => "Failed to save data",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &std::io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 on Linux / 69 on macOS
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Create a user-friendly error message from an IO error
pub fn friendly_io_error_message(e: &std::io::Error, context: &str) -> String {
    let kind = categorize_io_error(e);
    match kind {
        DiskErrorKind::DiskFull | DiskErrorKind::PermissionDenied => {
            format!("{}: {}", context, kind.user_message())
        }
        DiskErrorKind::NotFound => format!("{}: file or directory not found", context),
        DiskErrorKind::Other => format!("{}: {}", context, e),
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interface language, toggled from the dashboard
    #[serde(default)]
    pub language: Language,

    /// External text generator: program followed by its arguments.
    /// When absent every motivational message comes from the local fallback.
    #[serde(default)]
    pub generator_command: Option<Vec<String>>,

    /// Seconds to wait for the generator before falling back (default: 10)
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,

    /// Length of the guided wait in seconds (default: 600 = 10 min)
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,

    /// Urge intensities below this value go to the guided wait (default: 6)
    #[serde(default = "default_branch_threshold")]
    pub branch_threshold: u8,

    /// Seconds between automatic activity switches (default: 90)
    #[serde(default = "default_rotation_secs")]
    pub rotation_secs: u64,

    /// Intensity at which the motivational tone becomes "mid" (default: 5)
    #[serde(default = "default_tone_mid")]
    pub tone_mid_threshold: u8,

    /// Intensity at which the motivational tone becomes "high" (default: 8)
    #[serde(default = "default_tone_high")]
    pub tone_high_threshold: u8,

    /// Auto-dismiss time for notifications in seconds (default: 8)
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
}

fn default_generation_timeout() -> u64 {
    10
}

fn default_countdown_secs() -> u32 {
    600 // 10 minutes
}

fn default_branch_threshold() -> u8 {
    6
}

fn default_rotation_secs() -> u64 {
    90
}

fn default_tone_mid() -> u8 {
    5
}

fn default_tone_high() -> u8 {
    8
}

fn default_notification_secs() -> u64 {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            generator_command: None,
            generation_timeout_secs: default_generation_timeout(),
            countdown_secs: default_countdown_secs(),
            branch_threshold: default_branch_threshold(),
            rotation_secs: default_rotation_secs(),
            tone_mid_threshold: default_tone_mid(),
            tone_high_threshold: default_tone_high(),
            notification_secs: default_notification_secs(),
        }
    }
}

impl Config {
    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Settings for a new craving session
    pub fn craving_settings(&self) -> CravingSettings {
        CravingSettings {
            countdown_secs: self.countdown_secs,
            branch_threshold: self.branch_threshold,
            rotation_period: Duration::from_secs(self.rotation_secs),
            tone: self.tone_thresholds(),
        }
    }

    /// Tone band thresholds for the motivational text
    pub fn tone_thresholds(&self) -> ToneThresholds {
        ToneThresholds {
            mid: self.tone_mid_threshold,
            high: self.tone_high_threshold,
        }
    }

    /// Generator timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }
}

/// Get the base configuration directory (~/.respira)
/// Falls back to ./.respira if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".respira")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".respira"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Get the path to the per-user profile records
pub fn profiles_dir() -> PathBuf {
    config_dir().join("profiles")
}

/// Ensure all required directories exist
pub fn ensure_directories() -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
    std::fs::create_dir_all(profiles_dir()).context("Failed to create profiles directory")?;
    std::fs::create_dir_all(logs_dir()).context("Failed to create logs directory")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.countdown_secs, 600);
        assert_eq!(config.branch_threshold, 6);
        assert_eq!(config.rotation_secs, 90);
        assert_eq!(config.generation_timeout_secs, 10);
        assert!(config.generator_command.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.language = Language::It;
        config.generator_command = Some(vec!["motivate".to_string(), "--short".to_string()]);

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.language, Language::It);
        assert_eq!(
            parsed.generator_command,
            Some(vec!["motivate".to_string(), "--short".to_string()])
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("language = \"it\"\nbranch_threshold = 4\n").unwrap();
        assert_eq!(parsed.language, Language::It);
        assert_eq!(parsed.branch_threshold, 4);
        assert_eq!(parsed.countdown_secs, 600);
        assert_eq!(parsed.tone_high_threshold, 8);
    }

    #[test]
    fn test_craving_settings_from_config() {
        let config = Config::default();
        let settings = config.craving_settings();
        assert_eq!(settings.countdown_secs, 600);
        assert_eq!(settings.rotation_period, Duration::from_secs(90));
        assert_eq!(settings.tone.mid, 5);
        assert_eq!(settings.tone.high, 8);
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with(".respira"));
    }

    #[test]
    fn test_categorize_permission_denied() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(categorize_io_error(&err), DiskErrorKind::PermissionDenied);
        assert!(friendly_io_error_message(&err, "Saving profile").contains("Permission denied"));
    }

    #[test]
    fn test_categorize_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(categorize_io_error(&err), DiskErrorKind::NotFound);
    }
}
