//! Persistence for user progress records
//!
//! One pretty-printed JSON file per user under `~/.respira/profiles/`.

use std::path::{Path, PathBuf};

use crate::config::{categorize_io_error, friendly_io_error_message, profiles_dir, DiskErrorKind};

use super::{ProfileError, UserId, UserProgressSnapshot};

/// Durable record per user
///
/// `get_profile` returns `Ok(None)` when the user has no record yet.
/// `put_profile` replaces the record wholesale; last writer wins.
pub trait ProfileStore {
    fn get_profile(&self, user: &UserId) -> Result<Option<UserProgressSnapshot>, ProfileError>;

    fn put_profile(&self, user: &UserId, snapshot: &UserProgressSnapshot)
        -> Result<(), ProfileError>;
}

/// Store for persisting profiles as JSON files
#[derive(Debug)]
pub struct JsonProfileStore {
    root: PathBuf,
}

impl JsonProfileStore {
    /// Create a store in the default profiles directory
    pub fn new() -> Self {
        Self::with_root(profiles_dir())
    }

    /// Create a store rooted at a specific directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the path to a user's record
    pub fn path_for(&self, user: &UserId) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(user)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for JsonProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for JsonProfileStore {
    fn get_profile(&self, user: &UserId) -> Result<Option<UserProgressSnapshot>, ProfileError> {
        let path = self.path_for(user);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_to_profile_error(&e, "Reading profile")),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ProfileError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    fn put_profile(
        &self,
        user: &UserId,
        snapshot: &UserProgressSnapshot,
    ) -> Result<(), ProfileError> {
        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| ProfileError::Corrupt(e.to_string()))?;

        std::fs::create_dir_all(&self.root)
            .map_err(|e| io_to_profile_error(&e, "Creating profiles directory"))?;
        std::fs::write(self.path_for(user), content)
            .map_err(|e| io_to_profile_error(&e, "Saving profile"))?;

        tracing::debug!(user = %user, "Profile written");
        Ok(())
    }
}

fn io_to_profile_error(e: &std::io::Error, context: &str) -> ProfileError {
    let message = friendly_io_error_message(e, context);
    match categorize_io_error(e) {
        DiskErrorKind::PermissionDenied => ProfileError::PermissionDenied(message),
        _ => ProfileError::Unavailable(message),
    }
}

/// File-name safe form of a user id
fn file_stem(user: &UserId) -> String {
    user.as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
