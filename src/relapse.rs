//! Relapse resolution
//!
//! Logging a cigarette restarts the quit timestamp. The new snapshot is kept
//! in memory even when the store rejects it; the store error comes back as a
//! warning for the caller to show.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::profile::{ProfileError, ProfileStore, UserId, UserProgressSnapshot};

/// Result of a confirmed relapse
#[derive(Debug, Clone, PartialEq)]
pub struct RelapseOutcome {
    /// Snapshot to use from now on
    pub snapshot: UserProgressSnapshot,
    /// Set when the store could not persist it
    pub warning: Option<ProfileError>,
}

/// Same snapshot with `quit_since` moved to `now`
pub fn confirm_relapse(current: &UserProgressSnapshot, now: DateTime<Utc>) -> UserProgressSnapshot {
    current.with_quit_since(now)
}

/// Reset the quit timestamp and persist it, optimistically
pub fn resolve_relapse(
    store: &dyn ProfileStore,
    user: &UserId,
    current: &UserProgressSnapshot,
    now: DateTime<Utc>,
) -> RelapseOutcome {
    let snapshot = confirm_relapse(current, now);
    let warning = match store.put_profile(user, &snapshot) {
        Ok(()) => {
            info!(user = %user, quit_since = %now, "Quit timestamp reset");
            None
        }
        Err(e) => {
            warn!(user = %user, error = %e, "Failed to persist relapse, keeping it in memory");
            Some(e)
        }
    };
    RelapseOutcome { snapshot, warning }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::{sample_snapshot, MemoryProfileStore};

    #[test]
    fn test_confirm_only_moves_quit_since() {
        let current = sample_snapshot();
        let now = current.quit_since + chrono::Duration::days(12);

        let next = confirm_relapse(&current, now);
        assert_eq!(next.quit_since, now);
        assert_eq!(next.with_quit_since(current.quit_since), current);
    }

    #[test]
    fn test_resolve_persists_once() {
        let store = MemoryProfileStore::new();
        let user = UserId::new("marta");
        let current = sample_snapshot();
        let now = current.quit_since + chrono::Duration::hours(5);

        let outcome = resolve_relapse(&store, &user, &current, now);

        assert!(outcome.warning.is_none());
        assert_eq!(outcome.snapshot.quit_since, now);
        assert_eq!(store.puts.get(), 1);
        assert_eq!(store.stored(&user), Some(outcome.snapshot));
    }

    #[test]
    fn test_resolve_is_optimistic_on_failure() {
        let store = MemoryProfileStore::failing(ProfileError::Unavailable("disk".into()));
        let user = UserId::new("marta");
        let current = sample_snapshot();
        let now = current.quit_since + chrono::Duration::hours(5);

        let outcome = resolve_relapse(&store, &user, &current, now);

        assert_eq!(outcome.snapshot.quit_since, now);
        assert_eq!(
            outcome.warning,
            Some(ProfileError::Unavailable("disk".into()))
        );
        assert_eq!(store.puts.get(), 1);
    }
}
