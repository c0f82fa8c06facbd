//! User progress records
//!
//! A [`UserProgressSnapshot`] is the only durable state. It is replaced wholesale
//! on every edit and on relapse; nothing else about past cravings is kept.

pub mod store;

pub use store::{JsonProfileStore, ProfileStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything progress is computed from
///
/// Numbers are not range-checked. A zero pack size or a negative price flows
/// through the calculator as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgressSnapshot {
    /// Point in time abstinence is measured from
    pub quit_since: DateTime<Utc>,
    /// Cigarettes per day before quitting
    pub daily_count: f64,
    /// Price of one pack
    pub unit_price: f64,
    /// Cigarettes per pack
    pub pack_size: f64,
    /// What the savings are for
    pub goal_label: String,
    /// Target amount for the goal
    pub goal_cost: f64,
    /// Display-only currency symbol
    pub currency_symbol: String,
}

impl UserProgressSnapshot {
    /// Same record with a new quit timestamp
    pub fn with_quit_since(&self, quit_since: DateTime<Utc>) -> Self {
        Self {
            quit_since,
            ..self.clone()
        }
    }

    /// Price of a single cigarette
    pub fn cost_per_unit(&self) -> f64 {
        self.unit_price / self.pack_size
    }

    /// Format an amount with this record's currency symbol
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

/// Failures of the profile boundary
///
/// A missing record is not an error; stores return `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("permission denied accessing the profile store: {0}")]
    PermissionDenied(String),

    #[error("profile store unavailable: {0}")]
    Unavailable(String),

    #[error("profile record is corrupt: {0}")]
    Corrupt(String),
}

impl ProfileError {
    /// Permission problems are configuration issues, never retried
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ProfileError::PermissionDenied(_))
    }
}

/// Replace the stored record after the user edited their stats
///
/// Unlike relapse, this path is not optimistic: a failed write aborts the
/// edit and the caller keeps the previous snapshot.
pub fn save_stats(
    store: &dyn ProfileStore,
    user: &UserId,
    snapshot: &UserProgressSnapshot,
) -> Result<(), ProfileError> {
    store.put_profile(user, snapshot)?;
    tracing::info!(user = %user, "Saved edited stats");
    Ok(())
}
