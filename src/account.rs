//! Local account session
//!
//! Respira has no credentials. Signing in picks a name; the derived identifier
//! keys the profile store and is remembered in `~/.respira/session.toml` so the
//! next launch resumes the same user.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::config_dir;
use crate::profile::UserId;

const SESSION_FILE: &str = "session.toml";
const EVENT_BUFFER: usize = 16;

/// Sign-in state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    SignedIn(UserId),
    SignedOut,
}

/// Sender half of an account event subscription
pub type AccountEventSender = mpsc::Sender<AccountEvent>;

/// Receiver half of an account event subscription
pub type AccountEventReceiver = mpsc::Receiver<AccountEvent>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
}

/// Who is signed in
#[derive(Debug)]
pub struct AccountSession {
    path: PathBuf,
    current: Option<UserId>,
    subscribers: Vec<AccountEventSender>,
}

impl AccountSession {
    /// Restore the session from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(config_dir().join(SESSION_FILE))
    }

    /// Restore the session from a specific file
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = if path.exists() {
            let content =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            match toml::from_str::<SessionFile>(&content) {
                Ok(file) => file.user_id,
                Err(e) => {
                    warn!("Ignoring unreadable session file: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            path,
            current,
            subscribers: Vec::new(),
        })
    }

    pub fn current_user_id(&self) -> Option<&UserId> {
        self.current.as_ref()
    }

    /// Sign in under `name`, replacing any current user
    pub fn sign_in(&mut self, name: &str) -> Result<UserId> {
        let Some(user) = user_id_from_name(name) else {
            bail!("Name must contain at least one letter or digit");
        };

        self.persist(Some(&user))?;
        self.current = Some(user.clone());
        info!(user = %user, "Signed in");
        self.publish(AccountEvent::SignedIn(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Ok(());
        }
        self.persist(None)?;
        self.current = None;
        info!("Signed out");
        self.publish(AccountEvent::SignedOut);
        Ok(())
    }

    /// Receive every future sign-in and sign-out
    pub fn subscribe(&mut self) -> AccountEventReceiver {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: AccountEvent) {
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Account event channel full, dropping event");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    fn persist(&self, user: Option<&UserId>) -> Result<()> {
        let file = SessionFile {
            user_id: user.cloned(),
        };
        let content = toml::to_string_pretty(&file).context("Failed to serialize session")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        std::fs::write(&self.path, content).context("Failed to write session file")?;
        Ok(())
    }
}

/// Normalise a display name into an identifier: lowercase, words joined by '-'
pub fn user_id_from_name(name: &str) -> Option<UserId> {
    let id = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if id.is_empty() {
        None
    } else {
        Some(UserId::new(id))
    }
}
