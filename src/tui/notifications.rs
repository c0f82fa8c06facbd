//! Notification management for TUI
//!
//! Transient messages stacked in the top-right corner: milestones reached
//! during a craving, persistence warnings and store errors.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Types of notifications that can be displayed
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationType {
    /// A craving milestone was unlocked
    Milestone { label: String },
    /// Informational message
    Info { message: String },
    /// Something went wrong but the app carries on
    Warning { message: String },
}

impl NotificationType {
    /// Get a title for this notification type
    pub fn title(&self) -> &str {
        match self {
            NotificationType::Milestone { .. } => "Milestone",
            NotificationType::Info { .. } => "Info",
            NotificationType::Warning { .. } => "Warning",
        }
    }

    /// Get the message content
    pub fn message(&self) -> &str {
        match self {
            NotificationType::Milestone { label } => label,
            NotificationType::Info { message } => message,
            NotificationType::Warning { message } => message,
        }
    }
}

/// A notification to be displayed
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    /// How long before auto-dismiss (None = manual dismiss only)
    pub auto_dismiss: Option<Duration>,
}

impl Notification {
    pub fn new(notification_type: NotificationType, auto_dismiss: Option<Duration>) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification_type,
            created_at: Instant::now(),
            auto_dismiss,
        }
    }

    /// Whether this notification has outlived its auto-dismiss time at `now`
    pub fn should_dismiss(&self, now: Instant) -> bool {
        match self.auto_dismiss {
            Some(duration) => now.saturating_duration_since(self.created_at) >= duration,
            None => false,
        }
    }

    /// Get remaining time before auto-dismiss
    pub fn remaining_time(&self, now: Instant) -> Option<Duration> {
        self.auto_dismiss
            .map(|duration| duration.saturating_sub(now.saturating_duration_since(self.created_at)))
    }
}

/// Manages a queue of notifications
#[derive(Debug)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
    /// Maximum number of visible notifications
    max_visible: usize,
    /// Auto-dismiss time used by [`NotificationManager::notify`]
    default_ttl: Duration,
}

impl NotificationManager {
    pub fn new(max_visible: usize, default_ttl: Duration) -> Self {
        Self {
            notifications: VecDeque::new(),
            max_visible,
            default_ttl,
        }
    }

    /// Push a new notification
    pub fn push(&mut self, notification_type: NotificationType, auto_dismiss: Option<Duration>) {
        let notification = Notification::new(notification_type, auto_dismiss);
        self.notifications.push_back(notification);

        // Trim excess notifications (oldest first)
        while self.notifications.len() > self.max_visible * 2 {
            self.notifications.pop_front();
        }
    }

    /// Push with the default auto-dismiss time
    pub fn notify(&mut self, notification_type: NotificationType) {
        self.push(notification_type, Some(self.default_ttl));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.notify(NotificationType::Warning {
            message: message.into(),
        });
    }

    pub fn dismiss(&mut self, id: Uuid) {
        self.notifications.retain(|n| n.id != id);
    }

    /// Remove expired notifications; returns true if any were removed
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| !n.should_dismiss(now));
        self.notifications.len() != before
    }

    /// Get visible notifications (most recent up to max_visible)
    pub fn visible(&self) -> Vec<&Notification> {
        self.notifications
            .iter()
            .rev()
            .take(self.max_visible)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// Dismiss the most recent notification (for keyboard shortcut)
    pub fn dismiss_latest(&mut self) {
        self.notifications.pop_back();
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(message: &str) -> NotificationType {
        NotificationType::Info {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_notification_creation() {
        let notif = Notification::new(info("Test"), Some(Duration::from_secs(30)));
        assert!(!notif.should_dismiss(Instant::now()));
    }

    #[test]
    fn test_notification_auto_dismiss() {
        let notif = Notification::new(info("Test"), Some(Duration::from_millis(10)));
        let later = notif.created_at + Duration::from_millis(20);

        assert!(notif.should_dismiss(later));
        assert_eq!(notif.remaining_time(later), Some(Duration::ZERO));
    }

    #[test]
    fn test_manual_dismiss_only() {
        let notif = Notification::new(info("Sticky"), None);
        assert!(!notif.should_dismiss(notif.created_at + Duration::from_secs(3600)));
        assert_eq!(notif.remaining_time(Instant::now()), None);
    }

    #[test]
    fn test_notification_manager() {
        let mut manager = NotificationManager::new(3, Duration::from_secs(8));
        manager.push(info("Test 1"), None);
        manager.push(info("Test 2"), None);

        assert_eq!(manager.len(), 2);
        let visible = manager.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].notification_type.message(), "Test 2");
    }

    #[test]
    fn test_notification_manager_dismiss() {
        let mut manager = NotificationManager::default();
        manager.push(info("Test"), None);

        let id = manager.visible()[0].id;
        manager.dismiss(id);

        assert!(manager.is_empty());
    }

    #[test]
    fn test_tick_removes_expired() {
        let mut manager = NotificationManager::new(3, Duration::from_secs(8));
        manager.notify(NotificationType::Milestone {
            label: "2 min - Heart rate normalizes".to_string(),
        });
        manager.warn("disk full");

        let now = Instant::now();
        assert!(!manager.tick(now));
        assert!(manager.tick(now + Duration::from_secs(9)));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut manager = NotificationManager::new(2, Duration::from_secs(8));
        for i in 0..10 {
            manager.push(info(&i.to_string()), None);
        }
        assert_eq!(manager.len(), 4);
        assert_eq!(manager.visible()[0].notification_type.message(), "9");
    }

    #[test]
    fn test_titles() {
        let milestone = NotificationType::Milestone {
            label: "x".to_string(),
        };
        assert_eq!(milestone.title(), "Milestone");
        assert_eq!(
            NotificationType::Warning {
                message: "y".to_string()
            }
            .title(),
            "Warning"
        );
    }
}
