//! Notification system for the GUI
//!
//! Turns screen outcomes into notification entries.

use crate::screen::{Outcome, ScreenError};
use std::collections::VecDeque;

/// Maximum number of notifications kept around
pub const MAX_NOTIFICATIONS: usize = 50;

/// A notification entry with message and timestamp
#[derive(Clone, Debug)]
pub struct NotificationEntry {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub is_error: bool,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: chrono::Local::now(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(message)
        }
    }

    pub fn time_ago(&self) -> String {
        let now = chrono::Local::now();
        let duration = now.signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }
}

/// Notification for an applied outcome
///
/// Plain successful loads stay quiet; stale responses never notify.
pub fn outcome_notification(outcome: &Outcome) -> Option<NotificationEntry> {
    match outcome {
        Outcome::Loaded { .. } | Outcome::Stale => None,
        Outcome::Refunded { id } => Some(NotificationEntry::new(format!(
            "[OK] Refund issued for transaction #{}",
            id
        ))),
        Outcome::LoadFailed(e) | Outcome::RefundFailed(e) => {
            Some(NotificationEntry::error(format!("[!!] {}", e)))
        }
    }
}

/// Notification for a command the screen refused
pub fn rejection_notification(error: &ScreenError) -> NotificationEntry {
    NotificationEntry::error(format!("[--] {}", error))
}

/// Push an entry, dropping the oldest beyond `MAX_NOTIFICATIONS`
pub fn push_notification(notifications: &mut VecDeque<NotificationEntry>, entry: NotificationEntry) {
    notifications.push_back(entry);
    while notifications.len() > MAX_NOTIFICATIONS {
        notifications.pop_front();
    }
}
