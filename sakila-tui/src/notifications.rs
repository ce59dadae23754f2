//! Notification system for the TUI.
//!
//! Footer notifications are transient; an [`Alert`] blocks all input until
//! the user dismisses it.

use chrono::{DateTime, Duration, Utc};

/// How long a footer notification stays on screen.
pub const NOTIFICATION_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "SUCCESS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < Duration::seconds(NOTIFICATION_TTL_SECS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_expire() {
        let note = Notification::new(NotificationLevel::Success, "Customer added");
        assert!(note.is_fresh(note.created_at));
        assert!(!note.is_fresh(note.created_at + Duration::seconds(NOTIFICATION_TTL_SECS)));
    }
}
