//! Non-fatal findings collected while decoding.

use std::fmt;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// Something looks wrong but decoding continued.
    Warning,
}

/// A message recorded by a reader instead of aborting.
#[derive(Debug, Clone)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.notification_type, self.message)
    }
}
