// User-facing notifications

use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: &str, message: &str, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        }
    }
}

/// Sink for notifications raised by the console
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, title: &str, message: &str, severity: Severity);
}

/// Dispatcher that keeps notifications until they are drained
#[derive(Debug, Default)]
pub struct NotificationQueue {
    notifications: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock())
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.lock().is_empty()
    }
}

impl NotificationDispatcher for NotificationQueue {
    fn dispatch(&self, title: &str, message: &str, severity: Severity) {
        self.notifications
            .lock()
            .push(Notification::new(title, message, severity));
    }
}
