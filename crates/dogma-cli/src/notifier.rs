// Notification sink for the command line

use dogma_console::{NotificationDispatcher, Severity};

/// Writes notifications to stderr
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl StderrNotifier {
    pub fn format(title: &str, message: &str, severity: Severity) -> String {
        format!("[{}] {}: {}", severity, title, message)
    }
}

impl NotificationDispatcher for StderrNotifier {
    fn dispatch(&self, title: &str, message: &str, severity: Severity) {
        eprintln!("{}", Self::format(title, message, severity));
    }
}
