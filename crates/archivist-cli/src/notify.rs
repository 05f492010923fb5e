//! Terminal delivery of pass notifications.

use crate::output::Formatter;
use archivist_engine::{Notification, Notifier};

/// Prints each notification to stdout in the selected output format.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    formatter: Formatter,
}

impl TerminalNotifier {
    /// Create a notifier printing through `formatter`.
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::debug!("Notification: {}", notification.body);
        if let Some(line) = self.formatter.format_notification(notification) {
            println!("{}", line);
        }
    }
}
