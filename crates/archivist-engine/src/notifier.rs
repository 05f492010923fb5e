//! Surfacing pass results to the user

use archivist_domain::ArchiveReport;

/// Title shown on every archiving notification
pub const NOTIFICATION_TITLE: &str = "Automatic archiving";

/// A user-facing message about one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Fixed title
    pub title: String,

    /// Result line, e.g. "3 files archived"
    pub body: String,
}

impl Notification {
    /// Build the notification for a report
    ///
    /// # Examples
    ///
    /// ```
    /// use archivist_domain::ArchiveReport;
    /// use archivist_engine::Notification;
    ///
    /// let mut report = ArchiveReport::default();
    /// report.record_moved("a.txt", "a.txt");
    ///
    /// let notification = Notification::for_report(&report);
    /// assert_eq!(notification.title, "Automatic archiving");
    /// assert_eq!(notification.body, "1 files archived");
    /// ```
    pub fn for_report(report: &ArchiveReport) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: report.summary(),
        }
    }

    /// Whether `report` deserves a notification
    pub fn is_due(report: &ArchiveReport, notify_when_empty: bool) -> bool {
        notify_when_empty || report.is_noteworthy()
    }
}

/// Receiver of pass results
pub trait Notifier: Send + Sync {
    /// Deliver a notification
    fn notify(&self, notification: &Notification);
}

/// Notifier that writes to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!("{}: {}", notification.title, notification.body);
    }
}
