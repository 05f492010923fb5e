//! Report module - the tally of one archival pass

use crate::should_archive;

/// A file that was moved into the archive directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    /// Name of the entry in the root directory
    pub source_name: String,

    /// Name of the copy in the archive directory (differs on collision)
    pub archived_name: String,
}

/// A file that was eligible but could not be moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedMove {
    /// Name of the entry in the root directory
    pub name: String,

    /// Human-readable failure reason
    pub reason: String,
}

/// Outcome of a single archival pass
///
/// Successful and failed moves are tracked separately so a failure never
/// hides behind the success count.
///
/// # Examples
///
/// ```
/// use archivist_domain::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.record_moved("a.txt", "a.txt");
/// report.record_failed("b.txt", "permission denied");
///
/// assert_eq!(report.moved_count(), 1);
/// assert_eq!(report.failed_count(), 1);
/// assert_eq!(report.failed_names(), vec!["b.txt"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Files moved into the archive
    pub moved: Vec<MovedFile>,

    /// Eligible files whose move failed
    pub failed: Vec<FailedMove>,

    /// Eligible files left in place because the pass was a dry run
    pub pending: Vec<String>,

    /// Number of root entries looked at
    pub examined: usize,

    /// Whether this pass was a dry run
    pub dry_run: bool,
}

impl ArchiveReport {
    /// Create an empty report
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Record a successful move
    pub fn record_moved(&mut self, source_name: impl Into<String>, archived_name: impl Into<String>) {
        self.moved.push(MovedFile {
            source_name: source_name.into(),
            archived_name: archived_name.into(),
        });
    }

    /// Record a failed move
    pub fn record_failed(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(FailedMove {
            name: name.into(),
            reason: reason.into(),
        });
    }

    /// Record a dry-run candidate
    pub fn record_pending(&mut self, name: impl Into<String>) {
        self.pending.push(name.into());
    }

    /// Number of files moved
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    /// Number of eligible files that could not be moved
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Names of the files that could not be moved
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.name.as_str()).collect()
    }

    /// Whether this report is worth surfacing to the user
    pub fn is_noteworthy(&self) -> bool {
        should_archive(self.moved_count()) || self.failed_count() > 0
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        if self.dry_run {
            return format!("{} files would be archived", self.pending.len());
        }
        if self.failed.is_empty() {
            format!("{} files archived", self.moved_count())
        } else {
            format!(
                "{} files archived, {} failed",
                self.moved_count(),
                self.failed_count()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = ArchiveReport::default();
        assert_eq!(report.moved_count(), 0);
        assert_eq!(report.failed_count(), 0);
        assert!(!report.is_noteworthy());
        assert_eq!(report.summary(), "0 files archived");
    }

    #[test]
    fn test_failures_are_noteworthy() {
        let mut report = ArchiveReport::default();
        report.record_failed("x.bin", "read error");
        assert!(report.is_noteworthy());
        assert_eq!(report.summary(), "0 files archived, 1 failed");
    }

    #[test]
    fn test_dry_run_summary() {
        let mut report = ArchiveReport::new(true);
        report.record_pending("a.txt");
        report.record_pending("b.txt");
        assert_eq!(report.summary(), "2 files would be archived");
        assert_eq!(report.moved_count(), 0);
    }
}
