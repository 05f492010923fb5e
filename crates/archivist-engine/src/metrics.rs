//! Metrics collection for scheduled archiving

use archivist_domain::ArchiveReport;
use std::time::Duration;

/// Cumulative metrics across the passes run by one worker
///
/// Kept on the scheduling side only. The engine itself never reads them, so
/// no pass depends on what an earlier pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveMetrics {
    /// Passes that completed (dry runs included)
    pub pass_count: usize,

    /// Passes aborted by a pass-level error
    pub failed_passes: usize,

    /// Periodic runs skipped because a run constraint was not met
    pub skipped_runs: usize,

    /// Files moved into the archive
    pub files_moved: usize,

    /// Eligible files that could not be moved
    pub files_failed: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl ArchiveMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed pass
    pub fn record_pass(&mut self, report: &ArchiveReport, elapsed: Duration) {
        self.pass_count += 1;
        self.files_moved += report.moved_count();
        self.files_failed += report.failed_count();
        self.add_runtime(elapsed);
    }

    /// Record a pass that aborted
    pub fn record_failure(&mut self, elapsed: Duration) {
        self.failed_passes += 1;
        self.add_runtime(elapsed);
    }

    /// Record a periodic run skipped by a constraint
    pub fn record_skip(&mut self) {
        self.skipped_runs += 1;
    }

    fn add_runtime(&mut self, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.total_runtime_ms = self.total_runtime_ms.saturating_add(ms);
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Archive Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Passes: {}", self.pass_count),
            format!("Failed passes: {}", self.failed_passes),
            format!("Skipped runs: {}", self.skipped_runs),
            format!("Files moved: {}", self.files_moved),
            format!("Files failed: {}", self.files_failed),
            format!("Total runtime: {}ms", self.total_runtime_ms),
        ]
        .join("\n")
    }
}
