//! Configuration for archival passes
//!
//! Defines the age threshold, archive directory name and periodic schedule.

use crate::ArchiveError;
use archivist_domain::{ArchiveThreshold, ARCHIVE_DIR_NAME};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shortest interval a periodic registration may use
pub const MIN_SCHEDULE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Registration name of the automatic archiving job
pub const DEFAULT_SCHEDULE_NAME: &str = "AUTO_ARCHIVE";

/// Configuration for the archiving engine and its scheduler
///
/// # Examples
///
/// ```
/// use archivist_engine::ArchiveConfig;
///
/// // Default configuration: files older than 30 days, checked daily
/// let config = ArchiveConfig::default();
/// assert_eq!(config.age_threshold_minutes, 30 * 24 * 60);
///
/// // Quick: one-minute threshold, handy for trying the tool out
/// let config = ArchiveConfig::quick();
/// assert_eq!(config.age_threshold_minutes, 1);
///
/// // Lenient: only files untouched for 90 days
/// let config = ArchiveConfig::lenient();
/// assert_eq!(config.age_threshold_minutes, 90 * 24 * 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Name of the subdirectory receiving archived files
    /// Default: "Archive"
    pub archive_dir_name: String,

    /// Files untouched for longer than this are archived (in minutes)
    /// Default: 43200 (30 days)
    pub age_threshold_minutes: u64,

    /// How often the automatic job runs (in hours)
    /// Default: 24. Never shorter than 15 minutes.
    pub schedule_interval_hours: u64,

    /// Unique registration name of the automatic job
    /// Default: "AUTO_ARCHIVE"
    pub schedule_name: String,

    /// Skip automatic runs while the battery is low
    /// Default: true
    pub require_battery_not_low: bool,

    /// Battery level at or below which automatic runs are skipped
    /// Default: 15
    pub min_battery_percent: u8,

    /// Remove an incomplete copy from the archive when a move fails
    /// Default: true
    pub remove_partial_copies: bool,

    /// Notify even when nothing was archived
    /// Default: true
    pub notify_when_empty: bool,

    /// Dry-run mode: report eligible files without moving anything
    /// Default: false
    pub dry_run: bool,
}

impl Default for ArchiveConfig {
    /// Create default configuration
    ///
    /// - Threshold: 30 days
    /// - Schedule: every 24 hours as "AUTO_ARCHIVE", not on low battery
    /// - Partial copies removed, empty results still notified
    fn default() -> Self {
        Self {
            archive_dir_name: ARCHIVE_DIR_NAME.to_string(),
            age_threshold_minutes: 30 * 24 * 60,
            schedule_interval_hours: 24,
            schedule_name: DEFAULT_SCHEDULE_NAME.to_string(),
            require_battery_not_low: true,
            min_battery_percent: 15,
            remove_partial_copies: true,
            notify_when_empty: true,
            dry_run: false,
        }
    }
}

impl ArchiveConfig {
    /// Quick configuration (one-minute threshold)
    ///
    /// Makes freshly created test files eligible within a minute.
    pub fn quick() -> Self {
        Self {
            age_threshold_minutes: 1,
            ..Self::default()
        }
    }

    /// Lenient configuration (90-day threshold, weekly schedule)
    pub fn lenient() -> Self {
        Self {
            age_threshold_minutes: 90 * 24 * 60,
            schedule_interval_hours: 7 * 24,
            notify_when_empty: false,
            ..Self::default()
        }
    }

    /// Get the age threshold
    pub fn threshold(&self) -> ArchiveThreshold {
        ArchiveThreshold::from_minutes(self.age_threshold_minutes)
    }

    /// Get the schedule interval, clamped to [`MIN_SCHEDULE_INTERVAL`]
    pub fn schedule_interval(&self) -> Duration {
        let requested = Duration::from_secs(self.schedule_interval_hours.saturating_mul(3600));
        requested.max(MIN_SCHEDULE_INTERVAL)
    }

    /// Check that the configuration can drive a pass
    pub fn validate(&self) -> Result<(), ArchiveError> {
        let name = self.archive_dir_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ArchiveError::Config(format!(
                "archive_dir_name must be a single directory name, got {:?}",
                name
            )));
        }
        if self.schedule_name.trim().is_empty() {
            return Err(ArchiveError::Config("schedule_name must not be empty".to_string()));
        }
        if self.min_battery_percent > 100 {
            return Err(ArchiveError::Config(format!(
                "min_battery_percent must be at most 100, got {}",
                self.min_battery_percent
            )));
        }
        Ok(())
    }
}
