//! Threshold module - how old a file must be to be archived

use std::fmt;
use std::time::Duration;

/// Minimum age a file must exceed before it is archived
///
/// Stored in milliseconds to match the resolution of [`FileEntry::last_modified`].
///
/// [`FileEntry::last_modified`]: crate::FileEntry::last_modified
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveThreshold(u64);

impl ArchiveThreshold {
    /// Thirty days, the intended production threshold
    pub const THIRTY_DAYS: Self = Self(30 * 24 * 60 * 60 * 1000);

    /// Create a threshold from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create a threshold from whole minutes
    ///
    /// # Examples
    ///
    /// ```
    /// use archivist_domain::ArchiveThreshold;
    ///
    /// assert_eq!(ArchiveThreshold::from_minutes(1).as_millis(), 60_000);
    /// ```
    pub const fn from_minutes(minutes: u64) -> Self {
        Self(minutes.saturating_mul(60_000))
    }

    /// Create a threshold from whole days
    pub const fn from_days(days: u64) -> Self {
        Self(days.saturating_mul(86_400_000))
    }

    /// Threshold in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Threshold as a [`Duration`]
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for ArchiveThreshold {
    fn default() -> Self {
        Self::THIRTY_DAYS
    }
}

impl From<Duration> for ArchiveThreshold {
    fn from(duration: Duration) -> Self {
        Self(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for ArchiveThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MINUTE: u64 = 60_000;
        const HOUR: u64 = 60 * MINUTE;
        const DAY: u64 = 24 * HOUR;

        match self.0 {
            ms if ms >= DAY && ms % DAY == 0 => write!(f, "{}d", ms / DAY),
            ms if ms >= HOUR && ms % HOUR == 0 => write!(f, "{}h", ms / HOUR),
            ms if ms >= MINUTE && ms % MINUTE == 0 => write!(f, "{}m", ms / MINUTE),
            ms => write!(f, "{}ms", ms),
        }
    }
}
