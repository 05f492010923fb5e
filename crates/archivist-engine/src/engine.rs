//! Core archiving pass

use crate::{ArchiveConfig, ArchiveError, ArchiveMover};
use archivist_domain::{is_old, ArchiveReport, DirectoryHandle, FileEntry};
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since Unix epoch
pub(crate) fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Archiving engine: one linear pass over a root directory
///
/// A pass resolves (or creates) the archive subdirectory, lists the root's
/// immediate children once, and moves every plain file older than the
/// configured threshold. Subdirectories, the archive directory included, are
/// never entered. The engine keeps no state between passes.
///
/// # Examples
///
/// ```
/// use archivist_engine::{ArchiveConfig, Archiver};
/// use archivist_store::MemoryDirectory;
///
/// let root = MemoryDirectory::new();
/// root.add_file("old.log", "...", 0);
///
/// let archiver = Archiver::new(ArchiveConfig::default());
/// let report = archiver.run(&root).unwrap();
///
/// assert_eq!(report.moved_count(), 1);
/// assert!(root.subdirectory("Archive").unwrap().contains("old.log"));
/// ```
#[derive(Debug, Clone)]
pub struct Archiver {
    config: ArchiveConfig,
    mover: ArchiveMover,
}

impl Archiver {
    /// Create an Archiver with the given configuration
    pub fn new(config: ArchiveConfig) -> Self {
        let mover = ArchiveMover::new(config.remove_partial_copies);
        Self { config, mover }
    }

    /// Create an Archiver with default configuration
    pub fn default_config() -> Self {
        Self::new(ArchiveConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Run one pass using the system clock
    pub fn run<D>(&self, root: &D) -> Result<ArchiveReport, ArchiveError>
    where
        D: DirectoryHandle,
        D::Error: Display,
    {
        self.run_at(root, current_timestamp_millis())
    }

    /// Run one pass as if the current time were `now` (milliseconds since epoch)
    ///
    /// Fails without touching any file if the archive directory cannot be
    /// resolved or created, or if the root cannot be listed. Individual move
    /// failures are recorded in the report and do not stop the pass.
    pub fn run_at<D>(&self, root: &D, now: i64) -> Result<ArchiveReport, ArchiveError>
    where
        D: DirectoryHandle,
        D::Error: Display,
    {
        if self.config.dry_run {
            return self.plan(root, now);
        }

        let archive = self.resolve_archive_dir(root)?;
        let (examined, eligible) = self.scan(root, now)?;

        let mut report = ArchiveReport::new(false);
        report.examined = examined;

        for entry in &eligible {
            match self.mover.move_entry(root, entry, &archive) {
                Ok(moved) => {
                    tracing::debug!("Archived {} as {}", moved.source_name, moved.archived_name);
                    report.moved.push(moved);
                }
                Err(e) => {
                    tracing::warn!("Failed to archive {}: {}", entry.display_name(), e);
                    report.record_failed(entry.display_name(), e.to_string());
                }
            }
        }

        tracing::info!(
            "Archive pass completed: {} moved, {} failed, {} examined",
            report.moved_count(),
            report.failed_count(),
            report.examined
        );

        Ok(report)
    }

    /// Dry run: report what a pass would move, changing nothing
    fn plan<D>(&self, root: &D, now: i64) -> Result<ArchiveReport, ArchiveError>
    where
        D: DirectoryHandle,
        D::Error: Display,
    {
        let name = self.config.archive_dir_name.as_str();
        match root.find(name) {
            Ok(Some(entry)) if entry.is_file() => {
                return Err(ArchiveError::ArchiveDirectory(format!(
                    "'{}' exists and is not a directory",
                    name
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(ArchiveError::Resolution(e.to_string())),
        }

        let (examined, eligible) = self.scan(root, now)?;
        let mut report = ArchiveReport::new(true);
        report.examined = examined;
        for entry in &eligible {
            report.record_pending(entry.display_name());
        }

        tracing::info!(
            "DRY RUN: Would archive {} of {} entries",
            report.pending.len(),
            report.examined
        );

        Ok(report)
    }

    /// List the root once and keep the plain files past the threshold
    fn scan<D>(&self, root: &D, now: i64) -> Result<(usize, Vec<FileEntry>), ArchiveError>
    where
        D: DirectoryHandle,
        D::Error: Display,
    {
        let archive_name = self.config.archive_dir_name.as_str();
        let entries: Vec<FileEntry> = root
            .list()
            .map_err(|e| ArchiveError::Resolution(e.to_string()))?
            .into_iter()
            .filter(|entry| entry.name.as_deref() != Some(archive_name))
            .collect();
        let threshold = self.config.threshold();
        let examined = entries.len();

        let eligible = entries
            .into_iter()
            .filter(|entry| {
                if entry.is_directory {
                    tracing::trace!("Skipping directory {}", entry.display_name());
                    return false;
                }
                is_old(now, entry.last_modified, threshold)
            })
            .collect();

        Ok((examined, eligible))
    }

    /// Find the archive subdirectory, creating it when absent
    fn resolve_archive_dir<D>(&self, root: &D) -> Result<D, ArchiveError>
    where
        D: DirectoryHandle,
        D::Error: Display,
    {
        let name = self.config.archive_dir_name.as_str();

        match root.find(name) {
            Ok(Some(entry)) if entry.is_directory => root
                .open_directory(name)
                .map_err(|e| ArchiveError::ArchiveDirectory(e.to_string())),
            Ok(Some(_)) => Err(ArchiveError::ArchiveDirectory(format!(
                "'{}' exists and is not a directory",
                name
            ))),
            Ok(None) => {
                tracing::info!("Creating archive directory '{}'", name);
                root.create_directory(name)
                    .map_err(|e| ArchiveError::ArchiveDirectory(e.to_string()))
            }
            Err(e) => Err(ArchiveError::Resolution(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_store::MemoryDirectory;

    const NOW: i64 = 10_000_000_000;
    const DAY: i64 = 86_400_000;

    fn archiver() -> Archiver {
        Archiver::default_config()
    }

    #[test]
    fn test_moves_only_old_files() {
        let root = MemoryDirectory::new();
        root.add_file("old-1.txt", "1", NOW - 40 * DAY);
        root.add_file("old-2.txt", "2", NOW - 31 * DAY);
        root.add_file("old-3.txt", "3", NOW - 365 * DAY);
        root.add_file("new.txt", "n", NOW - DAY);

        let report = archiver().run_at(&root, NOW).unwrap();

        assert_eq!(report.moved_count(), 3);
        assert_eq!(report.failed_count(), 0);
        assert_eq!(report.examined, 4);
        assert_eq!(root.file_names(), vec!["new.txt"]);

        let archive = root.subdirectory("Archive").unwrap();
        assert_eq!(archive.file_names(), vec!["old-1.txt", "old-2.txt", "old-3.txt"]);
        assert_eq!(archive.read_file("old-2.txt").unwrap(), b"2");
    }

    #[test]
    fn test_threshold_boundary() {
        let root = MemoryDirectory::new();
        root.add_file("exact.txt", "", NOW - 30 * DAY);
        root.add_file("past.txt", "", NOW - 30 * DAY - 1);

        let report = archiver().run_at(&root, NOW).unwrap();

        assert_eq!(report.moved_count(), 1);
        assert_eq!(report.moved[0].source_name, "past.txt");
        assert!(root.contains("exact.txt"));
    }

    #[test]
    fn test_creates_archive_when_nothing_eligible() {
        let root = MemoryDirectory::new();
        root.add_file("fresh.txt", "", NOW);

        let report = archiver().run_at(&root, NOW).unwrap();

        assert_eq!(report.moved_count(), 0);
        assert!(root.subdirectory("Archive").is_some());
        assert!(root.contains("fresh.txt"));
    }

    #[test]
    fn test_directories_are_skipped() {
        let root = MemoryDirectory::new();
        let nested = root.add_directory("photos");
        nested.add_file("deep.jpg", "jpg", 0);

        let report = archiver().run_at(&root, NOW).unwrap();

        assert_eq!(report.moved_count(), 0);
        assert!(nested.contains("deep.jpg"));
    }

    #[test]
    fn test_archive_name_taken_by_file_fails_pass() {
        let root = MemoryDirectory::new();
        root.add_file("Archive", "not a dir", 0);
        root.add_file("old.txt", "", 0);

        let err = archiver().run_at(&root, NOW).unwrap_err();

        assert!(matches!(err, ArchiveError::ArchiveDirectory(_)));
        assert!(root.contains("old.txt"));
    }

    #[test]
    fn test_unavailable_root_fails_pass() {
        let root = MemoryDirectory::new();
        root.set_unavailable(true);

        let err = archiver().run_at(&root, NOW).unwrap_err();
        assert!(matches!(err, ArchiveError::Resolution(_)));
    }

    #[test]
    fn test_per_file_failures_are_reported() {
        let root = MemoryDirectory::new();
        root.add_file("bad.txt", "b", 0);
        root.add_file("good.txt", "g", 0);
        root.fail_reads_of("bad.txt");

        let report = archiver().run_at(&root, NOW).unwrap();

        assert_eq!(report.moved_count(), 1);
        assert_eq!(report.failed_names(), vec!["bad.txt"]);
        assert!(report.failed[0].reason.contains("cannot open source"));
        assert!(root.contains("bad.txt"));
        assert_eq!(root.subdirectory("Archive").unwrap().file_names(), vec!["good.txt"]);
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let root = MemoryDirectory::new();
        root.add_file("old.txt", "o", 0);
        root.add_file("new.txt", "n", NOW);

        let archiver = Archiver::new(ArchiveConfig {
            dry_run: true,
            ..Default::default()
        });
        let report = archiver.run_at(&root, NOW).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.pending, vec!["old.txt".to_string()]);
        assert_eq!(report.moved_count(), 0);
        assert!(root.contains("old.txt"));
        assert!(!root.contains("Archive"));
    }

    #[test]
    fn test_custom_archive_dir_name() {
        let root = MemoryDirectory::new();
        root.add_file("old.txt", "o", 0);

        let archiver = Archiver::new(ArchiveConfig {
            archive_dir_name: "Old Stuff".to_string(),
            ..Default::default()
        });
        archiver.run_at(&root, NOW).unwrap();

        assert!(root.subdirectory("Old Stuff").unwrap().contains("old.txt"));
    }
}
