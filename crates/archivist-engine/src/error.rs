//! Error types for archival passes

use thiserror::Error;

/// Errors that abort a whole archival pass
///
/// Per-file failures never surface here; they are recorded in the
/// [`ArchiveReport`](archivist_domain::ArchiveReport) and the pass continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// Root directory handle could not be resolved
    #[error("Root directory unavailable: {0}")]
    RootUnavailable(String),

    /// Root directory could not be read
    #[error("Failed to read root directory: {0}")]
    Resolution(String),

    /// Archive subdirectory could not be found or created
    #[error("Archive directory unavailable: {0}")]
    ArchiveDirectory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
