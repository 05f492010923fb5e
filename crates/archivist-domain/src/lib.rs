//! Archivist Domain Layer
//!
//! This crate contains the core decision logic and data model for Archivist.
//! It has ZERO external dependencies and defines the value objects, the
//! age classifier and the directory capability trait that every other layer
//! depends upon.
//!
//! ## Key Concepts
//!
//! - **FileEntry**: A listed child of a directory (name, content type, mtime)
//! - **ArchiveThreshold**: How old a file must be before it is archived
//! - **Classifier**: Pure predicates deciding what is "old"
//! - **ArchiveReport**: Tally of one archival pass (moved, failed, pending)
//! - **DirectoryHandle**: Capability interface onto a host directory tree
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - No external crate dependencies
//! - Pure decision logic only
//! - Storage implementations live in `archivist-store`
//! - Trait definitions for all filesystem interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classifier;
pub mod entry;
pub mod naming;
pub mod report;
pub mod threshold;
pub mod traits;

// Re-exports for convenience
pub use classifier::{is_old, should_archive};
pub use entry::{FileEntry, DEFAULT_CONTENT_TYPE, DEFAULT_FILE_NAME};
pub use naming::unique_name;
pub use report::{ArchiveReport, FailedMove, MovedFile};
pub use threshold::ArchiveThreshold;
pub use traits::DirectoryHandle;

/// Name of the subdirectory receiving archived files
pub const ARCHIVE_DIR_NAME: &str = "Archive";
