//! Archivist Storage Layer
//!
//! Implements the [`DirectoryHandle`] trait for the places archived files
//! actually live.
//!
//! # Backends
//!
//! - [`LocalDirectory`]: the local filesystem through `std::fs`
//! - [`MemoryDirectory`]: a shared in-memory tree with fault injection, for
//!   tests and demos
//!
//! # Examples
//!
//! ```no_run
//! use archivist_domain::DirectoryHandle;
//! use archivist_store::LocalDirectory;
//!
//! let root = LocalDirectory::open("/home/me/Downloads").unwrap();
//! for entry in root.list().unwrap() {
//!     println!("{}", entry.display_name());
//! }
//! ```
//!
//! [`DirectoryHandle`]: archivist_domain::DirectoryHandle

#![warn(missing_docs)]

mod local;
mod memory;

pub use local::LocalDirectory;
pub use memory::{MemoryDirectory, MemoryWriter};

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Entry exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Entry exists but is a directory
    #[error("Is a directory: {0}")]
    IsADirectory(String),

    /// Entry name cannot address a direct child
    #[error("Invalid entry name: {0:?}")]
    InvalidName(String),

    /// Directory cannot be reached (revoked, unmounted, missing)
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// Operation refused by the host
    #[error("Permission denied: {0}")]
    Denied(String),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Reject names that would escape the directory or address nothing
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Milliseconds since the Unix epoch, negative before it
pub(crate) fn to_epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i64::MIN),
    }
}

/// Current time in milliseconds since the Unix epoch
pub(crate) fn now_millis() -> i64 {
    to_epoch_millis(SystemTime::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("notes.txt").is_ok());
        assert!(validate_name(".hidden").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
    }

    #[test]
    fn test_epoch_millis() {
        assert_eq!(to_epoch_millis(UNIX_EPOCH), 0);
        assert_eq!(to_epoch_millis(UNIX_EPOCH + Duration::from_millis(1500)), 1500);
        assert_eq!(to_epoch_millis(UNIX_EPOCH - Duration::from_millis(20)), -20);
    }
}
