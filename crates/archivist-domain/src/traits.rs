//! Trait definitions for filesystem interactions
//!
//! These traits define the boundary between the archiving logic and whatever
//! storage framework hosts the files. Implementations live in other crates.

use crate::FileEntry;
use std::io::{Read, Write};

/// Capability-bearing handle onto one directory
///
/// The caller holds a handle it is authorized to read and write for the
/// duration of one pass. Children are addressed by name relative to the
/// handle. Methods take `&self`: handles are references into host storage,
/// not owners of it.
///
/// Implemented by the infrastructure layer (archivist-store)
pub trait DirectoryHandle: Sized {
    /// Error type for storage operations
    type Error;

    /// Readable stream over a file's bytes
    type Reader: Read;

    /// Writable stream into a file
    type Writer: Write;

    /// List the immediate children of this directory
    fn list(&self) -> Result<Vec<FileEntry>, Self::Error>;

    /// Find a child by exact name
    fn find(&self, name: &str) -> Result<Option<FileEntry>, Self::Error>;

    /// Open an existing child directory
    fn open_directory(&self, name: &str) -> Result<Self, Self::Error>;

    /// Create a child directory
    fn create_directory(&self, name: &str) -> Result<Self, Self::Error>;

    /// Create an empty file
    ///
    /// Never overwrites: if `name` is taken a unique variant is chosen and
    /// the returned entry carries the name actually used.
    fn create_file(&self, name: &str, content_type: &str) -> Result<FileEntry, Self::Error>;

    /// Delete a child file
    fn delete(&self, name: &str) -> Result<(), Self::Error>;

    /// Open a child file for reading
    fn open_read(&self, name: &str) -> Result<Self::Reader, Self::Error>;

    /// Open a child file for writing, truncating it
    fn open_write(&self, name: &str) -> Result<Self::Writer, Self::Error>;
}
