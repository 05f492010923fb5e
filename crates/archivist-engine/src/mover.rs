//! Copy-then-delete relocation of a single file

use archivist_domain::{DirectoryHandle, FileEntry, MovedFile};
use std::fmt::Display;
use std::io::{self, Write};
use thiserror::Error;

/// Why a single file could not be moved
///
/// The source is never deleted when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The destination entry could not be created
    #[error("cannot create destination: {0}")]
    CreateDestination(String),

    /// The source could not be opened for reading
    #[error("cannot open source: {0}")]
    OpenSource(String),

    /// The destination could not be opened for writing
    #[error("cannot open destination: {0}")]
    OpenDestination(String),

    /// Copying the bytes failed part way
    #[error("copy failed: {0}")]
    Copy(String),

    /// The copy succeeded but the source could not be removed
    #[error("cannot delete source: {0}")]
    DeleteSource(String),
}

/// Moves files between directories by copying then deleting
///
/// Storage frameworks behind a [`DirectoryHandle`] do not promise an atomic
/// cross-directory rename, so a move is three steps: create the destination,
/// copy the bytes, delete the source. The source is deleted only after a full
/// copy.
#[derive(Debug, Clone)]
pub struct ArchiveMover {
    remove_partial_copies: bool,
}

impl Default for ArchiveMover {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ArchiveMover {
    /// Create a mover
    ///
    /// With `remove_partial_copies` set, a destination entry left behind by a
    /// failed copy is deleted again.
    pub fn new(remove_partial_copies: bool) -> Self {
        Self {
            remove_partial_copies,
        }
    }

    /// Move `entry` from `source_dir` into `destination`
    pub fn move_entry<D>(
        &self,
        source_dir: &D,
        entry: &FileEntry,
        destination: &D,
    ) -> Result<MovedFile, MoveError>
    where
        D: DirectoryHandle,
        D::Error: Display,
    {
        let created = destination
            .create_file(entry.display_name(), entry.mime_type())
            .map_err(|e| MoveError::CreateDestination(e.to_string()))?;
        let archived_name = created.display_name().to_string();

        match self.copy_contents(source_dir, entry, destination, &archived_name) {
            Ok(bytes) => {
                tracing::debug!("Copied {} bytes into {}", bytes, archived_name);
            }
            Err(err) => {
                if self.remove_partial_copies {
                    discard(destination, &archived_name);
                } else {
                    tracing::warn!("Leaving incomplete copy {} in archive", archived_name);
                }
                return Err(err);
            }
        }

        let source_name = entry.display_name();
        if let Err(e) = source_dir.delete(source_name) {
            // A complete duplicate would be archived again on the next pass
            discard(destination, &archived_name);
            return Err(MoveError::DeleteSource(e.to_string()));
        }

        Ok(MovedFile {
            source_name: source_name.to_string(),
            archived_name,
        })
    }

    fn copy_contents<D>(
        &self,
        source_dir: &D,
        entry: &FileEntry,
        destination: &D,
        archived_name: &str,
    ) -> Result<u64, MoveError>
    where
        D: DirectoryHandle,
        D::Error: Display,
    {
        let source_name = entry
            .name
            .as_deref()
            .ok_or_else(|| MoveError::OpenSource("entry has no name".to_string()))?;

        let mut reader = source_dir
            .open_read(source_name)
            .map_err(|e| MoveError::OpenSource(e.to_string()))?;
        let mut writer = destination
            .open_write(archived_name)
            .map_err(|e| MoveError::OpenDestination(e.to_string()))?;

        let bytes = io::copy(&mut reader, &mut writer).map_err(|e| MoveError::Copy(e.to_string()))?;
        writer.flush().map_err(|e| MoveError::Copy(e.to_string()))?;
        Ok(bytes)
    }
}

fn discard<D>(destination: &D, name: &str)
where
    D: DirectoryHandle,
    D::Error: Display,
{
    if let Err(e) = destination.delete(name) {
        tracing::warn!("Could not remove incomplete copy {}: {}", name, e);
    }
}
