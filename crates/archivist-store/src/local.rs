//! Local filesystem backend

use crate::{now_millis, to_epoch_millis, validate_name, Result, StoreError};
use archivist_domain::{unique_name, DirectoryHandle, FileEntry};
use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directory handle backed by `std::fs`
///
/// Symbolic links are not listed: archiving a link by copying its target
/// would change what the user sees, so links are left where they are.
/// `find` still reports them, as the directory they point to or otherwise as
/// a plain entry, so a linked name is never mistaken for a free one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDirectory {
    path: PathBuf,
}

impl LocalDirectory {
    /// Open an existing directory
    ///
    /// Fails with [`StoreError::Unavailable`] when the path cannot be read and
    /// [`StoreError::NotADirectory`] when it is something else.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;

        if !metadata.is_dir() {
            return Err(StoreError::NotADirectory(path.display().to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Resolve a root token: a plain path or a `file://` URI
    ///
    /// # Examples
    ///
    /// ```
    /// use archivist_store::LocalDirectory;
    ///
    /// let tmp = std::env::temp_dir();
    /// let token = format!("file://{}", tmp.display());
    /// let dir = LocalDirectory::from_token(&token).unwrap();
    /// assert_eq!(dir.path(), tmp.as_path());
    /// ```
    pub fn from_token(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        if path.is_empty() {
            return Err(StoreError::Unavailable("empty root token".to_string()));
        }
        Self::open(path)
    }

    /// Path of this directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn child(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.path.join(name))
    }

    /// Entry for `name`, or `None` for a file whose age cannot be read
    fn entry(name: &str, is_dir: bool, modified: io::Result<SystemTime>) -> Option<FileEntry> {
        let last_modified = match modified {
            Ok(time) => to_epoch_millis(time),
            Err(_) if is_dir => 0,
            Err(_) => return None,
        };

        if is_dir {
            return Some(FileEntry::directory(name, last_modified));
        }

        let entry = FileEntry::file(name, last_modified);
        Some(match guess_content_type(name) {
            Some(mime) => entry.with_content_type(mime),
            None => entry,
        })
    }

    /// Entry for `name`; a file of unknown age counts as just modified
    fn entry_or_fresh(name: &str, metadata: &Metadata) -> FileEntry {
        Self::entry(name, metadata.is_dir(), metadata.modified())
            .unwrap_or_else(|| FileEntry::file(name, now_millis()))
    }
}

impl DirectoryHandle for LocalDirectory {
    type Error = StoreError;
    type Reader = File;
    type Writer = File;

    fn list(&self) -> Result<Vec<FileEntry>> {
        let read_dir = fs::read_dir(&self.path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", self.path.display(), e)))?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item?;
            let Ok(name) = item.file_name().into_string() else {
                tracing::warn!("Skipping entry with non UTF-8 name in {}", self.path.display());
                continue;
            };

            let metadata = match fs::symlink_metadata(item.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    continue;
                }
            };
            if metadata.file_type().is_symlink() {
                tracing::debug!("Skipping symbolic link {}", name);
                continue;
            }

            match Self::entry(&name, metadata.is_dir(), metadata.modified()) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!("Skipping {}: modification time unavailable", name),
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn find(&self, name: &str) -> Result<Option<FileEntry>> {
        let path = self.child(name)?;
        match fs::symlink_metadata(&path) {
            Ok(link) if link.file_type().is_symlink() => match fs::metadata(&path) {
                Ok(target) if target.is_dir() => Ok(Some(Self::entry_or_fresh(name, &target))),
                _ => Ok(Some(Self::entry_or_fresh(name, &link))),
            },
            Ok(metadata) => Ok(Some(Self::entry_or_fresh(name, &metadata))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn open_directory(&self, name: &str) -> Result<Self> {
        let path = self.child(name)?;
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_dir() => Ok(Self { path }),
            Ok(_) => Err(StoreError::NotADirectory(path.display().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn create_directory(&self, name: &str) -> Result<Self> {
        let path = self.child(name)?;
        fs::create_dir(&path)?;
        Ok(Self { path })
    }

    fn create_file(&self, name: &str, content_type: &str) -> Result<FileEntry> {
        validate_name(name)?;
        let chosen = unique_name(name, |candidate| {
            fs::symlink_metadata(self.path.join(candidate)).is_ok()
        });

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path.join(&chosen))?;
        let metadata = file.metadata()?;

        Ok(Self::entry_or_fresh(&chosen, &metadata).with_content_type(content_type))
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.child(name)?;
        if fs::symlink_metadata(&path)?.is_dir() {
            return Err(StoreError::IsADirectory(path.display().to_string()));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    fn open_read(&self, name: &str) -> Result<File> {
        Ok(File::open(self.child(name)?)?)
    }

    fn open_write(&self, name: &str) -> Result<File> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.child(name)?)?;
        Ok(file)
    }
}

/// Best-effort MIME type from a file extension
fn guess_content_type(name: &str) -> Option<&'static str> {
    let (_, extension) = name.rsplit_once('.')?;
    let mime = match extension.to_ascii_lowercase().as_str() {
        "txt" | "log" | "md" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}
