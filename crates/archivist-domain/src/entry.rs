//! File entry module - a listed child of a directory

/// Content type used when the host cannot tell what a file contains
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Name given to an archived copy when the source has no readable name
pub const DEFAULT_FILE_NAME: &str = "file";

/// A child of a directory as reported by a [`DirectoryHandle`](crate::DirectoryHandle)
///
/// Names are not guaranteed unique across time: a file may be deleted and a
/// new one created under the same name between two passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Entry name, if the host can provide one
    pub name: Option<String>,

    /// MIME type, if known
    pub content_type: Option<String>,

    /// Last modification time (milliseconds since Unix epoch)
    pub last_modified: i64,

    /// Whether this entry is a directory
    pub is_directory: bool,
}

impl FileEntry {
    /// Create a plain file entry
    ///
    /// # Examples
    ///
    /// ```
    /// use archivist_domain::FileEntry;
    ///
    /// let entry = FileEntry::file("notes.txt", 1_000);
    /// assert!(entry.is_file());
    /// assert_eq!(entry.display_name(), "notes.txt");
    /// ```
    pub fn file(name: impl Into<String>, last_modified: i64) -> Self {
        Self {
            name: Some(name.into()),
            content_type: None,
            last_modified,
            is_directory: false,
        }
    }

    /// Create a directory entry
    pub fn directory(name: impl Into<String>, last_modified: i64) -> Self {
        Self {
            name: Some(name.into()),
            content_type: None,
            last_modified,
            is_directory: true,
        }
    }

    /// Attach a content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Whether this entry is a plain file
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }

    /// Entry name, or [`DEFAULT_FILE_NAME`] when the host gave none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }

    /// Content type, or [`DEFAULT_CONTENT_TYPE`] when unknown
    pub fn mime_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_metadata() {
        let entry = FileEntry {
            name: None,
            content_type: None,
            last_modified: 0,
            is_directory: false,
        };
        assert_eq!(entry.display_name(), "file");
        assert_eq!(entry.mime_type(), "application/octet-stream");
    }

    #[test]
    fn test_directory_is_not_file() {
        let entry = FileEntry::directory("Archive", 0);
        assert!(!entry.is_file());
        assert!(entry.is_directory);
    }

    #[test]
    fn test_content_type_is_kept() {
        let entry = FileEntry::file("photo.jpg", 5).with_content_type("image/jpeg");
        assert_eq!(entry.mime_type(), "image/jpeg");
    }
}
