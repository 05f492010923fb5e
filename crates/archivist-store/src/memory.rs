//! In-memory backend with fault injection

use crate::{now_millis, validate_name, Result, StoreError};
use archivist_domain::{unique_name, DirectoryHandle, FileEntry};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared in-memory directory tree
///
/// Clones are handles onto the same directory, so a test can keep one clone
/// for inspection while the engine works through another. Faults can be
/// injected per directory to exercise every failure path of a pass.
///
/// # Examples
///
/// ```
/// use archivist_domain::DirectoryHandle;
/// use archivist_store::MemoryDirectory;
///
/// let root = MemoryDirectory::new();
/// root.add_file("old.txt", "hello", 1_000);
/// root.add_directory("Archive");
///
/// assert_eq!(root.list().unwrap().len(), 2);
/// assert_eq!(root.file_names(), vec!["old.txt"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    node: Arc<Mutex<DirNode>>,
}

#[derive(Debug, Default)]
struct DirNode {
    children: BTreeMap<String, Node>,
    modified: i64,
    faults: Faults,
}

#[derive(Debug, Clone)]
enum Node {
    File(Arc<Mutex<FileNode>>),
    Directory(MemoryDirectory),
}

#[derive(Debug)]
struct FileNode {
    data: Vec<u8>,
    content_type: Option<String>,
    modified: i64,
}

#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    deny_create_directory: bool,
    deny_create_file: bool,
    fail_writes: bool,
    fail_reads: BTreeSet<String>,
    deny_delete: BTreeSet<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Node {
    fn entry(&self, name: &str) -> FileEntry {
        match self {
            Node::File(file) => {
                let file = lock(file);
                FileEntry {
                    name: Some(name.to_string()),
                    content_type: file.content_type.clone(),
                    last_modified: file.modified,
                    is_directory: false,
                }
            }
            Node::Directory(dir) => FileEntry::directory(name, lock(&dir.node).modified),
        }
    }
}

impl MemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        let dir = Self::default();
        lock(&dir.node).modified = now_millis();
        dir
    }

    /// Add (or replace) a file with the given contents and modification time
    pub fn add_file(&self, name: &str, contents: impl Into<Vec<u8>>, modified: i64) -> &Self {
        let file = FileNode {
            data: contents.into(),
            content_type: None,
            modified,
        };
        lock(&self.node)
            .children
            .insert(name.to_string(), Node::File(Arc::new(Mutex::new(file))));
        self
    }

    /// Add a child directory and return a handle onto it
    pub fn add_directory(&self, name: &str) -> MemoryDirectory {
        let child = MemoryDirectory::new();
        lock(&self.node)
            .children
            .insert(name.to_string(), Node::Directory(child.clone()));
        child
    }

    /// Names of the plain files in this directory, sorted
    pub fn file_names(&self) -> Vec<String> {
        lock(&self.node)
            .children
            .iter()
            .filter(|(_, node)| matches!(node, Node::File(_)))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Whether a child with this name exists
    pub fn contains(&self, name: &str) -> bool {
        lock(&self.node).children.contains_key(name)
    }

    /// Contents of a child file
    pub fn read_file(&self, name: &str) -> Option<Vec<u8>> {
        match lock(&self.node).children.get(name)? {
            Node::File(file) => Some(lock(file).data.clone()),
            Node::Directory(_) => None,
        }
    }

    /// Handle onto a child directory
    pub fn subdirectory(&self, name: &str) -> Option<MemoryDirectory> {
        match lock(&self.node).children.get(name)? {
            Node::Directory(dir) => Some(dir.clone()),
            Node::File(_) => None,
        }
    }

    /// Make every operation on this directory fail, as if access was revoked
    pub fn set_unavailable(&self, unavailable: bool) {
        lock(&self.node).faults.unavailable = unavailable;
    }

    /// Refuse creation of child directories
    pub fn deny_create_directory(&self) {
        lock(&self.node).faults.deny_create_directory = true;
    }

    /// Refuse creation of child files
    pub fn deny_create_file(&self) {
        lock(&self.node).faults.deny_create_file = true;
    }

    /// Make writes into any file of this directory fail
    pub fn fail_writes(&self) {
        lock(&self.node).faults.fail_writes = true;
    }

    /// Make opening `name` for reading fail
    pub fn fail_reads_of(&self, name: &str) {
        lock(&self.node).faults.fail_reads.insert(name.to_string());
    }

    /// Refuse deletion of `name`
    pub fn deny_delete_of(&self, name: &str) {
        lock(&self.node).faults.deny_delete.insert(name.to_string());
    }

    /// Lock the node, failing if the directory was made unavailable
    fn guard(&self) -> Result<MutexGuard<'_, DirNode>> {
        let node = lock(&self.node);
        if node.faults.unavailable {
            return Err(StoreError::Unavailable("directory is unavailable".to_string()));
        }
        Ok(node)
    }

    fn file_node(&self, name: &str) -> Result<Arc<Mutex<FileNode>>> {
        validate_name(name)?;
        match self.guard()?.children.get(name) {
            Some(Node::File(file)) => Ok(Arc::clone(file)),
            Some(Node::Directory(_)) => Err(StoreError::IsADirectory(name.to_string())),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }
}

/// Writer appending into an in-memory file
#[derive(Debug)]
pub struct MemoryWriter {
    file: Arc<Mutex<FileNode>>,
    fail: bool,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::other("injected write failure"));
        }
        let mut file = lock(&self.file);
        file.data.extend_from_slice(buf);
        file.modified = now_millis();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl DirectoryHandle for MemoryDirectory {
    type Error = StoreError;
    type Reader = Cursor<Vec<u8>>;
    type Writer = MemoryWriter;

    fn list(&self) -> Result<Vec<FileEntry>> {
        let node = self.guard()?;
        Ok(node
            .children
            .iter()
            .map(|(name, child)| child.entry(name))
            .collect())
    }

    fn find(&self, name: &str) -> Result<Option<FileEntry>> {
        validate_name(name)?;
        Ok(self.guard()?.children.get(name).map(|child| child.entry(name)))
    }

    fn open_directory(&self, name: &str) -> Result<Self> {
        validate_name(name)?;
        match self.guard()?.children.get(name) {
            Some(Node::Directory(dir)) => Ok(dir.clone()),
            Some(Node::File(_)) => Err(StoreError::NotADirectory(name.to_string())),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    fn create_directory(&self, name: &str) -> Result<Self> {
        validate_name(name)?;
        let mut node = self.guard()?;
        if node.faults.deny_create_directory {
            return Err(StoreError::Denied(format!("cannot create directory {}", name)));
        }
        if node.children.contains_key(name) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", name),
            )));
        }

        let child = MemoryDirectory::new();
        node.children.insert(name.to_string(), Node::Directory(child.clone()));
        Ok(child)
    }

    fn create_file(&self, name: &str, content_type: &str) -> Result<FileEntry> {
        validate_name(name)?;
        let mut node = self.guard()?;
        if node.faults.deny_create_file {
            return Err(StoreError::Denied(format!("cannot create file {}", name)));
        }

        let chosen = unique_name(name, |candidate| node.children.contains_key(candidate));
        let file = FileNode {
            data: Vec::new(),
            content_type: Some(content_type.to_string()),
            modified: now_millis(),
        };
        let child = Node::File(Arc::new(Mutex::new(file)));
        let entry = child.entry(&chosen);
        node.children.insert(chosen, child);
        Ok(entry)
    }

    fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let mut node = self.guard()?;
        if node.faults.deny_delete.contains(name) {
            return Err(StoreError::Denied(format!("cannot delete {}", name)));
        }
        match node.children.get(name) {
            Some(Node::File(_)) => {
                node.children.remove(name);
                Ok(())
            }
            Some(Node::Directory(_)) => Err(StoreError::IsADirectory(name.to_string())),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    fn open_read(&self, name: &str) -> Result<Cursor<Vec<u8>>> {
        if self.guard()?.faults.fail_reads.contains(name) {
            return Err(StoreError::Denied(format!("cannot read {}", name)));
        }
        let file = self.file_node(name)?;
        let data = lock(&file).data.clone();
        Ok(Cursor::new(data))
    }

    fn open_write(&self, name: &str) -> Result<MemoryWriter> {
        let fail = self.guard()?.faults.fail_writes;
        let file = self.file_node(name)?;
        lock(&file).data.clear();
        Ok(MemoryWriter { file, fail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_clones_share_state() {
        let root = MemoryDirectory::new();
        let other = root.clone();
        other.add_file("a.txt", "a", 1);
        assert!(root.contains("a.txt"));
    }

    #[test]
    fn test_list_reports_kinds_and_times() {
        let root = MemoryDirectory::new();
        root.add_file("a.txt", "a", 42);
        root.add_directory("Archive");

        let entries = root.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_directory);
        assert_eq!(entries[0].display_name(), "Archive");
        assert_eq!(entries[1].last_modified, 42);
    }

    #[test]
    fn test_create_file_picks_unique_name() {
        let root = MemoryDirectory::new();
        root.add_file("a.txt", "first", 1);

        let created = root.create_file("a.txt", "text/plain").unwrap();
        assert_eq!(created.display_name(), "a (1).txt");
        assert_eq!(created.mime_type(), "text/plain");
        assert_eq!(root.read_file("a.txt").unwrap(), b"first");
    }

    #[test]
    fn test_write_then_read() {
        let root = MemoryDirectory::new();
        root.create_file("b.bin", "application/octet-stream").unwrap();
        root.open_write("b.bin").unwrap().write_all(b"bytes").unwrap();

        let mut out = Vec::new();
        root.open_read("b.bin").unwrap().read_to_end(&mut out).unwrap();
        assert_eq!(out, b"bytes");
    }

    #[test]
    fn test_injected_faults() {
        let root = MemoryDirectory::new();
        root.add_file("a.txt", "a", 1);
        root.deny_create_directory();
        root.deny_create_file();
        root.fail_reads_of("a.txt");
        root.deny_delete_of("a.txt");

        assert!(matches!(root.create_directory("Archive"), Err(StoreError::Denied(_))));
        assert!(matches!(root.create_file("x", "text/plain"), Err(StoreError::Denied(_))));
        assert!(matches!(root.open_read("a.txt"), Err(StoreError::Denied(_))));
        assert!(matches!(root.delete("a.txt"), Err(StoreError::Denied(_))));
    }

    #[test]
    fn test_failing_writer() {
        let root = MemoryDirectory::new();
        root.add_file("a.txt", "", 1);
        root.fail_writes();
        assert!(root.open_write("a.txt").unwrap().write_all(b"x").is_err());
    }

    #[test]
    fn test_unavailable_directory() {
        let root = MemoryDirectory::new();
        root.set_unavailable(true);
        assert!(matches!(root.list(), Err(StoreError::Unavailable(_))));
        root.set_unavailable(false);
        assert!(root.list().is_ok());
    }

    #[test]
    fn test_delete_kinds() {
        let root = MemoryDirectory::new();
        root.add_directory("dir");
        assert!(matches!(root.delete("dir"), Err(StoreError::IsADirectory(_))));
        assert!(matches!(root.delete("nope"), Err(StoreError::NotFound(_))));
    }
}
