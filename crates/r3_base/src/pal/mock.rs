use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{R3Error, R3Result};

use super::FilePath;
use super::traits::{DirectoryListing, Pal};

/* 📖 # Why a BTreeMap for the MockPal tree?

Real directory listing order depends on the filesystem. MockPal keeps entries sorted so that a
listing always returns siblings in name order, which makes discovery order in engine tests
reproducible.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

#[derive(Debug)]
struct MockTree {
    entries: BTreeMap<FilePath, EntryKind>,
    unreadable: HashSet<FilePath>,
    broken_listings: HashSet<FilePath>,
    failing_renames: HashSet<FilePath>,
    renames: Vec<(FilePath, FilePath)>,
}

/// In-memory PAL implementation for testing.
///
/// The root always exists as a directory. Adding an entry also adds its missing ancestors.
///
/// # Examples
///
/// ```
/// use r3_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file("bar/foo3");
/// assert!(mock.is_directory(&FilePath::from("bar")).unwrap());
/// assert!(mock.file_exists(&FilePath::from("bar/foo3")).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    tree: Arc<Mutex<MockTree>>,
}

impl MockPal {
    /// Create a MockPal containing only the root directory.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(FilePath::root(), EntryKind::Directory);
        Self {
            tree: Arc::new(Mutex::new(MockTree {
                entries,
                unreadable: HashSet::new(),
                broken_listings: HashSet::new(),
                failing_renames: HashSet::new(),
                renames: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTree> {
        self.tree.lock().unwrap()
    }

    /// Add a file, creating missing parent directories.
    pub fn add_file(&self, path: impl Into<FilePath>) {
        self.insert(path.into(), EntryKind::File);
    }

    /// Add a directory, creating missing parent directories.
    pub fn add_directory(&self, path: impl Into<FilePath>) {
        self.insert(path.into(), EntryKind::Directory);
    }

    /// Make listing this directory fail with a permission error.
    pub fn make_unreadable(&self, path: impl Into<FilePath>) {
        self.lock().unreadable.insert(path.into());
    }

    /// Make every entry of this directory's listing fail, while the listing itself opens.
    pub fn break_listing(&self, path: impl Into<FilePath>) {
        self.lock().broken_listings.insert(path.into());
    }

    /// Make renaming this entry fail with a permission error.
    pub fn fail_rename(&self, path: impl Into<FilePath>) {
        self.lock().failing_renames.insert(path.into());
    }

    /// All entries below the root, in sorted order.
    pub fn paths(&self) -> Vec<FilePath> {
        self.lock()
            .entries
            .keys()
            .filter(|path| !path.is_root())
            .cloned()
            .collect()
    }

    /// Successful renames, in the order they happened.
    pub fn rename_log(&self) -> Vec<(FilePath, FilePath)> {
        self.lock().renames.clone()
    }

    fn insert(&self, path: FilePath, kind: EntryKind) {
        let mut tree = self.lock();
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            ancestor = dir.parent();
            tree.entries.entry(dir).or_insert(EntryKind::Directory);
        }
        tree.entries.insert(path, kind);
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

fn mock_error(path: &FilePath, kind: io::ErrorKind, message: &str) -> Box<R3Error> {
    Box::new(R3Error::file_error(
        path.as_path().to_path_buf(),
        io::Error::new(kind, message.to_string()),
    ))
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> R3Result<bool> {
        Ok(self.lock().entries.contains_key(path))
    }

    fn is_directory(&self, path: &FilePath) -> R3Result<bool> {
        Ok(self.lock().entries.get(path) == Some(&EntryKind::Directory))
    }

    fn read_directory(&self, path: &FilePath) -> R3Result<DirectoryListing<'_>> {
        let tree = self.lock();
        if tree.unreadable.contains(path) {
            return Err(mock_error(path, io::ErrorKind::PermissionDenied, "permission denied"));
        }
        match tree.entries.get(path) {
            Some(EntryKind::Directory) => {}
            Some(EntryKind::File) => {
                return Err(mock_error(path, io::ErrorKind::NotADirectory, "not a directory"));
            }
            None => {
                return Err(mock_error(path, io::ErrorKind::NotFound, "no such directory"));
            }
        }
        let children: Vec<FilePath> = tree
            .entries
            .keys()
            .filter(|entry| entry.parent().as_ref() == Some(path))
            .cloned()
            .collect();
        if tree.broken_listings.contains(path) {
            let path = path.clone();
            return Ok(Box::new(children.into_iter().map(move |_| {
                Err(mock_error(&path, io::ErrorKind::InvalidData, "unreadable entry"))
            })));
        }
        Ok(Box::new(children.into_iter().map(Ok)))
    }

    fn rename(&self, from: &FilePath, to: &FilePath) -> R3Result<()> {
        let mut tree = self.lock();
        if from.is_root() || !tree.entries.contains_key(from) {
            return Err(mock_error(from, io::ErrorKind::NotFound, "no such entry"));
        }
        if tree.failing_renames.contains(from) {
            return Err(mock_error(from, io::ErrorKind::PermissionDenied, "permission denied"));
        }
        if tree.entries.contains_key(to) {
            return Err(mock_error(to, io::ErrorKind::AlreadyExists, "entry exists"));
        }
        let target_parent = to.parent().unwrap_or_else(FilePath::root);
        if tree.entries.get(&target_parent) != Some(&EntryKind::Directory) {
            return Err(mock_error(to, io::ErrorKind::NotFound, "no such directory"));
        }

        // Move the entry together with everything below it.
        let moved: Vec<(FilePath, EntryKind)> = tree
            .entries
            .iter()
            .filter(|(path, _)| path.starts_with(from))
            .map(|(path, kind)| (path.clone(), *kind))
            .collect();
        for (path, kind) in moved {
            tree.entries.remove(&path);
            let relocated = path.rebase(from, to).unwrap_or_else(|| to.clone());
            tree.entries.insert(relocated, kind);
        }
        tree.renames.push((from.clone(), to.clone()));
        Ok(())
    }

    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        path.as_path().to_path_buf()
    }
}
