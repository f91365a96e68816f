use std::path::PathBuf;
use std::sync::Arc;

use crate::R3Result;

use super::file_path::FilePath;

/// Immediate children of a directory.
///
/// The outer `R3Result` of [`Pal::read_directory`] fails when the directory itself cannot
/// be listed; an item fails when a single entry cannot be read.
pub type DirectoryListing<'a> = Box<dyn Iterator<Item = R3Result<FilePath>> + 'a>;

/* 📖 # Why is Pal a trait instead of a struct?

The rename engine only needs five filesystem operations. Putting them behind a trait lets the
traversal order, the conflict check and the reverse execution order be tested against MockPal,
an in-memory tree where unreadable directories and failing renames can be injected.
*/

/// Platform Abstraction Layer (PAL) trait providing the filesystem operations r3 needs.
///
/// All paths are relative to the base directory the implementation was created with.
/// Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs`
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if any entry (file, directory or symlink) exists at the given path.
    fn file_exists(&self, path: &FilePath) -> R3Result<bool>;

    /// Check if the path denotes a directory. Symbolic links are followed.
    fn is_directory(&self, path: &FilePath) -> R3Result<bool>;

    /// List the immediate children of a directory, in platform listing order.
    fn read_directory(&self, path: &FilePath) -> R3Result<DirectoryListing<'_>>;

    /// Rename `from` to `to`.
    fn rename(&self, from: &FilePath, to: &FilePath) -> R3Result<()>;

    /// The location `path` refers to, for display.
    fn resolve_path(&self, path: &FilePath) -> PathBuf;
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use r3_base::{RealPal, PalHandle};
///
/// let pal = PalHandle::new(RealPal::new("/tmp/t".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
