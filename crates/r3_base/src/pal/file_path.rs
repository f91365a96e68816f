use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/* 📖 # Why are FilePaths relative to the search root?

Every PAL is created for one search root, and every FilePath is relative to that root.
The root itself is the empty path, which has no base name. That keeps the root out of
the rename candidates no matter how the user spelled `--dir` (with or without a trailing
slash), and it means a rename can only ever replace the last component of a path below
the root.

Names are kept as the platform hands them out (`OsStr`), not as UTF-8. A directory whose
name is not valid Unicode is still an ordinary directory that has to be walked and may
have to be renamed.
*/

/// Type-safe wrapper for filesystem entries relative to the PAL base directory.
///
/// Equality and ordering are component-wise, so siblings sort together under their parent.
///
/// # Examples
///
/// ```
/// use std::ffi::OsStr;
/// use r3_base::FilePath;
///
/// let path = FilePath::from("bar/foo3");
/// assert_eq!(path.file_name(), Some(OsStr::new("foo3")));
/// assert_eq!(path.with_file_name("baz3"), FilePath::from("bar/baz3"));
/// assert_eq!(FilePath::root().file_name(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePath(PathBuf);

impl FilePath {
    /// The search root.
    pub fn root() -> Self {
        Self(PathBuf::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Base name of the entry, `None` for the root.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.0.file_name()
    }

    /// Parent entry, `None` for the root.
    pub fn parent(&self) -> Option<FilePath> {
        self.0.parent().map(|parent| Self(parent.to_path_buf()))
    }

    /// Path of the child `name` inside this entry.
    pub fn join(&self, name: impl AsRef<OsStr>) -> FilePath {
        Self(self.0.join(name.as_ref()))
    }

    /// Same parent, different base name.
    pub fn with_file_name(&self, name: impl AsRef<OsStr>) -> FilePath {
        Self(self.0.with_file_name(name))
    }

    /// Whether `ancestor` is this entry or one of its ancestors.
    pub fn starts_with(&self, ancestor: &FilePath) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// This path with the `ancestor` prefix replaced by `replacement`.
    pub fn rebase(&self, ancestor: &FilePath, replacement: &FilePath) -> Option<FilePath> {
        let rest = self.0.strip_prefix(&ancestor.0).ok()?;
        if rest.as_os_str().is_empty() {
            return Some(replacement.clone());
        }
        Some(replacement.join(rest))
    }

    /// Converts to a regular Path, relative to the PAL base directory.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolves this path against `base`.
    pub fn to_path(&self, base: &Path) -> PathBuf {
        if self.is_root() {
            return base.to_path_buf();
        }
        base.join(&self.0)
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(PathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(PathBuf::from(s))
    }
}

impl From<PathBuf> for FilePath {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
