/* 📖 # Why an explicit worklist instead of recursion?

The traversal order must be exactly front-pop (breadth-first) or back-pop (depth-first) over one
double-ended queue, and deep trees must not be limited by the call stack. Both disciplines
discover a directory before anything below it, which is what makes reverse discovery order a
safe rename order.

Unlistable directories are soft failures: they are recorded and the walk carries on with the
rest of the queue.
*/

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use r3_base::{FilePath, PalHandle, R3Error, R3Result};

/// Order in which the tree is walked. Never affects which entries match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    BreadthFirst,
    #[default]
    DepthFirst,
}

impl FromStr for SearchMode {
    type Err = Box<R3Error>;

    fn from_str(s: &str) -> R3Result<Self> {
        match s {
            "bfs" | "breadth-first" => Ok(SearchMode::BreadthFirst),
            "dfs" | "depth-first" => Ok(SearchMode::DepthFirst),
            other => Err(r3_base::err!(
                "invalid search mode '{}', expected 'bfs' or 'dfs'",
                other
            )),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::BreadthFirst => write!(f, "bfs"),
            SearchMode::DepthFirst => write!(f, "dfs"),
        }
    }
}

/// A directory (or one of its entries) that could not be searched.
#[derive(Debug)]
pub struct SearchFailure {
    /// The directory being listed when the error occurred.
    pub path: FilePath,
    pub error: Box<R3Error>,
}

/// Walks the tree below a root, yielding every entry once in discovery order.
///
/// The root is yielded first. Each yielded directory has already been listed and its
/// children queued, so nothing is lost if the caller renames entries after the walk.
///
/// # Examples
/// ```
/// use r3_base::{FilePath, MockPal, PalHandle};
/// use r3_engine::{SearchMode, Traverser};
///
/// let mock = MockPal::new();
/// mock.add_file("bar/foo3");
/// mock.add_file("foo1");
///
/// let pal = PalHandle::new(mock);
/// let order: Vec<FilePath> = Traverser::new(pal, FilePath::root(), SearchMode::BreadthFirst).collect();
/// assert_eq!(
///     order,
///     vec![FilePath::root(), FilePath::from("bar"), FilePath::from("foo1"), FilePath::from("bar/foo3")]
/// );
/// ```
#[derive(Debug)]
pub struct Traverser {
    pal: PalHandle,
    mode: SearchMode,
    queue: VecDeque<FilePath>,
    failures: Vec<SearchFailure>,
}

impl Traverser {
    /// Start a walk at `root`, which the caller has verified to be a directory.
    pub fn new(pal: PalHandle, root: FilePath, mode: SearchMode) -> Self {
        Self {
            pal,
            mode,
            queue: VecDeque::from([root]),
            failures: Vec::new(),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Number of entries waiting in the worklist.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn failures(&self) -> &[SearchFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<SearchFailure> {
        self.failures
    }

    fn enqueue_children(&mut self, path: &FilePath) {
        match self.pal.is_directory(path) {
            Ok(true) => {}
            Ok(false) => return,
            Err(error) => {
                record_failure(&mut self.failures, path, error);
                return;
            }
        }

        let listing = match self.pal.read_directory(path) {
            Ok(listing) => listing,
            Err(error) => {
                record_failure(&mut self.failures, path, error);
                return;
            }
        };
        // A directory counts as one failed search however many of its entries fail.
        let mut listing_failed = false;
        for child in listing {
            match child {
                Ok(child) => self.queue.push_back(child),
                Err(error) if listing_failed => {
                    debug!(path = %path, error = %error, "further entry failed");
                }
                Err(error) => {
                    listing_failed = true;
                    record_failure(&mut self.failures, path, error);
                }
            }
        }
        trace!(path = %path, pending = self.queue.len(), "queued children");
    }
}

fn record_failure(failures: &mut Vec<SearchFailure>, path: &FilePath, error: Box<R3Error>) {
    debug!(path = %path, error = %error, "failed to search");
    failures.push(SearchFailure {
        path: path.clone(),
        error,
    });
}

impl Iterator for Traverser {
    type Item = FilePath;

    fn next(&mut self) -> Option<FilePath> {
        let path = match self.mode {
            SearchMode::BreadthFirst => self.queue.pop_front(),
            SearchMode::DepthFirst => self.queue.pop_back(),
        }?;
        self.enqueue_children(&path);
        Some(path)
    }
}
