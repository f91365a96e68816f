/* 📖 # Why plan everything before renaming anything?

Renaming a directory changes the path of everything below it. The planner therefore only
records (original, target) pairs while the whole tree is walked under its original names.
Nothing is reordered here: entries stay in discovery order, and the executor applies them
in reverse, so every descendant is renamed before its ancestor.
*/

use std::ffi::{OsStr, OsString};
use std::path::MAIN_SEPARATOR;

use tracing::{debug, instrument};

use r3_base::FilePath;

use crate::pattern::RenamePattern;
use crate::traverser::{SearchFailure, Traverser};

/// One planned rename. Only the base name differs between `original` and `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    original: FilePath,
    target: FilePath,
}

impl RenameEntry {
    pub fn new(original: FilePath, target: FilePath) -> Self {
        Self { original, target }
    }

    pub fn original(&self) -> &FilePath {
        &self.original
    }

    pub fn target(&self) -> &FilePath {
        &self.target
    }
}

/// Snapshot handed to the progress observer before each traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanProgress {
    /// Entries waiting in the traversal worklist.
    pub pending: usize,
    /// Entries matched so far.
    pub matched: usize,
}

/// A matched entry whose replacement is not usable as a base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTarget {
    pub path: FilePath,
    pub replaced_name: OsString,
}

/// Result of planning: matched renames in discovery order plus the soft failures.
#[derive(Debug, Default)]
pub struct PlanResult {
    pub entries: Vec<RenameEntry>,
    pub search_failures: Vec<SearchFailure>,
    pub rejected: Vec<RejectedTarget>,
}

impl PlanResult {
    pub fn matched(&self) -> usize {
        self.entries.len()
    }

    pub fn failed_searches(&self) -> usize {
        self.search_failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they must be applied: reverse discovery order.
    pub fn execution_order(&self) -> impl Iterator<Item = &RenameEntry> {
        self.entries.iter().rev()
    }
}

/// A replacement would move the entry out of its directory if it is empty, a dot entry,
/// or contains a separator.
fn is_valid_file_name(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    !bytes.is_empty()
        && bytes != b"."
        && bytes != b".."
        && !bytes.contains(&b'/')
        && !(MAIN_SEPARATOR.is_ascii() && bytes.contains(&(MAIN_SEPARATOR as u8)))
}

/// Walk the tree with `traverser` and record a rename for every entry whose base name
/// matches `pattern`.
///
/// `observer` is called before each traversal step, which is how the front end prints
/// verbose progress.
///
/// # Examples
/// ```
/// use r3_base::{FilePath, MockPal, PalHandle};
/// use r3_engine::{RenamePattern, SearchMode, Traverser, plan_renames};
///
/// let mock = MockPal::new();
/// mock.add_file("foo1");
/// mock.add_file("bar/foo3");
///
/// let traverser = Traverser::new(PalHandle::new(mock), FilePath::root(), SearchMode::BreadthFirst);
/// let pattern = RenamePattern::compile(r"foo(\d)", "baz$1").unwrap();
/// let plan = plan_renames(traverser, &pattern, |_| {});
///
/// assert_eq!(plan.matched(), 2);
/// assert_eq!(plan.entries[1].target(), &FilePath::from("bar/baz3"));
/// ```
#[instrument(skip_all, fields(find = pattern.find(), mode = %traverser.mode()))]
pub fn plan_renames(
    mut traverser: Traverser,
    pattern: &RenamePattern,
    mut observer: impl FnMut(PlanProgress),
) -> PlanResult {
    let mut entries = Vec::new();
    let mut rejected = Vec::new();

    while traverser.pending() > 0 {
        observer(PlanProgress {
            pending: traverser.pending(),
            matched: entries.len(),
        });
        let Some(path) = traverser.next() else {
            break;
        };

        // The root has no base name and is never renamed.
        let Some(name) = path.file_name() else {
            continue;
        };
        let Some(new_name) = pattern.rename(name) else {
            continue;
        };
        if !is_valid_file_name(&new_name) {
            debug!(path = %path, replaced_name = ?new_name, "replacement is not a valid file name");
            rejected.push(RejectedTarget {
                path,
                replaced_name: new_name,
            });
            continue;
        }

        let target = path.with_file_name(&new_name);
        debug!(original = %path, target = %target, "matched");
        entries.push(RenameEntry::new(path, target));
    }

    let search_failures = traverser.into_failures();
    debug!(
        matched = entries.len(),
        rejected = rejected.len(),
        failed_searches = search_failures.len(),
        "planning complete"
    );

    PlanResult {
        entries,
        search_failures,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traverser::SearchMode;
    use expect_test::{Expect, expect};
    use r3_base::{MockPal, PalHandle};

    fn sample_tree() -> MockPal {
        let mock = MockPal::new();
        mock.add_file("foo1");
        mock.add_file("foo2");
        mock.add_file("bar/foo3");
        mock
    }

    fn plan(mock: &MockPal, mode: SearchMode, find: &str, replace: &str) -> PlanResult {
        let traverser = Traverser::new(PalHandle::new(mock.clone()), FilePath::root(), mode);
        let pattern = RenamePattern::compile(find, replace).unwrap();
        plan_renames(traverser, &pattern, |_| {})
    }

    fn check_plan(plan: &PlanResult, expected: Expect) {
        let listing: String = plan
            .entries
            .iter()
            .map(|entry| format!("{} -> {}\n", entry.original(), entry.target()))
            .collect();
        expected.assert_eq(&listing);
    }

    #[test]
    fn test_plan_discovery_order_breadth_first() {
        let plan = plan(&sample_tree(), SearchMode::BreadthFirst, r"foo(\d)", "baz$1");

        check_plan(
            &plan,
            expect![[r#"
                foo1 -> baz1
                foo2 -> baz2
                bar/foo3 -> bar/baz3
            "#]],
        );
        assert_eq!(plan.matched(), 3);
        assert_eq!(plan.failed_searches(), 0);
    }

    #[test]
    fn test_plan_discovery_order_depth_first() {
        let plan = plan(&sample_tree(), SearchMode::DepthFirst, r"foo(\d)", "baz$1");

        check_plan(
            &plan,
            expect![[r#"
                foo2 -> baz2
                foo1 -> baz1
                bar/foo3 -> bar/baz3
            "#]],
        );
    }

    #[test]
    fn test_execution_order_is_reverse_discovery() {
        let mock = MockPal::new();
        mock.add_file("d/f");
        let plan = plan(&mock, SearchMode::BreadthFirst, "^(d|f)$", "$&2");

        let order: Vec<String> = plan
            .execution_order()
            .map(|entry| entry.original().to_string())
            .collect();
        assert_eq!(order, vec!["d/f", "d"]);
        assert_eq!(plan.entries[0].target(), &FilePath::from("d2"));
        assert_eq!(plan.entries[1].target(), &FilePath::from("d/f2"));
    }

    #[test]
    fn test_matching_is_base_name_scoped() {
        let mock = MockPal::new();
        mock.add_file("a/bb/c");
        let plan = plan(&mock, SearchMode::DepthFirst, "b", "x");

        check_plan(
            &plan,
            expect![[r#"
                a/bb -> a/xx
            "#]],
        );
    }

    #[test]
    fn test_root_is_never_planned() {
        let mock = MockPal::new();
        mock.add_file("x");
        // Matches every name, including the empty one.
        let plan = plan(&mock, SearchMode::BreadthFirst, ".*", "y");

        assert_eq!(plan.matched(), 1);
        assert_eq!(plan.entries[0].original(), &FilePath::from("x"));
    }

    #[test]
    fn test_no_match_gives_empty_plan() {
        let plan = plan(&sample_tree(), SearchMode::DepthFirst, "nothing-here", "x");

        assert!(plan.is_empty());
        assert_eq!(plan.matched(), 0);
        assert!(plan.rejected.is_empty());
    }

    #[test]
    fn test_invalid_targets_are_rejected() {
        let mock = MockPal::new();
        mock.add_file("gone");
        mock.add_file("split_me");
        mock.add_file("keep");
        let plan_empty = plan(&mock, SearchMode::BreadthFirst, "^gone$", "");
        let plan_slash = plan(&mock, SearchMode::BreadthFirst, "_", "/");
        let plan_dots = plan(&mock, SearchMode::BreadthFirst, "^keep$", "..");

        assert!(plan_empty.is_empty());
        assert_eq!(
            plan_empty.rejected,
            vec![RejectedTarget {
                path: FilePath::from("gone"),
                replaced_name: OsString::new(),
            }]
        );
        assert!(plan_slash.is_empty());
        assert_eq!(plan_slash.rejected[0].replaced_name, "split/me");
        assert!(plan_dots.is_empty());
        assert_eq!(plan_dots.rejected.len(), 1);
    }

    #[test]
    fn test_search_failures_are_carried_into_plan() {
        let mock = sample_tree();
        mock.add_file("locked/foo9");
        mock.make_unreadable("locked");
        let plan = plan(&mock, SearchMode::BreadthFirst, r"foo(\d)", "baz$1");

        assert_eq!(plan.matched(), 3);
        assert_eq!(plan.failed_searches(), 1);
        assert_eq!(plan.search_failures[0].path, FilePath::from("locked"));
    }

    #[test]
    fn test_observer_sees_each_step() {
        let traverser = Traverser::new(
            PalHandle::new(sample_tree()),
            FilePath::root(),
            SearchMode::BreadthFirst,
        );
        let pattern = RenamePattern::compile(r"foo(\d)", "baz$1").unwrap();
        let mut steps = Vec::new();
        plan_renames(traverser, &pattern, |progress| steps.push(progress));

        let rendered: Vec<String> = steps
            .iter()
            .map(|p| format!("{}/{}", p.pending, p.matched))
            .collect();
        // BFS: "", bar, foo1, foo2, bar/foo3
        assert_eq!(rendered, vec!["1/0", "3/0", "3/0", "2/1", "1/2"]);
    }
}
