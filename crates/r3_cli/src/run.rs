/* 📖 # How does a run proceed?

1. Validate the configuration and compile the pattern (fatal errors end the run here)
2. Walk the tree and plan, printing progress when verbose
3. Report the plan and the match / search failure counts
4. Stop for a dry run; otherwise ask for confirmation if there is anything to rename
5. Apply the plan in reverse discovery order and report the per-entry failures

Only step 1 and failures to write the report produce an `Err`. Everything that goes
wrong for a single entry is printed to the error stream and the run carries on.
*/

use std::io::{self, BufRead, Write};

use tracing::info;

use r3_base::{Pal, PalHandle, R3Error, R3Result};
use r3_engine::{
    PlanResult, RenameConfig, RenameEntry, RenameFailure, execute_renames, plan_renames,
};

use crate::prompt::confirm;

fn output_error(error: io::Error) -> Box<R3Error> {
    Box::new(R3Error::file_error("<output>", error).context("failed to write report"))
}

fn describe(pal: &dyn Pal, entry: &RenameEntry) -> String {
    format!(
        "{:?} {:?}",
        pal.resolve_path(entry.original()),
        pal.resolve_path(entry.target())
    )
}

/// Plan and, unless this is a dry run or the user declines, apply the renames.
pub fn run(
    config: &RenameConfig,
    pal: &PalHandle,
    input: &mut impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> R3Result<()> {
    let pattern = config.prepare(pal)?;

    let mut progress_result = Ok(());
    let plan = plan_renames(config.traverser(pal), &pattern, |progress| {
        if config.verbose && progress_result.is_ok() {
            progress_result = writeln!(
                out,
                "Searching {} inodes... Matched {}...",
                progress.pending, progress.matched
            );
        }
    });
    progress_result.map_err(output_error)?;
    report_plan(config, pal, &plan, out, err).map_err(output_error)?;
    info!(matched = plan.matched(), dry_run = config.dry_run, "plan ready");

    if config.dry_run || plan.is_empty() {
        return Ok(());
    }
    if !confirm(input, out).map_err(output_error)? {
        return Ok(());
    }

    let report = execute_renames(pal, &plan);
    for failure in &report.failures {
        match failure {
            RenameFailure::TargetExists { entry } => writeln!(
                err,
                "Cannot rename {}: target already exists",
                describe(&**pal, entry)
            ),
            RenameFailure::Io { entry, error } => {
                writeln!(err, "Cannot rename {}: {}", describe(&**pal, entry), error)
            }
        }
        .map_err(output_error)?;
    }
    writeln!(out, "Renamed {} inodes.", report.renamed.len()).map_err(output_error)?;
    Ok(())
}

fn report_plan(
    config: &RenameConfig,
    pal: &PalHandle,
    plan: &PlanResult,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    if config.verbose {
        for failure in &plan.search_failures {
            writeln!(
                err,
                "Failed to search {:?}: {}",
                pal.resolve_path(&failure.path),
                failure.error
            )?;
        }
    }
    for rejected in &plan.rejected {
        writeln!(
            err,
            "Skipping {:?}: {:?} is not a valid file name",
            pal.resolve_path(&rejected.path),
            rejected.replaced_name
        )?;
    }
    if config.verbose {
        for entry in plan.execution_order() {
            writeln!(out, "{}", describe(&**pal, entry))?;
        }
    }
    writeln!(out, "Matched {} inodes.", plan.matched())?;
    writeln!(out, "Failed to search {} inodes.", plan.failed_searches())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{Expect, expect};
    use r3_base::{FilePath, MockPal};
    use r3_engine::SearchMode;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn sample_tree() -> MockPal {
        let mock = MockPal::new();
        mock.add_file("foo1");
        mock.add_file("foo2");
        mock.add_file("bar/foo3");
        mock
    }

    fn config(find: &str, dry_run: bool, verbose: bool) -> RenameConfig {
        RenameConfig {
            root: PathBuf::from("/unused"),
            find: find.to_string(),
            replace: "baz$1".to_string(),
            search_mode: SearchMode::BreadthFirst,
            dry_run,
            verbose,
        }
    }

    struct Outcome {
        result: R3Result<()>,
        stdout: String,
        stderr: String,
    }

    fn run_with(mock: &MockPal, config: &RenameConfig, stdin: &str) -> Outcome {
        let pal = PalHandle::new(mock.clone());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = run(config, &pal, &mut Cursor::new(stdin), &mut out, &mut err);
        Outcome {
            result,
            stdout: String::from_utf8(out).unwrap(),
            stderr: String::from_utf8(err).unwrap(),
        }
    }

    fn check(actual: &str, expected: Expect) {
        expected.assert_eq(actual);
    }

    #[test]
    fn test_confirmed_run_renames_all_matches() {
        let mock = sample_tree();
        let outcome = run_with(&mock, &config(r"foo(\d)", false, false), "Y\n");

        assert!(outcome.result.is_ok());
        check(
            &outcome.stdout,
            expect![[r#"
                Matched 3 inodes.
                Failed to search 0 inodes.
                Dry run is not enabled. Are you sure you want to proceed?
                [Y/N] Renamed 3 inodes.
            "#]],
        );
        assert_eq!(outcome.stderr, "");
        assert_eq!(
            mock.paths(),
            vec![
                FilePath::from("bar"),
                FilePath::from("bar/baz3"),
                FilePath::from("baz1"),
                FilePath::from("baz2"),
            ]
        );
    }

    #[test]
    fn test_verbose_dry_run_reports_without_renaming() {
        let mock = sample_tree();
        let outcome = run_with(&mock, &config(r"foo(\d)", true, true), "");

        assert!(outcome.result.is_ok());
        check(
            &outcome.stdout,
            expect![[r#"
                Searching 1 inodes... Matched 0...
                Searching 3 inodes... Matched 0...
                Searching 3 inodes... Matched 0...
                Searching 2 inodes... Matched 1...
                Searching 1 inodes... Matched 2...
                "bar/foo3" "bar/baz3"
                "foo2" "baz2"
                "foo1" "baz1"
                Matched 3 inodes.
                Failed to search 0 inodes.
            "#]],
        );
        assert!(mock.rename_log().is_empty());
    }

    #[test]
    fn test_declined_run_renames_nothing() {
        let mock = sample_tree();
        let outcome = run_with(&mock, &config(r"foo(\d)", false, false), "N\n");

        assert!(outcome.result.is_ok());
        assert!(!outcome.stdout.contains("Renamed"));
        assert!(mock.rename_log().is_empty());
    }

    #[test]
    fn test_empty_plan_skips_prompt() {
        let mock = sample_tree();
        let outcome = run_with(&mock, &config("nothing", false, false), "");

        assert!(outcome.result.is_ok());
        check(
            &outcome.stdout,
            expect![[r#"
                Matched 0 inodes.
                Failed to search 0 inodes.
            "#]],
        );
    }

    #[test]
    fn test_failures_go_to_stderr_and_run_continues() {
        let mock = sample_tree();
        mock.add_file("baz1");
        mock.add_file("locked/foo9");
        mock.make_unreadable("locked");
        mock.fail_rename("bar/foo3");

        let outcome = run_with(&mock, &config(r"foo(\d)", false, true), "Y\n");

        assert!(outcome.result.is_ok());
        assert!(outcome.stdout.contains("Failed to search 1 inodes."));
        assert!(outcome.stdout.ends_with("Renamed 1 inodes.\n"));
        check(
            &outcome.stderr,
            expect![[r#"
                Failed to search "locked": locked: permission denied
                Cannot rename "bar/foo3" "bar/baz3": bar/foo3: permission denied
                Cannot rename "foo1" "baz1": target already exists
            "#]],
        );
        assert_eq!(
            mock.rename_log(),
            vec![(FilePath::from("foo2"), FilePath::from("baz2"))]
        );
    }

    #[test]
    fn test_rejected_targets_are_reported() {
        let mock = MockPal::new();
        mock.add_file("a_b");
        let mut config = config("_", true, false);
        config.replace = "/".to_string();

        let outcome = run_with(&mock, &config, "");

        assert!(outcome.result.is_ok());
        check(
            &outcome.stderr,
            expect![[r#"
                Skipping "a_b": "a/b" is not a valid file name
            "#]],
        );
        assert!(outcome.stdout.contains("Matched 0 inodes."));
    }

    #[test]
    fn test_configuration_error_stops_before_traversal() {
        let mock = sample_tree();
        let outcome = run_with(&mock, &config("", false, true), "Y\n");

        let error = outcome.result.unwrap_err();
        assert_eq!(error.to_string(), "<find> must not be empty!");
        assert_eq!(outcome.stdout, "");
        assert!(mock.rename_log().is_empty());
    }
}
