use tracing::{debug, instrument, warn};

use r3_base::{PalHandle, R3Error, ResultExt};

use crate::planner::{PlanResult, RenameEntry};

/// Why a single planned rename was skipped.
#[derive(Debug)]
pub enum RenameFailure {
    /// Something already exists at the target path.
    TargetExists { entry: RenameEntry },
    /// The existence check or the rename itself failed.
    Io {
        entry: RenameEntry,
        error: Box<R3Error>,
    },
}

impl RenameFailure {
    pub fn entry(&self) -> &RenameEntry {
        match self {
            RenameFailure::TargetExists { entry } | RenameFailure::Io { entry, .. } => entry,
        }
    }
}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Entries renamed, in the order they were applied.
    pub renamed: Vec<RenameEntry>,
    /// Entries whose replacement equals the original name.
    pub unchanged: usize,
    pub failures: Vec<RenameFailure>,
}

/// Apply `plan` in reverse discovery order.
///
/// Each rename is attempted on its own: a failure is recorded and the rest of the batch
/// still runs. The target is checked right before renaming, since earlier renames in the
/// same batch or other processes may have created it after planning.
#[instrument(skip_all, fields(entries = plan.matched()))]
pub fn execute_renames(pal: &PalHandle, plan: &PlanResult) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    for entry in plan.execution_order() {
        if entry.original() == entry.target() {
            debug!(path = %entry.original(), "name unchanged");
            report.unchanged += 1;
            continue;
        }

        let target_exists = pal
            .file_exists(entry.target())
            .with_context(|| format!("cannot check whether {} exists", entry.target()));
        match target_exists {
            Ok(false) => {}
            Ok(true) => {
                debug!(original = %entry.original(), target = %entry.target(), "target exists");
                report.failures.push(RenameFailure::TargetExists {
                    entry: entry.clone(),
                });
                continue;
            }
            Err(error) => {
                warn!(target = %entry.target(), error = %error, "could not check target");
                report.failures.push(RenameFailure::Io {
                    entry: entry.clone(),
                    error,
                });
                continue;
            }
        }

        match pal.rename(entry.original(), entry.target()) {
            Ok(()) => report.renamed.push(entry.clone()),
            Err(error) => {
                debug!(original = %entry.original(), error = %error, "rename failed");
                report.failures.push(RenameFailure::Io {
                    entry: entry.clone(),
                    error,
                });
            }
        }
    }

    debug!(
        renamed = report.renamed.len(),
        unchanged = report.unchanged,
        failed = report.failures.len(),
        "execution complete"
    );
    report
}
