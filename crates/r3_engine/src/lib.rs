pub mod config;
pub mod executor;
pub mod pattern;
pub mod planner;
pub mod traverser;

pub use config::RenameConfig;
pub use executor::{ExecutionReport, RenameFailure, execute_renames};
pub use pattern::RenamePattern;
pub use planner::{PlanProgress, PlanResult, RejectedTarget, RenameEntry, plan_renames};
pub use traverser::{SearchFailure, SearchMode, Traverser};
