use std::path::PathBuf;

use clap::Parser;

use r3_engine::{RenameConfig, SearchMode};

/// Rename files and directories whose names match a regular expression.
///
/// Every entry below DIR whose base name contains a match for PATTERN is renamed by
/// replacing the matches with TEMPLATE. Renames are applied deepest entries first.
#[derive(Debug, Parser)]
#[command(name = "r3", version)]
pub struct Cli {
    /// Root search directory (never renamed itself)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: PathBuf,

    /// Regular expression searched for in each base name
    #[arg(short = 'f', long, value_name = "PATTERN", allow_hyphen_values = true)]
    pub find: String,

    /// Replacement for each match; `$1`..`$99` insert capture groups, `$&` the whole match
    #[arg(short = 'r', long, value_name = "TEMPLATE", allow_hyphen_values = true)]
    pub replace: String,

    /// Traversal order: bfs (breadth-first) or dfs (depth-first)
    #[arg(long, value_name = "MODE", default_value = "dfs")]
    pub search_mode: SearchMode,

    /// Only report what would be renamed
    #[arg(short = 'y', long)]
    pub dry_run: bool,

    /// Print traversal progress and every planned rename
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> RenameConfig {
        RenameConfig {
            root: self.dir,
            find: self.find,
            replace: self.replace,
            search_mode: self.search_mode,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}
