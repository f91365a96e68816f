use std::path::PathBuf;

use tracing::{debug, instrument};

use r3_base::{FilePath, PalHandle, R3Result, RealPal, ResultExt, bail};

use crate::pattern::RenamePattern;
use crate::traverser::{SearchMode, Traverser};

/// Configuration for one rename run.
#[derive(Debug, Clone)]
pub struct RenameConfig {
    /// Root search directory.
    pub root: PathBuf,
    /// Regular expression searched for in each base name.
    pub find: String,
    /// Replacement template, may be empty.
    pub replace: String,
    /// Traversal discipline.
    pub search_mode: SearchMode,
    /// Report the plan without renaming anything.
    pub dry_run: bool,
    /// Print per-step progress and per-entry old/new paths.
    pub verbose: bool,
}

impl RenameConfig {
    /// A PAL on the real filesystem, rooted at the search directory.
    pub fn real_pal(&self) -> PalHandle {
        PalHandle::new(RealPal::new(self.root.clone()))
    }

    /// Check the configuration against `pal` and compile the pattern.
    ///
    /// Every error returned here is fatal and happens before any traversal.
    #[instrument(skip(self, pal), fields(root = %self.root.display()))]
    pub fn prepare(&self, pal: &PalHandle) -> R3Result<RenamePattern> {
        if !pal
            .is_directory(&FilePath::root())
            .context("cannot inspect <dir>")?
        {
            bail!("<dir> must be a directory!");
        }
        let pattern = RenamePattern::compile(&self.find, &self.replace)?;
        debug!(find = %self.find, replace = %self.replace, "configuration valid");
        Ok(pattern)
    }

    /// A traverser over the whole tree in the configured mode.
    pub fn traverser(&self, pal: &PalHandle) -> Traverser {
        Traverser::new(pal.clone(), FilePath::root(), self.search_mode)
    }
}
