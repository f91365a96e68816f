use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::{R3Error, R3Result, ResultExt};

use super::FilePath;
use super::traits::{DirectoryListing, Pal};

/// Concrete PAL implementation using the real filesystem via std::fs.
///
/// All file paths are resolved relative to the search root it was created with.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal rooted at `base_dir`.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> R3Result<bool> {
        let resolved = self.resolve_path(path);
        // symlink_metadata so that a dangling symlink still counts as taken
        match fs::symlink_metadata(&resolved) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                debug!(error = %e, "failed to stat entry");
                Err(Box::new(R3Error::file_error(resolved, e)))
            }
        }
    }

    #[instrument(skip(self), fields(path = %path))]
    fn is_directory(&self, path: &FilePath) -> R3Result<bool> {
        let resolved = self.resolve_path(path);
        let is_dir = resolved.is_dir();
        debug!(is_dir, resolved = %resolved.display(), "checked directory");
        Ok(is_dir)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_directory(&self, path: &FilePath) -> R3Result<DirectoryListing<'_>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "listing directory");
        let entries = fs::read_dir(&resolved).map_err(|e| {
            debug!(error = %e, "failed to list directory");
            Box::new(R3Error::file_error(resolved.clone(), e))
        })?;

        let parent = path.clone();
        let iter = entries.map(move |entry| {
            let entry = entry.map_err(|e| Box::new(R3Error::file_error(resolved.clone(), e)))?;
            Ok(parent.join(entry.file_name()))
        });
        Ok(Box::new(iter))
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    fn rename(&self, from: &FilePath, to: &FilePath) -> R3Result<()> {
        let from_resolved = self.resolve_path(from);
        let to_resolved = self.resolve_path(to);
        fs::rename(&from_resolved, &to_resolved)
            .map_err(|e| {
                debug!(error = %e, "rename failed");
                Box::new(R3Error::file_error(from_resolved.clone(), e))
            })
            .with_context(|| {
                format!(
                    "failed to rename {} to {}",
                    from_resolved.display(),
                    to_resolved.display()
                )
            })?;
        debug!("renamed");
        Ok(())
    }

    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        path.to_path(&self.base_dir)
    }
}
