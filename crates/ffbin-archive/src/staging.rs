use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{ExtractError, Result};

/// Scratch directory for one extraction.
///
/// It lives inside the target directory so that committing is a same-volume
/// rename. Dropping it without committing leaves the target untouched.
pub(crate) struct Staging {
    dir: TempDir,
    target: PathBuf,
    files: Vec<(PathBuf, OsString)>,
}

impl Staging {
    pub(crate) fn new(target: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(".ffbin-extract-")
            .tempdir_in(target)
            .map_err(|e| ExtractError::ExtractionFailed {
                path: target.to_path_buf(),
                source: e,
            })?;
        Ok(Self {
            dir,
            target: target.to_path_buf(),
            files: Vec::new(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Mark `staged` to be moved to `<target>/<name>` on commit. A later
    /// entry with the same name replaces an earlier one.
    pub(crate) fn stage(&mut self, staged: PathBuf, name: OsString) {
        self.files.retain(|(_, existing)| existing != &name);
        self.files.push((staged, name));
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &OsString> {
        self.files.iter().map(|(_, name)| name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Move every staged file into the target, replacing what is there.
    pub(crate) fn commit(self) -> Result<Vec<PathBuf>> {
        let mut placed = Vec::with_capacity(self.files.len());
        for (staged, name) in &self.files {
            let destination = self.target.join(name);
            std::fs::rename(staged, &destination).map_err(|e| ExtractError::ExtractionFailed {
                path: destination.clone(),
                source: e,
            })?;
            placed.push(destination);
        }
        Ok(placed)
    }
}
