use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use ffbin_fetch::{HttpClient, SourceSelector};
use ffbin_platform::{SystemIdentity, Tool};

use crate::acquire::Acquirer;
use crate::error::AcquireError;
use crate::paths::{ToolPaths, resolve_existing_paths};

/// Remembers where the executables were last seen.
///
/// The first [`get`](Self::get) scans the directory. Later calls return the
/// snapshot until [`refresh`](Self::refresh) or
/// [`invalidate`](Self::invalidate) is called.
#[derive(Debug)]
pub struct ToolCache {
    dir: PathBuf,
    identity: SystemIdentity,
    paths: RwLock<Option<ToolPaths>>,
}

impl ToolCache {
    pub fn new(dir: impl Into<PathBuf>, identity: SystemIdentity) -> Self {
        Self {
            dir: dir.into(),
            identity,
            paths: RwLock::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn identity(&self) -> &SystemIdentity {
        &self.identity
    }

    pub fn get(&self) -> ToolPaths {
        if let Some(paths) = self.paths.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return paths.clone();
        }
        self.refresh()
    }

    pub fn path(&self, tool: Tool) -> Option<PathBuf> {
        self.get().get(tool).map(Path::to_path_buf)
    }

    /// Rescan the directory and replace the snapshot.
    pub fn refresh(&self) -> ToolPaths {
        let paths = resolve_existing_paths(&self.dir, &self.identity);
        *self.paths.write().unwrap_or_else(PoisonError::into_inner) = Some(paths.clone());
        paths
    }

    pub fn invalidate(&self) {
        *self.paths.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Acquire into this cache's directory and refresh the snapshot.
    pub async fn install<C: HttpClient, S: SourceSelector>(
        &self,
        acquirer: &Acquirer<C, S>,
        source_index: Option<usize>,
    ) -> Result<ToolPaths, AcquireError> {
        let result = acquirer.acquire(&self.identity, &self.dir, source_index).await;
        let paths = self.refresh();
        result.map(|_| paths)
    }
}
