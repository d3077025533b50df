use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ffbin_archive::{Layout, extract};
use ffbin_fetch::{DownloadOptions, HttpClient, Source, SourceList, SourceSelector, download_archive};
use ffbin_platform::{SystemIdentity, Tool};
use tracing::{debug, info, warn};

use crate::error::{AcquireError, AttemptError, FailedAttempt};
use crate::paths::{ToolPaths, resolve_existing_paths_async};
use crate::perm::make_executable;
use crate::plan::{SourceChoice, plan_candidates};

/// Milestones of an acquisition, for front ends that want to narrate it.
#[derive(Debug, Clone)]
pub enum AcquireEvent<'a> {
    Attempting { source: &'a Source, attempt: usize, of: usize },
    /// The archive arrived in full; extraction comes next.
    Downloaded { source: &'a Source, bytes: u64, elapsed: Duration },
    AttemptFailed { source: &'a Source, error: &'a AttemptError },
    Installed { source: &'a Source },
}

/// Knobs for [`Acquirer`].
#[derive(Clone, Default)]
pub struct AcquireOptions {
    pub download: DownloadOptions,
    pub on_event: Option<Arc<dyn Fn(&AcquireEvent<'_>) + Send + Sync>>,
}

impl fmt::Debug for AcquireOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquireOptions")
            .field("download", &self.download)
            .field("on_event", &"{ ... }")
            .finish()
    }
}

impl AcquireOptions {
    #[must_use]
    pub fn download(mut self, download: DownloadOptions) -> Self {
        self.download = download;
        self
    }

    #[must_use]
    pub fn on_event(mut self, on_event: Arc<dyn Fn(&AcquireEvent<'_>) + Send + Sync>) -> Self {
        self.on_event = Some(on_event);
        self
    }
}

/// Orchestrates download and extraction across the configured sources.
pub struct Acquirer<C, S> {
    client: C,
    selector: S,
    sources: SourceList,
    options: AcquireOptions,
}

impl<C: HttpClient, S: SourceSelector> Acquirer<C, S> {
    pub fn new(client: C, selector: S) -> Self {
        Self {
            client,
            selector,
            sources: SourceList::default(),
            options: AcquireOptions::default(),
        }
    }

    #[must_use]
    pub fn sources(mut self, sources: SourceList) -> Self {
        self.sources = sources;
        self
    }

    #[must_use]
    pub fn options(mut self, options: AcquireOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source_list(&self) -> &SourceList {
        &self.sources
    }

    /// Make sure the executables for `identity` exist in `target_dir`.
    ///
    /// `source_index` follows [`SourceChoice::from_index`]. Returns as soon
    /// as `ffmpeg` and `ffprobe` are already present, without touching the
    /// network.
    pub async fn acquire(
        &self,
        identity: &SystemIdentity,
        target_dir: &Path,
        source_index: Option<usize>,
    ) -> Result<ToolPaths, AcquireError> {
        let existing = resolve_existing_paths_async(target_dir, identity).await;
        if existing.is_complete() {
            debug!(dir = %target_dir.display(), "executables already present");
            return Ok(existing);
        }

        let remote_name = identity
            .remote_archive_name()
            .ok_or_else(|| AcquireError::UnsupportedPlatform(identity.to_string()))?;
        let layout = Layout::for_identity(identity).map_err(AcquireError::Layout)?;
        tokio::fs::create_dir_all(target_dir).await?;

        let candidates = self.candidates(source_index).await;
        info!(
            archive = %remote_name,
            candidates = candidates.len(),
            dir = %target_dir.display(),
            "acquiring executables"
        );

        let mut failures = Vec::new();
        for (attempt, source) in candidates.iter().enumerate() {
            self.emit(&AcquireEvent::Attempting {
                source,
                attempt: attempt + 1,
                of: candidates.len(),
            });

            match self
                .attempt(source, &remote_name, target_dir, &layout, identity)
                .await
            {
                Ok(()) => {
                    info!(source = %source.name, "installed executables");
                    self.emit(&AcquireEvent::Installed { source });
                    return Ok(resolve_existing_paths_async(target_dir, identity).await);
                }
                Err(error) => {
                    warn!(source = %source.name, %error, "source failed, trying next");
                    self.emit(&AcquireEvent::AttemptFailed {
                        source,
                        error: &error,
                    });
                    remove_installed(target_dir, identity).await;
                    failures.push(FailedAttempt {
                        source: source.name.clone(),
                        error,
                    });
                }
            }
        }

        Err(AcquireError::AllSourcesExhausted { attempts: failures })
    }

    async fn candidates(&self, source_index: Option<usize>) -> Vec<Source> {
        let choice = SourceChoice::from_index(source_index, self.sources.len());
        let winner = if choice.needs_selection() {
            self.selector.select(&self.sources).await
        } else {
            None
        };
        plan_candidates(&self.sources, choice, winner.as_ref())
    }

    async fn attempt(
        &self,
        source: &Source,
        remote_name: &str,
        target_dir: &Path,
        layout: &Layout,
        identity: &SystemIdentity,
    ) -> Result<(), AttemptError> {
        let staged = download_archive(
            &self.client,
            source,
            remote_name,
            target_dir,
            &self.options.download,
        )
        .await?;
        self.emit(&AcquireEvent::Downloaded {
            source,
            bytes: staged.bytes(),
            elapsed: staged.elapsed(),
        });

        let archive = staged.path().to_path_buf();
        let dir = target_dir.to_path_buf();
        let layout = layout.clone();
        let report = tokio::task::spawn_blocking(move || extract(&archive, &dir, &layout))
            .await??;
        debug!(placed = report.placed.len(), "archive extracted");

        staged.remove().await?;

        if identity.is_unix() {
            for tool in Tool::REQUIRED {
                make_executable(&target_dir.join(tool.file_name(identity))).await?;
            }
        }
        Ok(())
    }

    fn emit(&self, event: &AcquireEvent<'_>) {
        if let Some(callback) = &self.options.on_event {
            callback(event);
        }
    }
}

/// Best-effort removal of every executable, so a failed attempt never
/// leaves a mix of old and new files behind.
async fn remove_installed(target_dir: &Path, identity: &SystemIdentity) {
    for tool in Tool::ALL {
        let path = target_dir.join(tool.file_name(identity));
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "could not remove executable");
            }
        }
    }
}
