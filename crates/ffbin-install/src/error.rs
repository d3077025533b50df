use std::fmt;
use std::io;

use ffbin_archive::ExtractError;
use ffbin_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("no prebuilt FFmpeg archive is published for {0}")]
    UnsupportedPlatform(String),

    #[error("all {} download sources failed", attempts.len())]
    AllSourcesExhausted { attempts: Vec<FailedAttempt> },

    #[error("archive layout: {0}")]
    Layout(#[source] ExtractError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Why a single source did not produce an install.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("download failed: {0}")]
    Download(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug)]
pub struct FailedAttempt {
    pub source: String,
    pub error: AttemptError,
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}
