//! Error types for ffbin-fetch.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("response from {url} had an empty body")]
    MissingBody { url: String },

    #[error("no data received from {url} for {idle:?}")]
    Stalled { url: String, idle: Duration },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl FetchError {
    pub(crate) fn network(e: impl std::error::Error) -> Self {
        FetchError::Network(e.to_string())
    }
}
