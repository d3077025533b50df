use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no archive layout is known for {0}")]
    UnsupportedPlatform(String),

    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("entry path escapes the archive root: '{entry}'")]
    InvalidPath { entry: String },

    #[error("no entries matched the expected layout")]
    NoMatchingEntries,

    #[error("archive is missing {}", missing.join(", "))]
    MissingEntries { missing: Vec<String> },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("invalid entry pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
