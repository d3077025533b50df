//! Immutable configuration and result types.

mod options;
mod progress;
mod source;

pub use options::{DownloadOptions, ProbeOptions};
pub use progress::{DownloadProgress, ProbeResult};
pub use source::{DIRECT_ORIGIN, REFERENCE_URL, Source, SourceKind, SourceList, USER_AGENT};
