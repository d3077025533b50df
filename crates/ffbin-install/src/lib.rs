//! Acquire FFmpeg executables into a directory, once.
//!
//! [`Acquirer::acquire`] returns immediately when the executables are
//! already present. Otherwise it orders the configured sources, then tries
//! them one at a time (download, extract, clean up) until one works.
//! [`ToolCache`] keeps the resolved paths around for repeated lookups.

pub use acquire::{AcquireEvent, AcquireOptions, Acquirer};
pub use cache::ToolCache;
pub use error::{AcquireError, AttemptError, FailedAttempt};
pub use paths::{ToolPaths, resolve_existing_paths, resolve_existing_paths_async};
pub use plan::{SourceChoice, plan_candidates};

mod acquire;
mod cache;
mod error;
mod paths;
mod perm;
mod plan;
