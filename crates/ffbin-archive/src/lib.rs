//! Pull the FFmpeg executables out of a release archive.
//!
//! # Architecture
//!
//! - `layout.rs` - Per-platform archive shape, expressed as data
//! - `sanitize.rs` - Path normalization and component stripping
//! - `staging.rs` - Scratch directory inside the target, committed by rename
//! - `extract/` - Per-format implementations

pub use error::{ExtractError, Result};
pub use extract::{ExtractReport, extract};
pub use layout::{ArchiveFormat, Layout, Placement};

mod error;
pub mod extract;
mod layout;
mod sanitize;
mod staging;
