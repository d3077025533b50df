//! Host detection for ffbin.
//!
//! Answers three questions about the running machine: which prebuilt
//! archive fits it, what its executables are called, and where they
//! should live by default.

pub use arch::Arch;
pub use error::{Error, Result};
pub use identity::{SystemIdentity, Tool};
pub use os::Platform;

pub mod arch;
pub mod dir;
mod error;
mod identity;
pub mod os;
