//! Mirror probing, source selection and streamed downloads.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Sources, options and progress snapshots
//! - [`core`] - Pure selection and formatting rules
//! - [`effects`] - Network I/O behind the [`HttpClient`] trait
//!
//! Probing never fails: an unreachable source is a zero-throughput result.
//! Downloading does fail, and the caller decides what to try next.

pub mod core;
pub mod data;
pub mod effects;
mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use core::{choose_best, format_speed};
pub use data::{
    DIRECT_ORIGIN, DownloadOptions, DownloadProgress, ProbeOptions, ProbeResult, REFERENCE_URL,
    Source, SourceKind, SourceList, USER_AGENT,
};
pub use effects::{
    BoxStream, HttpClient, HttpResponse, ProbeSelector, Selection, SourceSelector, StagedArchive,
    download_archive, probe,
};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
