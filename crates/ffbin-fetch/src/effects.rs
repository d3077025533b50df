//! Network I/O.

mod download;
mod http;
mod probe;
mod selector;

pub use download::{StagedArchive, download_archive};
pub use http::{BoxStream, HttpClient, HttpResponse};
pub use probe::probe;
pub use selector::{ProbeSelector, Selection, SourceSelector};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
