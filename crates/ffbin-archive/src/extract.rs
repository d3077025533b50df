//! Format dispatch and the checks shared by every format.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::layout::{ArchiveFormat, Layout};
use crate::staging::Staging;

mod tar;
mod zip;

/// What an extraction placed and how much it looked at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractReport {
    pub format: ArchiveFormat,
    pub entries_scanned: usize,
    /// Final paths inside the target directory.
    pub placed: Vec<PathBuf>,
}

/// Extract the entries `layout` selects from `archive` into `target_dir`.
///
/// Matched entries are unpacked into a staging directory first and moved
/// into place only after the required files are all present. On error the
/// target directory keeps whatever it held before.
///
/// This does blocking I/O; call it from a blocking context.
pub fn extract(archive: &Path, target_dir: &Path, layout: &Layout) -> Result<ExtractReport> {
    let mut staging = Staging::new(target_dir)?;

    let entries_scanned = match layout.format {
        ArchiveFormat::Zip => zip::stage(archive, &mut staging, layout)?,
        ArchiveFormat::TarXz => tar::stage(archive, &mut staging, layout)?,
    };
    debug!(entries_scanned, archive = %archive.display(), "scanned archive");

    if staging.is_empty() {
        return Err(ExtractError::NoMatchingEntries);
    }
    let missing = missing_required(staging.names(), &layout.required);
    if !missing.is_empty() {
        return Err(ExtractError::MissingEntries { missing });
    }

    let placed = staging.commit()?;
    info!(count = placed.len(), target = %target_dir.display(), "extracted executables");
    Ok(ExtractReport {
        format: layout.format,
        entries_scanned,
        placed,
    })
}

fn missing_required<'a>(
    names: impl Iterator<Item = &'a OsString>,
    required: &[String],
) -> Vec<String> {
    let names: Vec<_> = names.collect();
    required
        .iter()
        .filter(|want| !names.iter().any(|name| name.as_os_str() == want.as_str()))
        .cloned()
        .collect()
}
