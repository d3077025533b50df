use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;
use xz2::read::XzDecoder;

use crate::error::{ExtractError, Result};
use crate::layout::Layout;
use crate::sanitize::{normalize_relative, slash_path};
use crate::staging::Staging;

/// Stream the tarball, unpacking only regular files the layout matches and
/// places. Returns the number of entries read.
pub(super) fn stage(archive: &Path, staging: &mut Staging, layout: &Layout) -> Result<usize> {
    let reader = XzDecoder::new(BufReader::new(File::open(archive)?));
    let mut tar = ::tar::Archive::new(reader);
    let mut scanned = 0;

    let entries = tar
        .entries()
        .map_err(|e| ExtractError::Corrupted(e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| ExtractError::Corrupted(e.to_string()))?;
        scanned += 1;

        if !entry.header().entry_type().is_file() {
            continue;
        }
        let raw = entry
            .path()
            .map_err(|e| ExtractError::Corrupted(e.to_string()))?
            .into_owned();
        let Some(path) = normalize_relative(&raw) else {
            return Err(ExtractError::InvalidPath {
                entry: raw.display().to_string(),
            });
        };

        if !layout.matches(&slash_path(&path)) {
            continue;
        }
        let Some(name) = layout.placement.final_name(&path) else {
            debug!(entry = %path.display(), "matched entry at unexpected depth, skipping");
            continue;
        };

        let destination = staging.path().join(&name);
        entry
            .unpack(&destination)
            .map_err(|e| ExtractError::ExtractionFailed {
                path: destination.clone(),
                source: e,
            })?;
        staging.stage(destination, name.into_os_string());
    }
    Ok(scanned)
}
