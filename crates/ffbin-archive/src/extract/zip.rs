use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};
use crate::layout::Layout;
use crate::sanitize::slash_path;
use crate::staging::Staging;

/// Unpack the whole zip into staging, then stage every file the layout
/// matches. Returns the number of archive entries.
pub(super) fn stage(archive: &Path, staging: &mut Staging, layout: &Layout) -> Result<usize> {
    let tree = staging.path().join("tree");
    let entries = unpack_all(archive, &tree)?;

    let mut files = Vec::new();
    collect_files(&tree, &mut files)?;
    files.sort();

    for file in files {
        let relative = file.strip_prefix(&tree).unwrap_or(&file);
        if !layout.matches(&slash_path(relative)) {
            continue;
        }
        if let Some(name) = layout.placement.final_name(relative) {
            staging.stage(file.clone(), name.into_os_string());
        }
    }
    Ok(entries)
}

fn unpack_all(archive: &Path, root: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(archive)?);
    let mut zip = ::zip::ZipArchive::new(reader).map_err(|e| ExtractError::Corrupted(e.to_string()))?;

    for i in 0..zip.len() {
        let mut file = zip
            .by_index(i)
            .map_err(|e| ExtractError::Corrupted(e.to_string()))?;
        let relative = file
            .enclosed_name()
            .ok_or_else(|| ExtractError::InvalidPath {
                entry: file.name().to_string(),
            })?
            .to_path_buf();
        let destination = root.join(&relative);

        if file.is_dir() {
            fs::create_dir_all(&destination)?;
            continue;
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&destination).map_err(|e| ExtractError::ExtractionFailed {
            path: destination.clone(),
            source: e,
        })?;
        io::copy(&mut file, &mut out).map_err(|e| ExtractError::ExtractionFailed {
            path: destination.clone(),
            source: e,
        })?;
    }
    Ok(zip.len())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
