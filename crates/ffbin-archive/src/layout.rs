use std::path::{Path, PathBuf};

use ffbin_platform::{Platform, SystemIdentity, Tool};
use regex::Regex;

use crate::error::{ExtractError, Result};
use crate::sanitize::strip_components;

/// Container formats the release archives come in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarXz,
}

/// How a matched entry path becomes a file name in the target directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Keep only the final component, wherever the entry sits.
    Relocate,
    /// Drop this many leading components. Whatever remains must be a bare
    /// file name, otherwise the entry is skipped.
    Strip(usize),
}

impl Placement {
    /// Name the entry at `path` gets in the target directory, if any.
    pub fn final_name(&self, path: &Path) -> Option<PathBuf> {
        match self {
            Placement::Relocate => path.file_name().map(PathBuf::from),
            Placement::Strip(count) => strip_components(path, *count)
                .filter(|rest| rest.components().count() == 1),
        }
    }
}

/// The shape an archive is expected to have.
///
/// `matcher` runs against each entry's archive-relative path rendered with
/// `/` separators. `required` lists file names that must be among the placed
/// files for the extraction to count as a success.
#[derive(Clone, Debug)]
pub struct Layout {
    pub format: ArchiveFormat,
    pub matcher: Regex,
    pub placement: Placement,
    pub required: Vec<String>,
}

impl Layout {
    pub fn new(
        format: ArchiveFormat,
        pattern: &str,
        placement: Placement,
        required: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        Ok(Self {
            format,
            matcher: Regex::new(pattern)?,
            placement,
            required: required.into_iter().collect(),
        })
    }

    /// Windows builds: a zip whose executables live in some `bin/` folder.
    pub fn windows_zip(identity: &SystemIdentity) -> Result<Self> {
        Self::new(
            ArchiveFormat::Zip,
            r"(?i)bin[/\\](ffmpeg|ffprobe|ffplay)\.exe$",
            Placement::Relocate,
            required_names(identity),
        )
    }

    /// Linux builds: a tar.xz laid out as `<release>/bin/<tool>`.
    pub fn linux_tar_xz(identity: &SystemIdentity) -> Result<Self> {
        Self::new(
            ArchiveFormat::TarXz,
            r"/bin/(ffmpeg|ffprobe)(/|$)",
            Placement::Strip(2),
            required_names(identity),
        )
    }

    pub fn for_identity(identity: &SystemIdentity) -> Result<Self> {
        match identity.platform {
            Platform::Windows => Self::windows_zip(identity),
            Platform::Linux => Self::linux_tar_xz(identity),
            Platform::Macos | Platform::Other => {
                Err(ExtractError::UnsupportedPlatform(identity.to_string()))
            }
        }
    }

    pub fn matches(&self, entry: &str) -> bool {
        self.matcher.is_match(entry)
    }
}

fn required_names(identity: &SystemIdentity) -> impl Iterator<Item = String> + '_ {
    Tool::REQUIRED.iter().map(move |tool| tool.file_name(identity))
}
