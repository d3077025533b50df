use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::arch::{self, Arch};
use crate::os::{self, Platform};

static SYSTEM_IDENTITY: Lazy<SystemIdentity> =
    Lazy::new(|| SystemIdentity::new(os::detect(), arch::detect()));

const ARCHIVE_PREFIX: &str = "ffmpeg-master-latest-";

/// Platform and architecture of the host, as far as archive selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SystemIdentity {
    pub platform: Platform,
    pub arch: Arch,
}

impl SystemIdentity {
    pub const fn new(platform: Platform, arch: Arch) -> Self {
        Self { platform, arch }
    }

    /// Identity of the running host, detected once per process.
    pub fn detect() -> Self {
        *SYSTEM_IDENTITY
    }

    pub fn executable_suffix(&self) -> &'static str {
        match self.platform {
            Platform::Windows => ".exe",
            _ => "",
        }
    }

    /// File name of the prebuilt archive for this host.
    ///
    /// `None` means no prebuilt archive is published for the platform. macOS
    /// falls here, as does any platform that is neither Windows nor Linux.
    pub fn remote_archive_name(&self) -> Option<String> {
        let flavor = match (self.platform, self.arch) {
            (Platform::Windows, Arch::X64) => "win64-gpl.zip",
            (Platform::Windows, _) => "win32-gpl.zip",
            (Platform::Linux, Arch::Arm64) => "linuxarm64-gpl.tar.xz",
            (Platform::Linux, Arch::X86) => "linuxi686-gpl.tar.xz",
            (Platform::Linux, _) => "linux64-gpl.tar.xz",
            (Platform::Macos | Platform::Other, _) => return None,
        };
        Some(format!("{ARCHIVE_PREFIX}{flavor}"))
    }

    pub fn is_unix(&self) -> bool {
        !matches!(self.platform, Platform::Windows)
    }
}

impl fmt::Display for SystemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)
    }
}

/// The three executables shipped in an FFmpeg build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
    Ffplay,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Ffmpeg, Tool::Ffprobe, Tool::Ffplay];

    /// Tools an install cannot succeed without.
    pub const REQUIRED: [Tool; 2] = [Tool::Ffmpeg, Tool::Ffprobe];

    pub fn stem(&self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
            Tool::Ffplay => "ffplay",
        }
    }

    pub fn file_name(&self, identity: &SystemIdentity) -> String {
        format!("{}{}", self.stem(), identity.executable_suffix())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}
