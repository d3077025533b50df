//! Architecture detection.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// CPU architecture families that prebuilt archives exist for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86,
    X64,
    Arm64,
    Other,
}

impl Arch {
    /// Map a kernel-reported machine name onto an architecture family.
    pub fn from_cpu_arch(name: &str) -> Self {
        match name {
            "i386" | "i586" | "i686" | "x86" => Arch::X86,
            "x86_64" | "amd64" => Arch::X64,
            "aarch64" | "arm64" => Arch::Arm64,
            _ => Arch::Other,
        }
    }
}

/// Detect current architecture.
pub fn detect() -> Arch {
    let cpu_arch = sysinfo::System::cpu_arch();
    Arch::from_cpu_arch(cpu_arch.as_str())
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X86 => write!(f, "x86"),
            Arch::X64 => write!(f, "x64"),
            Arch::Arm64 => write!(f, "arm64"),
            Arch::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "ia32" | "i686" => Ok(Arch::X86),
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            other => Err(Error::UnknownArch(other.to_string())),
        }
    }
}
