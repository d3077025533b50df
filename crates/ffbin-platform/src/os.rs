//! Operating system detection.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Operating system families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    Macos,
    Other,
}

impl Platform {
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::Macos,
            _ => Platform::Other,
        }
    }
}

/// Detect current operating system.
pub fn detect() -> Platform {
    Platform::from_os_name(std::env::consts::OS)
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
            Platform::Macos => write!(f, "macos"),
            Platform::Other => write!(f, "{}", std::env::consts::OS),
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win32" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" | "darwin" => Ok(Platform::Macos),
            other => Err(Error::UnknownOS(other.to_string())),
        }
    }
}
