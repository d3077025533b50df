use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

const APP_DIR: &str = "ffbin";

pub fn user_home() -> Option<PathBuf> {
    home::home_dir()
}

pub fn user_data() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Application Support"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".local/share")))
    }
}

/// Directory binaries are installed into when the caller gives none.
pub fn default_install_dir() -> Result<PathBuf> {
    user_data()
        .map(|p| p.join(APP_DIR).join("bin"))
        .ok_or(Error::NoDataDir)
}
