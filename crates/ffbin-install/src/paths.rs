use std::path::{Path, PathBuf};

use ffbin_platform::{SystemIdentity, Tool};
use serde::Serialize;

/// Where each executable lives, if it is installed.
///
/// `None` means the file is missing or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolPaths {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    pub ffplay: Option<PathBuf>,
}

impl ToolPaths {
    pub fn get(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Ffmpeg => self.ffmpeg.as_deref(),
            Tool::Ffprobe => self.ffprobe.as_deref(),
            Tool::Ffplay => self.ffplay.as_deref(),
        }
    }

    fn set(&mut self, tool: Tool, path: Option<PathBuf>) {
        match tool {
            Tool::Ffmpeg => self.ffmpeg = path,
            Tool::Ffprobe => self.ffprobe = path,
            Tool::Ffplay => self.ffplay = path,
        }
    }

    /// Both required executables are present.
    pub fn is_complete(&self) -> bool {
        Tool::REQUIRED.iter().all(|tool| self.get(*tool).is_some())
    }
}

/// Check which executables exist in `dir` as non-empty files.
pub fn resolve_existing_paths(dir: &Path, identity: &SystemIdentity) -> ToolPaths {
    let mut paths = ToolPaths::default();
    for tool in Tool::ALL {
        let path = dir.join(tool.file_name(identity));
        let present = std::fs::metadata(&path).is_ok_and(|m| m.is_file() && m.len() > 0);
        paths.set(tool, present.then_some(path));
    }
    paths
}

/// Non-blocking variant of [`resolve_existing_paths`].
pub async fn resolve_existing_paths_async(dir: &Path, identity: &SystemIdentity) -> ToolPaths {
    let mut paths = ToolPaths::default();
    for tool in Tool::ALL {
        let path = dir.join(tool.file_name(identity));
        let present = tokio::fs::metadata(&path)
            .await
            .is_ok_and(|m| m.is_file() && m.len() > 0);
        paths.set(tool, present.then_some(path));
    }
    paths
}

#[cfg(test)]
mod tests {
    use ffbin_platform::{Arch, Platform};

    use super::*;

    const LINUX: SystemIdentity = SystemIdentity::new(Platform::Linux, Arch::X64);

    #[test]
    fn empty_files_count_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ffmpeg"), b"bin").unwrap();
        std::fs::write(dir.path().join("ffprobe"), b"").unwrap();

        let paths = resolve_existing_paths(dir.path(), &LINUX);
        assert_eq!(paths.ffmpeg, Some(dir.path().join("ffmpeg")));
        assert_eq!(paths.ffprobe, None);
        assert_eq!(paths.ffplay, None);
        assert!(!paths.is_complete());
    }

    #[test]
    fn directories_count_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("ffmpeg")).unwrap();
        assert_eq!(resolve_existing_paths(dir.path(), &LINUX).ffmpeg, None);
    }

    #[test]
    fn uses_platform_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let windows = SystemIdentity::new(Platform::Windows, Arch::X64);
        std::fs::write(dir.path().join("ffmpeg.exe"), b"bin").unwrap();
        std::fs::write(dir.path().join("ffprobe.exe"), b"bin").unwrap();

        assert!(resolve_existing_paths(dir.path(), &windows).is_complete());
        assert!(!resolve_existing_paths(dir.path(), &LINUX).is_complete());
    }

    #[tokio::test]
    async fn async_matches_sync() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ffmpeg"), b"bin").unwrap();
        std::fs::write(dir.path().join("ffprobe"), b"bin").unwrap();
        std::fs::write(dir.path().join("ffplay"), b"").unwrap();

        let sync = resolve_existing_paths(dir.path(), &LINUX);
        let async_paths = resolve_existing_paths_async(dir.path(), &LINUX).await;
        assert_eq!(sync, async_paths);
        assert!(async_paths.is_complete());
    }

    #[test]
    fn missing_dir_resolves_to_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = resolve_existing_paths(&dir.path().join("absent"), &LINUX);
        assert_eq!(paths, ToolPaths::default());
    }
}
