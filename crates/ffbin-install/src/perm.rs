use std::io;
use std::path::Path;

/// Mark `path` as `rwxr-xr-x`.
#[cfg(unix)]
pub(crate) async fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
pub(crate) async fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
