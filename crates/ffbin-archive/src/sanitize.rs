use std::path::{Component, Path, PathBuf};

/// Strip leading path components. `None` when nothing would remain.
pub(crate) fn strip_components(path: &Path, count: usize) -> Option<PathBuf> {
    let components: Vec<_> = path.components().collect();
    if components.len() <= count {
        return None;
    }
    Some(components[count..].iter().collect())
}

/// Normalize separators and drop `.` components.
///
/// Returns `None` for paths that are absolute or climb out with `..`, since
/// nothing inside an archive may land outside its extraction root.
pub(crate) fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(result)
}

/// Render a relative path with `/` separators for pattern matching.
pub(crate) fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
