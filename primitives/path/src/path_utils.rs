// SPDX-License-Identifier: CC0-1.0

//! Project-root lookup and path normalization.

use std::path::{Path, PathBuf};

use crate::discovery::DiscoveryError;

/// Find the project root by looking for `marker` in the current directory or
/// any of its ancestors.
pub fn find_project_root(marker: &str) -> Result<PathBuf, DiscoveryError> {
    find_project_root_from(&std::env::current_dir()?, marker)
}

/// Same as [`find_project_root`], starting the search at `start`.
///
/// The first directory (walking upwards) that contains a file named `marker`
/// is the project root.
pub fn find_project_root_from(start: &Path, marker: &str) -> Result<PathBuf, DiscoveryError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(marker).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(DiscoveryError::ProjectRootNotFound(marker.to_string()));
        }
    }
}

/// Express `path` relative to `root`, prefixed with `.`.
///
/// `/repo/api/user.proto` under `/repo` becomes `./api/user.proto`. Paths
/// outside `root` are returned unchanged, since the external tool can only
/// reach them by their full name.
pub fn normalize_relative(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => Path::new(".").join(rel).to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

/// Resolve a configured path against the project root. Absolute paths are kept.
pub fn resolve_in_root(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_relative_inside_root() {
        let rel = normalize_relative(Path::new("/repo/api/v1/user.proto"), Path::new("/repo"));
        assert_eq!(rel, Path::new(".").join("api/v1/user.proto").to_string_lossy());
    }

    #[test]
    fn test_normalize_relative_outside_root() {
        let rel = normalize_relative(Path::new("/elsewhere/user.proto"), Path::new("/repo"));
        assert_eq!(rel, "/elsewhere/user.proto");
    }

    #[test]
    fn test_resolve_in_root() {
        assert_eq!(resolve_in_root(Path::new("/repo"), Path::new("api")), PathBuf::from("/repo/api"));
        assert_eq!(resolve_in_root(Path::new("/repo"), Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn test_find_project_root_from_nested_directory() {
        let temp = tempfile::tempdir().expect("Failed to create temporary directory");
        std::fs::write(temp.path().join("marker.toml"), "").expect("Failed to write marker");
        let nested = temp.path().join("a/b/c");
        std::fs::create_dir_all(&nested).expect("Failed to create nested dirs");

        let root = find_project_root_from(&nested, "marker.toml").expect("root should be found");
        assert_eq!(root, temp.path());

        let missing = find_project_root_from(&nested, "definitely-not-here.toml");
        assert!(matches!(missing, Err(DiscoveryError::ProjectRootNotFound(_))));
    }
}
