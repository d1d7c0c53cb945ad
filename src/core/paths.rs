//! Path normalization utilities
//!
//! All emitted paths use '/' as separator for cross-platform consistency.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to a base directory, '/'-normalized.
pub fn make_relative(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(normalize_path)
}

/// Resolve a possibly-relative path against a root.
pub fn absolutize(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Default cache directory for a project root.
pub fn default_cache_dir(root: &Path) -> PathBuf {
    root.join("node_modules").join(".cache").join("twpatch")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("src/app.vue")), "src/app.vue");
    }

    #[test]
    fn test_make_relative() {
        let base = Path::new("/project");
        assert_eq!(
            make_relative(Path::new("/project/src/app.vue"), base),
            Some("src/app.vue".to_string())
        );
        assert_eq!(make_relative(Path::new("/other/file.vue"), base), None);
    }

    #[test]
    fn test_absolutize() {
        let root = Path::new("/project");
        assert_eq!(
            absolutize(Path::new("dist/out.json"), root),
            PathBuf::from("/project/dist/out.json")
        );
        assert_eq!(
            absolutize(Path::new("/abs/out.json"), root),
            PathBuf::from("/abs/out.json")
        );
    }

    #[test]
    fn test_default_cache_dir() {
        assert_eq!(
            default_cache_dir(Path::new("/project")),
            PathBuf::from("/project/node_modules/.cache/twpatch")
        );
    }
}
