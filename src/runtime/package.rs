//! Installed-package resolution
//!
//! Locates the target framework package under `node_modules` and reads its
//! `package.json` metadata. Resolution failure is reported as `None`; the
//! orchestrator turns that into a fatal configuration error at construction
//! time.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata for a resolved package installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Option<String>,
    /// Directory containing the package's `package.json`.
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    version: Option<String>,
}

/// Resolve a package by walking the search paths.
///
/// For each base, `{base}/node_modules/{name}/package.json` is tried first,
/// then `{base}/{name}/package.json` (for bases that already point inside a
/// `node_modules` tree).
pub fn get_package_info(name: &str, search_paths: &[PathBuf]) -> Option<PackageInfo> {
    for base in search_paths {
        for dir in [base.join("node_modules").join(name), base.join(name)] {
            let manifest_path = dir.join("package.json");
            let Ok(raw) = fs::read_to_string(&manifest_path) else {
                continue;
            };
            let Ok(manifest) = serde_json::from_str::<PackageManifest>(&raw) else {
                continue;
            };
            return Some(PackageInfo {
                name: name.to_string(),
                version: manifest.version,
                root: dir,
            });
        }
    }
    None
}

/// Render the searched bases for error messages.
pub fn describe_search_paths(search_paths: &[PathBuf]) -> String {
    if search_paths.is_empty() {
        return "<none>".to_string();
    }
    search_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Search bases for a project: explicit resolve paths first, then the
/// project root.
pub fn search_paths_for(resolve_paths: &[PathBuf], project_root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = resolve_paths.to_vec();
    if !paths.iter().any(|p| p == project_root) {
        paths.push(project_root.to_path_buf());
    }
    paths
}
