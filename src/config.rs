//! Project configuration file handling
//!
//! Reads `twpatch.config.json` and dispatches on the detected input shape:
//! the legacy `patch` layout, the unified registry layout, or the canonical
//! partial layout. All three converge on [`UserOptions`] before
//! normalization.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::options::{
    self, from_legacy_options, from_unified_config, is_legacy_shape, is_unified_shape, CacheUser,
    FeatureUser, OutputUser, TailwindUser, UserOptions,
};
use crate::core::util::{to_json_with_indent, write_replacing};

/// Default configuration file name, looked up at the project root.
pub const CONFIG_FILE: &str = "twpatch.config.json";

/// The configuration written by `init-config`: the documented defaults made
/// explicit, so normalizing the written file yields the same options as an
/// empty one.
pub fn default_config() -> UserOptions {
    UserOptions {
        project_root: None,
        tailwind: TailwindUser {
            package: Some(options::DEFAULT_PACKAGE.to_string()),
            ..Default::default()
        },
        cache: CacheUser {
            enabled: Some(true),
            ..Default::default()
        },
        output: OutputUser {
            enabled: Some(true),
            file: Some(PathBuf::from(options::DEFAULT_OUTPUT_FILE)),
            pretty: Some(options::DEFAULT_PRETTY_INDENT),
            remove_universal_selector: Some(true),
            ..Default::default()
        },
        filter: Default::default(),
        features: FeatureUser {
            expose_context: Some(false),
            extended_length_units: Some(false),
        },
    }
}

/// Write a starter configuration at the project root. Refuses to clobber an
/// existing file unless `force` is set.
pub fn init_config(root: &Path, force: bool) -> Result<PathBuf> {
    let path = root.join(CONFIG_FILE);
    if path.exists() && !force {
        bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    let mut content = to_json_with_indent(&default_config(), options::DEFAULT_PRETTY_INDENT)?;
    content.push('\n');
    write_replacing(&path, &content)?;
    Ok(path)
}

/// Load a configuration file, converting legacy and unified shapes to the
/// canonical partial shape.
pub fn load_config(path: &Path) -> Result<UserOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse configuration: {}", path.display()))
}

/// Load the configuration at the project root, if one exists. A missing file
/// means "no overrides", not an error.
pub fn load_project_config(root: &Path) -> Result<UserOptions> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(UserOptions::default());
    }
    load_config(&path)
}

fn parse_config(content: &str) -> Result<UserOptions> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    if is_legacy_shape(&value) {
        let legacy = serde_json::from_value(value)?;
        return Ok(from_legacy_options(legacy));
    }
    if is_unified_shape(&value) {
        let unified = serde_json::from_value(value)?;
        return Ok(from_unified_config(unified));
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::normalize;
    use tempfile::tempdir;

    #[test]
    fn test_init_then_load_matches_defaults() {
        let temp = tempdir().unwrap();
        let path = init_config(temp.path(), false).unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE));

        let loaded = load_project_config(temp.path()).unwrap();
        let from_file = normalize(loaded, temp.path());
        let from_empty = normalize(UserOptions::default(), temp.path());
        assert_eq!(from_file, from_empty);
    }

    #[test]
    fn test_init_refuses_to_clobber_without_force() {
        let temp = tempdir().unwrap();
        init_config(temp.path(), false).unwrap();

        let err = init_config(temp.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        init_config(temp.path(), true).unwrap();
    }

    #[test]
    fn test_missing_project_config_is_empty_overrides() {
        let temp = tempdir().unwrap();
        let loaded = load_project_config(temp.path()).unwrap();
        assert_eq!(loaded, UserOptions::default());
    }

    #[test]
    fn test_parse_dispatches_on_legacy_shape() {
        let user = parse_config(
            r#"{"patch": {"output": {"filename": "out.json"}, "tailwindcss": {"version": 2}}}"#,
        )
        .unwrap();
        assert_eq!(user.output.file, Some(PathBuf::from("out.json")));
        assert_eq!(user.tailwind.version, Some(2));
    }

    #[test]
    fn test_parse_dispatches_on_unified_shape() {
        let user = parse_config(
            r#"{"tailwind": {"version": 4, "next": {"cssEntries": ["app.css"]}}}"#,
        )
        .unwrap();
        assert_eq!(user.tailwind.version, Some(4));
        assert_eq!(
            user.tailwind.v4.unwrap().css_entries,
            Some(vec![PathBuf::from("app.css")])
        );
    }

    #[test]
    fn test_unified_overrides_leave_defaults_elsewhere() {
        let user = parse_config(
            r#"{"output": {"file": "dist/classes.json", "pretty": 0, "stripUniversalSelector": false}}"#,
        )
        .unwrap();
        let opts = normalize(user, Path::new("/project"));

        assert_eq!(opts.output.file, PathBuf::from("/project/dist/classes.json"));
        assert_eq!(opts.output.pretty, 0);
        assert!(!opts.output.remove_universal_selector);
        // Everything else keeps its default.
        assert_eq!(opts.tailwind.package, "tailwindcss");
        assert!(opts.cache.enabled);
        assert!(opts.output.enabled);
    }

    #[test]
    fn test_parse_canonical_shape() {
        let user = parse_config(r#"{"cache": {"strategy": "overwrite"}}"#).unwrap();
        assert_eq!(
            user.cache.strategy,
            Some(crate::core::options::CacheStrategy::Overwrite)
        );
    }

    #[test]
    fn test_load_config_reports_bad_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
