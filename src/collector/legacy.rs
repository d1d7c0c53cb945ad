//! Legacy (v2/v3) class collection
//!
//! The legacy strategy needs a one-time framework build before the
//! execution contexts carry classes. This module resolves the execution
//! options for that build and collects classes across the loaded contexts.

use crate::core::options::NormalizedOptions;
use crate::core::version::MajorVersion;
use crate::runtime::{BuildRequest, RuntimeContext};

use super::ClassFilter;
use crate::core::model::ClassSet;

/// Resolve the execution options for the legacy build.
///
/// Selection rule: per-version sub-config fields override the shared
/// tailwind base fields, which override the project root.
pub fn resolve_exec_options(options: &NormalizedOptions, major: MajorVersion) -> BuildRequest {
    let versioned = match major {
        MajorVersion::V2 => &options.tailwind.v2,
        _ => &options.tailwind.v3,
    };

    let cwd = versioned
        .cwd
        .clone()
        .or_else(|| options.tailwind.cwd.clone())
        .unwrap_or_else(|| options.project_root.clone());

    let config = versioned
        .config
        .clone()
        .or_else(|| options.tailwind.config.clone());

    BuildRequest {
        cwd,
        config,
        major_version: major,
    }
}

/// Collect every class discoverable across the execution contexts, through
/// the configured filter.
pub fn collect_from_contexts(contexts: &[RuntimeContext], filter: &ClassFilter) -> ClassSet {
    contexts
        .iter()
        .flat_map(|ctx| ctx.classes.iter())
        .filter(|class| filter.accepts(class))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{normalize, TailwindUser, UserOptions, VersionedExecUser};
    use std::path::{Path, PathBuf};

    fn options_with(tailwind: TailwindUser) -> NormalizedOptions {
        normalize(
            UserOptions {
                tailwind,
                ..Default::default()
            },
            Path::new("/project"),
        )
    }

    fn context(classes: &[&str]) -> RuntimeContext {
        RuntimeContext {
            classes: classes.iter().map(|s| s.to_string()).collect(),
            inner: None,
        }
    }

    #[test]
    fn test_exec_options_default_to_project_root() {
        let opts = options_with(TailwindUser::default());
        let req = resolve_exec_options(&opts, MajorVersion::V3);
        assert_eq!(req.cwd, PathBuf::from("/project"));
        assert_eq!(req.config, None);
        assert_eq!(req.major_version, MajorVersion::V3);
    }

    #[test]
    fn test_shared_base_overrides_project_root() {
        let opts = options_with(TailwindUser {
            cwd: Some(PathBuf::from("apps/web")),
            config: Some(PathBuf::from("tailwind.config.cjs")),
            ..Default::default()
        });
        let req = resolve_exec_options(&opts, MajorVersion::V3);
        assert_eq!(req.cwd, PathBuf::from("/project/apps/web"));
        assert_eq!(req.config, Some(PathBuf::from("/project/tailwind.config.cjs")));
    }

    #[test]
    fn test_versioned_sub_config_overrides_base() {
        let opts = options_with(TailwindUser {
            cwd: Some(PathBuf::from("apps/web")),
            v2: Some(VersionedExecUser {
                cwd: Some(PathBuf::from("legacy/app")),
                config: None,
            }),
            ..Default::default()
        });

        let v2 = resolve_exec_options(&opts, MajorVersion::V2);
        assert_eq!(v2.cwd, PathBuf::from("/project/legacy/app"));

        // v3 is untouched by the v2 sub-config.
        let v3 = resolve_exec_options(&opts, MajorVersion::V3);
        assert_eq!(v3.cwd, PathBuf::from("/project/apps/web"));
    }

    #[test]
    fn test_collect_unions_contexts_through_filter() {
        let contexts = vec![context(&["flex", "p-4"]), context(&["p-4", "tw-btn"])];
        let all = collect_from_contexts(&contexts, &ClassFilter::default());
        assert_eq!(all.len(), 3);

        let filter = ClassFilter::with_prefix("tw-");
        let prefixed = collect_from_contexts(&contexts, &filter);
        assert_eq!(prefixed.into_iter().collect::<Vec<_>>(), vec!["tw-btn"]);
    }
}
