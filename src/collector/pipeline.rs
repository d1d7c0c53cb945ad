//! v4 class collection
//!
//! The v4 strategy has no execution contexts to inspect; the framework's
//! build pipeline is the only source of the generated class list. There is
//! no synchronous variant of this path.

use std::path::PathBuf;

use crate::core::model::ClassSet;
use crate::core::options::NormalizedOptions;
use crate::error::PatchError;
use crate::runtime::package::PackageInfo;
use crate::runtime::TailwindRuntime;

use super::ClassFilter;

/// Default CSS entry, relative to the project root, when none is configured.
const DEFAULT_CSS_ENTRY: &str = "src/main.css";

/// Resolve the CSS entry points the pipeline compiles.
pub fn resolve_css_entries(options: &NormalizedOptions) -> Vec<PathBuf> {
    if options.tailwind.v4_css_entries.is_empty() {
        vec![options.project_root.join(DEFAULT_CSS_ENTRY)]
    } else {
        options.tailwind.v4_css_entries.clone()
    }
}

/// Run the v4 pipeline and collect every generated class through the filter.
pub async fn collect_v4<R: TailwindRuntime>(
    runtime: &R,
    package_info: &PackageInfo,
    options: &NormalizedOptions,
    filter: &ClassFilter,
) -> Result<ClassSet, PatchError> {
    let entries = resolve_css_entries(options);
    let classes = runtime
        .run_v4_pipeline(package_info, &entries)
        .await
        .map_err(PatchError::build)?;

    Ok(classes
        .into_iter()
        .filter(|class| filter.accepts(class))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{normalize, TailwindUser, UserOptions, V4User};
    use std::path::Path;

    #[test]
    fn test_css_entries_default_under_project_root() {
        let opts = normalize(UserOptions::default(), Path::new("/project"));
        assert_eq!(
            resolve_css_entries(&opts),
            vec![PathBuf::from("/project/src/main.css")]
        );
    }

    #[test]
    fn test_configured_entries_win() {
        let opts = normalize(
            UserOptions {
                tailwind: TailwindUser {
                    v4: Some(V4User {
                        css_entries: Some(vec![PathBuf::from("styles/app.css")]),
                    }),
                    ..Default::default()
                },
                ..Default::default()
            },
            Path::new("/project"),
        );
        assert_eq!(
            resolve_css_entries(&opts),
            vec![PathBuf::from("/project/styles/app.css")]
        );
    }
}
