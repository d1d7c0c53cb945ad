//! Options normalization
//!
//! Three input shapes converge here: the canonical partial shape
//! (`UserOptions`), the legacy shape (detected by its `patch` key), and the
//! unified registry shape (`{output, tailwind}`). The two adapters are total
//! functions into `UserOptions`; `normalize` then fills every omitted field
//! with a documented default. Normalization does no I/O and never fails on
//! missing optional fields.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::paths::{absolutize, default_cache_dir};

/// Default package to resolve and patch.
pub const DEFAULT_PACKAGE: &str = "tailwindcss";

/// Default cache file name.
pub const DEFAULT_CACHE_FILE: &str = "classes.json";

/// Default extract output file, relative to the project root.
pub const DEFAULT_OUTPUT_FILE: &str = ".twpatch/classes.json";

/// Default pretty-print indent width for persisted JSON.
pub const DEFAULT_PRETTY_INDENT: usize = 2;

/// Reconciliation policy for combining an observed class set with the
/// persisted cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    #[default]
    Merge,
    Overwrite,
}

impl std::str::FromStr for CacheStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(CacheStrategy::Merge),
            "overwrite" => Ok(CacheStrategy::Overwrite),
            _ => Err(format!("Unknown cache strategy: {}", s)),
        }
    }
}

/// Serialized form of the extracted class list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Lines,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "lines" | "text" => Ok(OutputFormat::Lines),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Per-version execution overrides for the legacy (v2/v3) build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionedExecUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct V4User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_entries: Option<Vec<PathBuf>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TailwindUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_paths: Option<Vec<PathBuf>>,
    /// Explicit major-version hint; wins over the detected version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v2: Option<VersionedExecUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v3: Option<VersionedExecUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v4: Option<V4User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<CacheStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Indent width for persisted JSON; 0 writes compact output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_universal_selector: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expose_context: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_length_units: Option<bool>,
}

/// The canonical partial input shape. Every field is optional; `normalize`
/// supplies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
    pub tailwind: TailwindUser,
    pub cache: CacheUser,
    pub output: OutputUser,
    pub filter: FilterUser,
    pub features: FeatureUser,
}

impl UserOptions {
    /// Field-wise merge: `overrides` wins wherever it supplies a value.
    pub fn merged(mut self, overrides: UserOptions) -> UserOptions {
        let o = overrides;
        self.project_root = o.project_root.or(self.project_root);

        self.tailwind.package = o.tailwind.package.or(self.tailwind.package);
        self.tailwind.resolve_paths = o.tailwind.resolve_paths.or(self.tailwind.resolve_paths);
        self.tailwind.version = o.tailwind.version.or(self.tailwind.version);
        self.tailwind.cwd = o.tailwind.cwd.or(self.tailwind.cwd);
        self.tailwind.config = o.tailwind.config.or(self.tailwind.config);
        self.tailwind.v2 = o.tailwind.v2.or(self.tailwind.v2);
        self.tailwind.v3 = o.tailwind.v3.or(self.tailwind.v3);
        self.tailwind.v4 = o.tailwind.v4.or(self.tailwind.v4);

        self.cache.enabled = o.cache.enabled.or(self.cache.enabled);
        self.cache.dir = o.cache.dir.or(self.cache.dir);
        self.cache.file = o.cache.file.or(self.cache.file);
        self.cache.strategy = o.cache.strategy.or(self.cache.strategy);

        self.output.enabled = o.output.enabled.or(self.output.enabled);
        self.output.file = o.output.file.or(self.output.file);
        self.output.format = o.output.format.or(self.output.format);
        self.output.pretty = o.output.pretty.or(self.output.pretty);
        self.output.remove_universal_selector = o
            .output
            .remove_universal_selector
            .or(self.output.remove_universal_selector);

        self.filter.prefix = o.filter.prefix.or(self.filter.prefix);
        self.filter.pattern = o.filter.pattern.or(self.filter.pattern);

        self.features.expose_context = o.features.expose_context.or(self.features.expose_context);
        self.features.extended_length_units = o
            .features
            .extended_length_units
            .or(self.features.extended_length_units);

        self
    }
}

// ---------------------------------------------------------------------------
// Legacy shape
// ---------------------------------------------------------------------------

/// The legacy input shape, recognized by the presence of its `patch` key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyOptions {
    pub patch: LegacyPatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyPatch {
    pub output: LegacyOutput,
    pub tailwindcss: LegacyTailwind,
    pub cache: Option<LegacyCache>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyOutput {
    pub filename: Option<PathBuf>,
    pub remove_universal_selector: Option<bool>,
    pub loose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyTailwind {
    pub version: Option<u32>,
    pub cwd: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub v2: Option<VersionedExecUser>,
    pub v3: Option<VersionedExecUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyCache {
    pub dir: Option<PathBuf>,
    pub file: Option<String>,
}

/// Detect whether a raw value carries the legacy shape.
pub fn is_legacy_shape(value: &serde_json::Value) -> bool {
    value.get("patch").is_some()
}

/// Convert the legacy shape into the canonical partial shape. Total: every
/// legacy input maps, unmapped fields stay `None` for normalization.
pub fn from_legacy_options(legacy: LegacyOptions) -> UserOptions {
    let patch = legacy.patch;

    let cache = match patch.cache {
        Some(cache) => CacheUser {
            // The legacy shape had no enabled flag; carrying a cache section
            // meant caching was on.
            enabled: Some(true),
            dir: cache.dir,
            file: cache.file,
            strategy: None,
        },
        None => CacheUser::default(),
    };

    UserOptions {
        project_root: None,
        tailwind: TailwindUser {
            package: None,
            resolve_paths: None,
            version: patch.tailwindcss.version,
            cwd: patch.tailwindcss.cwd,
            config: patch.tailwindcss.config,
            v2: patch.tailwindcss.v2,
            v3: patch.tailwindcss.v3,
            v4: None,
        },
        cache,
        output: OutputUser {
            enabled: None,
            file: patch.output.filename,
            format: None,
            pretty: patch.output.loose.map(|loose| {
                if loose {
                    DEFAULT_PRETTY_INDENT
                } else {
                    0
                }
            }),
            remove_universal_selector: patch.output.remove_universal_selector,
        },
        filter: FilterUser::default(),
        features: FeatureUser::default(),
    }
}

// ---------------------------------------------------------------------------
// Unified registry shape
// ---------------------------------------------------------------------------

/// The unified registry shape: `{output, tailwind}` with a `next` section for
/// the v4 pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnifiedConfig {
    pub output: UnifiedOutput,
    pub tailwind: UnifiedTailwind,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnifiedOutput {
    pub file: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub pretty: Option<usize>,
    pub strip_universal_selector: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnifiedTailwind {
    pub version: Option<u32>,
    pub package: Option<String>,
    pub next: Option<UnifiedNext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnifiedNext {
    pub css_entries: Option<Vec<PathBuf>>,
}

/// Detect the unified registry shape: no `patch` key, but a `tailwind.next`
/// section or a `stripUniversalSelector` output flag.
pub fn is_unified_shape(value: &serde_json::Value) -> bool {
    if value.get("patch").is_some() {
        return false;
    }
    let has_next = value
        .get("tailwind")
        .map(|t| t.get("next").is_some())
        .unwrap_or(false);
    let has_strip = value
        .get("output")
        .map(|o| o.get("stripUniversalSelector").is_some())
        .unwrap_or(false);
    has_next || has_strip
}

/// Convert the unified registry shape into the canonical partial shape.
///
/// Sub-version fields the unified shape does not carry (`v2`, `v3`, `cwd`,
/// `config`) are set explicitly to `None` so downstream defaulting is
/// unambiguous.
pub fn from_unified_config(config: UnifiedConfig) -> UserOptions {
    UserOptions {
        project_root: None,
        tailwind: TailwindUser {
            package: config.tailwind.package,
            resolve_paths: None,
            version: config.tailwind.version,
            cwd: None,
            config: None,
            v2: None,
            v3: None,
            v4: config.tailwind.next.map(|next| V4User {
                css_entries: next.css_entries,
            }),
        },
        cache: CacheUser::default(),
        output: OutputUser {
            enabled: None,
            file: config.output.file,
            format: config.output.format,
            pretty: config.output.pretty,
            remove_universal_selector: config.output.strip_universal_selector,
        },
        filter: FilterUser::default(),
        features: FeatureUser::default(),
    }
}

// ---------------------------------------------------------------------------
// Normalized model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedExec {
    pub cwd: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TailwindOptions {
    pub package: String,
    pub resolve_paths: Vec<PathBuf>,
    /// Explicit major-version hint; absence means "detect from the installed
    /// package".
    pub version: Option<u32>,
    pub cwd: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub v2: VersionedExec,
    pub v3: VersionedExec,
    pub v4_css_entries: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    pub enabled: bool,
    pub dir: PathBuf,
    pub file: String,
    pub strategy: CacheStrategy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    pub enabled: bool,
    pub file: PathBuf,
    pub format: OutputFormat,
    pub pretty: usize,
    pub remove_universal_selector: bool,
}

/// Class filter inputs passed to the collectors. Absence of both fields
/// means "accept every class"; that is the concrete default, not an
/// unresolved value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub prefix: Option<String>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureOptions {
    pub expose_context: bool,
    pub extended_length_units: bool,
}

/// The canonical, fully-defaulted options model. Immutable after
/// construction; shared by reference with every component for the
/// orchestrator's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOptions {
    pub project_root: PathBuf,
    pub tailwind: TailwindOptions,
    pub cache: CacheOptions,
    pub output: OutputOptions,
    pub filter: FilterOptions,
    pub features: FeatureOptions,
}

/// Fill every omitted field with its documented default.
///
/// `fallback_root` anchors relative paths when the input carries no project
/// root; defaults are pure functions of the arguments.
pub fn normalize(user: UserOptions, fallback_root: &Path) -> NormalizedOptions {
    let project_root = user
        .project_root
        .map(|r| absolutize(&r, fallback_root))
        .unwrap_or_else(|| fallback_root.to_path_buf());

    let cache_dir = user
        .cache
        .dir
        .map(|d| absolutize(&d, &project_root))
        .unwrap_or_else(|| default_cache_dir(&project_root));

    let output_file = user
        .output
        .file
        .map(|f| absolutize(&f, &project_root))
        .unwrap_or_else(|| project_root.join(DEFAULT_OUTPUT_FILE));

    let v2 = user.tailwind.v2.unwrap_or_default();
    let v3 = user.tailwind.v3.unwrap_or_default();

    NormalizedOptions {
        tailwind: TailwindOptions {
            package: user
                .tailwind
                .package
                .unwrap_or_else(|| DEFAULT_PACKAGE.to_string()),
            resolve_paths: user.tailwind.resolve_paths.unwrap_or_default(),
            version: user.tailwind.version,
            cwd: user.tailwind.cwd.map(|c| absolutize(&c, &project_root)),
            config: user.tailwind.config.map(|c| absolutize(&c, &project_root)),
            v2: VersionedExec {
                cwd: v2.cwd.map(|c| absolutize(&c, &project_root)),
                config: v2.config.map(|c| absolutize(&c, &project_root)),
            },
            v3: VersionedExec {
                cwd: v3.cwd.map(|c| absolutize(&c, &project_root)),
                config: v3.config.map(|c| absolutize(&c, &project_root)),
            },
            v4_css_entries: user
                .tailwind
                .v4
                .and_then(|v4| v4.css_entries)
                .unwrap_or_default()
                .into_iter()
                .map(|e| absolutize(&e, &project_root))
                .collect(),
        },
        cache: CacheOptions {
            enabled: user.cache.enabled.unwrap_or(true),
            dir: cache_dir,
            file: user
                .cache
                .file
                .unwrap_or_else(|| DEFAULT_CACHE_FILE.to_string()),
            strategy: user.cache.strategy.unwrap_or_default(),
        },
        output: OutputOptions {
            enabled: user.output.enabled.unwrap_or(true),
            file: output_file,
            format: user.output.format.unwrap_or_default(),
            pretty: user.output.pretty.unwrap_or(DEFAULT_PRETTY_INDENT),
            remove_universal_selector: user.output.remove_universal_selector.unwrap_or(true),
        },
        filter: FilterOptions {
            prefix: user.filter.prefix,
            pattern: user.filter.pattern,
        },
        features: FeatureOptions {
            expose_context: user.features.expose_context.unwrap_or(false),
            extended_length_units: user.features.extended_length_units.unwrap_or(false),
        },
        project_root,
    }
}
