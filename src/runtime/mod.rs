//! Framework runtime collaborators
//!
//! The engine never implements the styling framework itself; it talks to it
//! through the `TailwindRuntime` trait. The Node-backed implementation shells
//! out to the installed framework; tests substitute an in-process fake.
//!
//! - package: `node_modules` package resolution
//! - node: Node-process-backed runtime implementation

pub mod node;
pub mod package;

use anyhow::Result;
use std::path::PathBuf;

use crate::core::model::ClassSet;
use crate::core::options::NormalizedOptions;
use crate::core::version::MajorVersion;
use package::PackageInfo;

/// Request to apply version-specific source patches to the installed
/// framework package.
#[derive(Debug)]
pub struct PatchRequest<'a> {
    pub package_info: &'a PackageInfo,
    pub options: &'a NormalizedOptions,
    pub major_version: MajorVersion,
}

/// Request to run a legacy (v2/v3) framework build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub cwd: PathBuf,
    pub config: Option<PathBuf>,
    pub major_version: MajorVersion,
}

/// One framework execution context (v2/v3 only): the classes it currently
/// knows, plus the raw internal reference when context exposure is enabled.
#[derive(Debug, Clone, Default)]
pub struct RuntimeContext {
    pub classes: ClassSet,
    pub inner: Option<serde_json::Value>,
}

/// The contract with the framework runtime. Build invocation and the v4
/// pipeline are async; context loading is synchronous so both the sync and
/// async collection paths can use it.
#[allow(async_fn_in_trait)]
pub trait TailwindRuntime {
    /// Apply source patches to the installed package. Not retryable; a
    /// failure leaves the file tree in an unknown state and propagates.
    async fn apply_patches(&self, request: &PatchRequest<'_>) -> Result<()>;

    /// Run the legacy build so the framework populates its execution
    /// contexts.
    async fn run_build(&self, request: &BuildRequest) -> Result<()>;

    /// Load the framework's execution contexts (v2/v3 only).
    fn load_contexts(
        &self,
        package_info: &PackageInfo,
        major_version: MajorVersion,
        expose_inner: bool,
    ) -> Result<Vec<RuntimeContext>>;

    /// Drive the v4 build pipeline against the configured CSS entries and
    /// return every generated class.
    async fn run_v4_pipeline(
        &self,
        package_info: &PackageInfo,
        css_entries: &[PathBuf],
    ) -> Result<ClassSet>;
}
