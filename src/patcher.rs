//! Patcher orchestration
//!
//! `TailwindPatcher` wires the normalized options, the resolved framework
//! package, the cache store and a runtime implementation into the public
//! engine surface: patching, class collection, extraction and content token
//! scanning. Construction fails fast when the target package cannot be
//! resolved; everything downstream can then assume a valid installation.

use anyhow::Result;
use std::path::Path;

use crate::cache::store::CacheStore;
use crate::collector::{self, legacy, pipeline, ClassFilter};
use crate::core::model::{ClassSet, ExtractResult, TailwindTokenReport};
use crate::core::options::{normalize, NormalizedOptions, OutputFormat, UserOptions};
use crate::core::util::{to_json_with_indent, write_replacing};
use crate::core::version::{resolve_major_version, MajorVersion};
use crate::error::PatchError;
use crate::runtime::package::{describe_search_paths, get_package_info, search_paths_for, PackageInfo};
use crate::runtime::{PatchRequest, TailwindRuntime};
use crate::tokens::group::TokensByFile;
use crate::tokens::{extract_tokens, group_tokens_by_file, FileKey};

/// The engine facade. Holds the fully-defaulted options for its lifetime;
/// the runtime is injected so tests run without a Node installation.
pub struct TailwindPatcher<R> {
    options: NormalizedOptions,
    runtime: R,
    package_info: PackageInfo,
    major: MajorVersion,
    store: CacheStore,
    /// The legacy build runs at most once per patcher instance.
    built: bool,
}

impl<R: TailwindRuntime> TailwindPatcher<R> {
    /// Normalize the user options and resolve the target package. Resolution
    /// failure is fatal here, not at first use.
    pub fn new(user: UserOptions, fallback_root: &Path, runtime: R) -> Result<Self, PatchError> {
        let options = normalize(user, fallback_root);
        let search = search_paths_for(&options.tailwind.resolve_paths, &options.project_root);
        let package_info = get_package_info(&options.tailwind.package, &search).ok_or_else(|| {
            PatchError::Configuration {
                package: options.tailwind.package.clone(),
                searched: describe_search_paths(&search),
            }
        })?;

        let major = resolve_major_version(package_info.version.as_deref(), options.tailwind.version);
        let store = CacheStore::new(&options.cache.dir, &options.cache.file);

        Ok(Self {
            options,
            runtime,
            package_info,
            major,
            store,
            built: false,
        })
    }

    pub fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    pub fn package_info(&self) -> &PackageInfo {
        &self.package_info
    }

    pub fn major_version(&self) -> MajorVersion {
        self.major
    }

    pub fn cache_store(&self) -> &CacheStore {
        &self.store
    }

    /// Apply the version-specific source patches to the installed package.
    pub async fn patch(&self) -> Result<()> {
        let request = PatchRequest {
            package_info: &self.package_info,
            options: &self.options,
            major_version: self.major,
        };
        self.runtime.apply_patches(&request).await
    }

    /// Collect the current class set, reconciled with the persisted cache.
    ///
    /// v2/v3 run the framework build once per patcher instance, then read the
    /// execution contexts; v4 drives the build pipeline. The universal
    /// selector `*` is dropped unless `removeUniversalSelector` is disabled.
    pub async fn get_class_set(&mut self) -> Result<ClassSet> {
        let filter = ClassFilter::compile(&self.options.filter)?;

        let mut observed = if self.major.is_legacy() {
            if !self.built {
                let request = legacy::resolve_exec_options(&self.options, self.major);
                self.runtime.run_build(&request).await?;
                self.built = true;
            }
            let contexts = self.runtime.load_contexts(
                &self.package_info,
                self.major,
                self.options.features.expose_context,
            )?;
            legacy::collect_from_contexts(&contexts, &filter)
        } else {
            pipeline::collect_v4(&self.runtime, &self.package_info, &self.options, &filter).await?
        };

        if self.options.output.remove_universal_selector {
            observed.remove("*");
        }

        if !self.options.cache.enabled {
            return Ok(observed);
        }
        collector::reconcile(&self.store, self.options.cache.strategy, observed).await
    }

    /// Synchronous class collection. Never triggers a build; reads whatever
    /// the execution contexts currently hold. v4 has no sync path.
    pub fn get_class_set_sync(&self) -> Result<ClassSet> {
        if !self.major.is_legacy() {
            return Err(PatchError::UnsupportedOperation {
                major: self.major.as_u32(),
            }
            .into());
        }

        let filter = ClassFilter::compile(&self.options.filter)?;
        let contexts = self.runtime.load_contexts(
            &self.package_info,
            self.major,
            self.options.features.expose_context,
        )?;
        let mut observed = legacy::collect_from_contexts(&contexts, &filter);
        if self.options.output.remove_universal_selector {
            observed.remove("*");
        }

        if !self.options.cache.enabled {
            return Ok(observed);
        }
        collector::reconcile_sync(&self.store, self.options.cache.strategy, observed)
    }

    /// Collect classes and optionally persist them to the configured output
    /// file. `write` overrides the configured `output.enabled` default.
    pub async fn extract(&mut self, write: Option<bool>) -> Result<ExtractResult> {
        let classes = self.get_class_set().await?;
        let should_write = write.unwrap_or(self.options.output.enabled);
        if !should_write {
            return Ok(ExtractResult::from_set(classes, None));
        }

        let content = render_class_list(&classes, self.options.output.format, self.options.output.pretty)?;
        write_replacing(&self.options.output.file, &content)?;
        Ok(ExtractResult::from_set(
            classes,
            Some(self.options.output.file.clone()),
        ))
    }

    /// Scan project content for candidate tokens. `cwd` defaults to the
    /// project root; empty `sources` trigger the default ignore-aware walk.
    pub fn collect_content_tokens(
        &self,
        cwd: Option<&Path>,
        sources: &[String],
    ) -> TailwindTokenReport {
        let cwd = cwd.unwrap_or(&self.options.project_root);
        extract_tokens(cwd, sources, self.options.features.extended_length_units)
    }

    /// Like [`collect_content_tokens`], grouped into a per-file map.
    pub fn collect_content_tokens_by_file(
        &self,
        cwd: Option<&Path>,
        sources: &[String],
        key: FileKey,
        strip_absolute: bool,
    ) -> TokensByFile {
        let cwd = cwd.unwrap_or(&self.options.project_root).to_path_buf();
        let report = self.collect_content_tokens(Some(&cwd), sources);
        group_tokens_by_file(&report, key, strip_absolute, &cwd)
    }
}

/// Serialize a class set in the configured output format.
fn render_class_list(classes: &ClassSet, format: OutputFormat, pretty: usize) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let list: Vec<&String> = classes.iter().collect();
            let mut content = to_json_with_indent(&list, pretty)?;
            content.push('\n');
            Ok(content)
        }
        OutputFormat::Lines => {
            let mut content = String::new();
            for class in classes {
                content.push_str(class);
                content.push('\n');
            }
            Ok(content)
        }
    }
}

/// The patcher the CLI uses: backed by the Node runtime.
pub type NodePatcher = TailwindPatcher<crate::runtime::node::NodeRuntime>;
