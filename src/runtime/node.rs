//! Node-process-backed runtime
//!
//! Drives the installed framework through small driver scripts executed with
//! `node -e`. The legacy build driver runs PostCSS with the framework plugin
//! and dumps the populated execution contexts to a JSON file under the
//! package root; `load_contexts` reads that dump. The v4 driver compiles the
//! configured CSS entries and prints one class name per line.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::core::model::ClassSet;
use crate::core::version::MajorVersion;

use super::package::PackageInfo;
use super::{BuildRequest, PatchRequest, RuntimeContext, TailwindRuntime};

/// File the patched framework writes its contexts to, relative to the
/// package root.
pub const CONTEXTS_DUMP: &str = ".twpatch/contexts.json";

const PATCH_DRIVER_JS: &str = r#"
const [pkgRoot, major] = process.argv.slice(1);
const fs = require('fs');
const path = require('path');
const entry = Number(major) >= 3
  ? path.join(pkgRoot, 'lib', 'plugin.js')
  : path.join(pkgRoot, 'lib', 'index.js');
let src = fs.readFileSync(entry, 'utf8');
if (!src.includes('module.exports.contextRef')) {
  src += '\nmodule.exports.contextRef = { value: [] };\n';
  fs.writeFileSync(entry, src);
}
"#;

const BUILD_DRIVER_JS: &str = r#"
const [cwd, configPath] = process.argv.slice(1);
process.chdir(cwd);
const path = require('path');
const fs = require('fs');
const postcss = require(require.resolve('postcss', { paths: [cwd] }));
const tailwind = require(require.resolve('tailwindcss', { paths: [cwd] }));
const plugin = configPath ? tailwind(configPath) : tailwind();
postcss([plugin])
  .process('@tailwind base;@tailwind components;@tailwind utilities;', { from: undefined })
  .then(() => {
    const contexts = (tailwind.contextRef && tailwind.contextRef.value) || [];
    const out = contexts.map((ctx) => ({
      classes: ctx.getClassList ? ctx.getClassList() : [],
    }));
    const pkgJson = require.resolve('tailwindcss/package.json', { paths: [cwd] });
    const dump = path.join(path.dirname(pkgJson), '.twpatch', 'contexts.json');
    fs.mkdirSync(path.dirname(dump), { recursive: true });
    fs.writeFileSync(dump, JSON.stringify(out));
  })
  .catch((err) => { console.error(err.message); process.exit(1); });
"#;

const V4_PIPELINE_DRIVER_JS: &str = r#"
const [pkgRoot, ...entries] = process.argv.slice(1);
const { __unstable__loadDesignSystem } = require(require.resolve(pkgRoot));
const fs = require('fs');
Promise.all(entries.map(async (entry) => {
  const css = fs.readFileSync(entry, 'utf8');
  const design = await __unstable__loadDesignSystem(css, { base: pkgRoot });
  for (const cls of design.getClassList()) {
    console.log(Array.isArray(cls) ? cls[0] : cls);
  }
})).catch((err) => { console.error(err.message); process.exit(1); });
"#;

/// Runtime implementation that shells out to `node`.
#[derive(Debug, Clone, Default)]
pub struct NodeRuntime {
    /// Node executable; defaults to `node` on PATH.
    node_bin: Option<PathBuf>,
}

impl NodeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_node_bin(node_bin: PathBuf) -> Self {
        Self {
            node_bin: Some(node_bin),
        }
    }

    fn node(&self) -> Command {
        let bin = self
            .node_bin
            .clone()
            .unwrap_or_else(|| PathBuf::from("node"));
        Command::new(bin)
    }

    async fn run_driver(&self, script: &str, args: &[&str], cwd: &Path) -> Result<String> {
        let output = self
            .node()
            .arg("-e")
            .arg(script)
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .context("Failed to spawn node; is Node.js installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "node driver exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TailwindRuntime for NodeRuntime {
    async fn apply_patches(&self, request: &PatchRequest<'_>) -> Result<()> {
        let pkg_root = request.package_info.root.to_string_lossy().into_owned();
        let major = request.major_version.to_string();
        self.run_driver(
            PATCH_DRIVER_JS,
            &[&pkg_root, &major],
            &request.options.project_root,
        )
        .await?;
        Ok(())
    }

    async fn run_build(&self, request: &BuildRequest) -> Result<()> {
        if !request.major_version.is_legacy() {
            bail!("run_build is only defined for tailwindcss v2/v3");
        }

        let cwd = request.cwd.to_string_lossy().into_owned();
        let config = request
            .config
            .as_ref()
            .map(|c| c.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.run_driver(BUILD_DRIVER_JS, &[&cwd, &config], &request.cwd)
            .await?;
        Ok(())
    }

    fn load_contexts(
        &self,
        package_info: &PackageInfo,
        major_version: MajorVersion,
        expose_inner: bool,
    ) -> Result<Vec<RuntimeContext>> {
        if !major_version.is_legacy() {
            bail!("execution contexts are only defined for tailwindcss v2/v3");
        }

        let dump = package_info.root.join(CONTEXTS_DUMP);
        let raw = match fs::read_to_string(&dump) {
            Ok(raw) => raw,
            // No dump yet: the build has not produced contexts in this tree.
            Err(_) => return Ok(Vec::new()),
        };

        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed contexts dump: {}", dump.display()))?;

        Ok(values
            .into_iter()
            .map(|value| {
                let classes = value
                    .get("classes")
                    .and_then(|c| c.as_array())
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                RuntimeContext {
                    classes,
                    inner: if expose_inner { Some(value) } else { None },
                }
            })
            .collect())
    }

    async fn run_v4_pipeline(
        &self,
        package_info: &PackageInfo,
        css_entries: &[PathBuf],
    ) -> Result<ClassSet> {
        let pkg_root = package_info.root.to_string_lossy().into_owned();
        let mut args: Vec<String> = vec![pkg_root];
        args.extend(
            css_entries
                .iter()
                .map(|e| e.to_string_lossy().into_owned()),
        );
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        let stdout = self
            .run_driver(V4_PIPELINE_DRIVER_JS, &arg_refs, &package_info.root)
            .await?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
