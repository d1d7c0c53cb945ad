//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cache::store::CacheStore;
use crate::config;
use crate::core::options::{normalize, OutputFormat, OutputUser, TailwindUser, UserOptions};
use crate::patcher::{NodePatcher, TailwindPatcher};
use crate::runtime::node::NodeRuntime;
use crate::tokens::{extract_tokens, render_report, FileKey, TokensFormat};

/// twpatch - class extraction and caching for tailwindcss projects.
#[derive(Parser, Debug)]
#[command(name = "twpatch")]
#[command(
    author,
    version,
    about,
    long_about = r#"twpatch patches an installed tailwindcss package so its generated class
names become observable, then collects them into a persistent class set.

The installed major version picks the collection strategy automatically:
v2/v3 read the framework's execution contexts after a build, v4 drives the
build pipeline directly. Collected classes are reconciled with a cache under
node_modules/.cache/twpatch and can be written to a project output file.

Configuration is read from twpatch.config.json at the project root; legacy
and unified configuration layouts are accepted and converted.

Examples:
    twpatch patch
    twpatch extract
    twpatch extract --no-write --format lines
    twpatch tokens "src/**/*.vue" --tokens-format by-file
    twpatch init-config
    twpatch cache clear
"#
)]
pub struct Cli {
    /// Project root directory.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Project root directory (defaults to the current directory).\n\n\
The configuration file, the node_modules tree and all relative paths are\n\
resolved against this root."
    )]
    pub root: PathBuf,

    /// Configuration file to use instead of <ROOT>/twpatch.config.json.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Force the tailwindcss major version instead of detecting it.
    #[arg(
        long,
        global = true,
        value_name = "MAJOR",
        long_help = "Force the tailwindcss major version (2, 3 or 4) instead of detecting it\n\
from the installed package. Useful for pre-release installations whose\n\
version string does not parse."
    )]
    pub tailwind_version: Option<u32>,

    /// Quiet mode (minimal output).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patch the installed tailwindcss package in place.
    #[command(
        long_about = "Apply the version-specific source patches to the installed tailwindcss\n\
package so its execution contexts become observable.\n\n\
Patching is idempotent; run it again after reinstalling node_modules.\n\n\
Examples:\n\
  twpatch patch\n\
  twpatch patch --root apps/web\n"
    )]
    Patch,

    /// Collect the class set and write it to the output file.
    #[command(
        long_about = "Run the version-appropriate collection strategy, reconcile the observed\n\
classes with the cache, and write the result to the configured output file.\n\n\
Examples:\n\
  twpatch extract\n\
  twpatch extract --no-write\n\
  twpatch extract --output dist/classes.txt --format lines\n"
    )]
    Extract {
        /// Write the output file even when output is disabled in the config.
        #[arg(long, conflicts_with = "no_write")]
        write: bool,

        /// Print the class set without writing the output file.
        #[arg(long)]
        no_write: bool,

        /// Output file path (overrides the configured one).
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format for the class set (json/lines).
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,

        /// Indent width for JSON output (0 = compact).
        #[arg(long, value_name = "N")]
        pretty: Option<usize>,
    },

    /// Scan project sources for candidate class tokens.
    #[command(
        long_about = "Scan project content for utility-class-shaped tokens and report each\n\
occurrence with its file, line, column and byte offsets.\n\n\
Lines and columns are 1-based; columns and start/end offsets count bytes\n\
against the original file content, so a multi-byte character earlier on a\n\
line shifts the column versus an editor's character column.\n\n\
Without SOURCES the project root is walked, honoring ignore files and\n\
scanning common template and script extensions. Explicit SOURCES are glob\n\
patterns resolved against the root.\n\n\
Examples:\n\
  twpatch tokens\n\
  twpatch tokens \"src/**/*.vue\" \"src/**/*.tsx\"\n\
  twpatch tokens --tokens-format lines\n\
  twpatch tokens --tokens-format by-file --key absolute --strip-absolute\n"
    )]
    Tokens {
        /// Glob patterns selecting the files to scan.
        #[arg(value_name = "SOURCES")]
        sources: Vec<String>,

        /// Report shape (json/by-file/lines).
        #[arg(long, default_value = "json", value_name = "FORMAT")]
        tokens_format: TokensFormat,

        /// Path form used as the by-file map key (relative/absolute).
        #[arg(long, default_value = "relative", value_name = "KEY")]
        key: FileKey,

        /// Rewrite absolute by-file keys relative to the root.
        #[arg(long)]
        strip_absolute: bool,

        /// Indent width for JSON output (0 = compact).
        #[arg(long, default_value_t = 2, value_name = "N")]
        pretty: usize,
    },

    /// Write a starter twpatch.config.json at the project root.
    InitConfig {
        /// Overwrite an existing configuration file.
        #[arg(long)]
        force: bool,
    },

    /// Manage the persisted class cache.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Delete the persisted class set.
    Clear,
}

pub fn run(cli: Cli) -> Result<()> {
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    // init-config must not require a readable config or an installed package.
    if let Commands::InitConfig { force } = &cli.command {
        let path = config::init_config(&root, *force)?;
        if !cli.quiet {
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    let mut user = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_project_config(&root)?,
    };
    if cli.tailwind_version.is_some() {
        user = user.merged(UserOptions {
            tailwind: TailwindUser {
                version: cli.tailwind_version,
                ..Default::default()
            },
            ..Default::default()
        });
    }

    match cli.command {
        Commands::InitConfig { .. } => unreachable!("handled above"),

        Commands::Patch => {
            let patcher = build_patcher(user, &root)?;
            if cli.verbose {
                let info = patcher.package_info();
                eprintln!(
                    "Patching {} {} ({})",
                    info.name,
                    info.version.as_deref().unwrap_or("<unknown>"),
                    patcher.major_version()
                );
            }
            block_on(patcher.patch())??;
            if !cli.quiet {
                println!("Patched {}", patcher.package_info().root.display());
            }
            Ok(())
        }

        Commands::Extract {
            write,
            no_write,
            output,
            format,
            pretty,
        } => {
            user = user.merged(UserOptions {
                output: OutputUser {
                    file: output,
                    format,
                    pretty,
                    ..Default::default()
                },
                ..Default::default()
            });
            let write_override = if write {
                Some(true)
            } else if no_write {
                Some(false)
            } else {
                None
            };

            let mut patcher = build_patcher(user, &root)?;
            let result = block_on(patcher.extract(write_override))??;

            if let Some(file) = &result.filename {
                if !cli.quiet {
                    println!("Wrote {} classes to {}", result.class_list.len(), file.display());
                }
            } else {
                for class in &result.class_list {
                    println!("{}", class);
                }
            }
            Ok(())
        }

        Commands::Tokens {
            sources,
            tokens_format,
            key,
            strip_absolute,
            pretty,
        } => {
            let options = normalize(user, &root);
            let report = extract_tokens(
                &options.project_root,
                &sources,
                options.features.extended_length_units,
            );

            if !cli.quiet {
                for skipped in &report.skipped_files {
                    eprintln!("Skipped {}: {}", skipped.file, skipped.reason);
                }
            }

            let rendered = render_report(
                &report,
                tokens_format,
                key,
                strip_absolute,
                &options.project_root,
                pretty,
            )?;
            print!("{}", rendered);
            if tokens_format != TokensFormat::Lines && !rendered.ends_with('\n') {
                println!();
            }
            Ok(())
        }

        Commands::Cache { action } => match action {
            CacheCommands::Clear => {
                let options = normalize(user, &root);
                let store = CacheStore::new(&options.cache.dir, &options.cache.file);
                store.clear_sync()?;
                if !cli.quiet {
                    println!("Cleared {}", store.path().display());
                }
                Ok(())
            }
        },
    }
}

fn build_patcher(user: UserOptions, root: &std::path::Path) -> Result<NodePatcher> {
    Ok(TailwindPatcher::new(user, root, NodeRuntime::new())?)
}

fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    Ok(runtime.block_on(fut))
}
