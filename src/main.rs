//! twpatch - class extraction and caching for tailwindcss projects
//!
//! twpatch provides:
//! - In-place patching of the installed tailwindcss package
//! - Version-adaptive class collection (v2/v3 contexts, v4 pipeline)
//! - A persistent class cache with merge/overwrite reconciliation
//! - Byte-accurate candidate token scanning over project sources

use anyhow::Result;
use clap::Parser;

mod cache;
mod cli;
mod collector;
mod config;
mod core;
mod error;
mod patcher;
mod runtime;
mod tokens;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
