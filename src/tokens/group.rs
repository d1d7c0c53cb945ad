//! Grouping of token reports into per-file maps.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::core::model::{TailwindTokenReport, TokenLocation};
use crate::core::paths::make_relative;

/// Which path form keys the grouped map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileKey {
    #[default]
    Relative,
    Absolute,
}

impl FromStr for FileKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relative" => Ok(FileKey::Relative),
            "absolute" => Ok(FileKey::Absolute),
            _ => Err(format!(
                "Unknown file key: {}. Valid keys: relative, absolute",
                s
            )),
        }
    }
}

pub type TokensByFile = BTreeMap<String, Vec<TokenLocation>>;

/// Group report entries by file, preserving entry order within each file.
/// With `strip_absolute`, absolute keys are rewritten relative to `cwd`
/// even when `key` is [`FileKey::Absolute`].
pub fn group_tokens_by_file(
    report: &TailwindTokenReport,
    key: FileKey,
    strip_absolute: bool,
    cwd: &Path,
) -> TokensByFile {
    let mut grouped: TokensByFile = BTreeMap::new();

    for entry in &report.entries {
        let map_key = match key {
            FileKey::Relative => entry.relative_file.clone(),
            FileKey::Absolute if strip_absolute => make_relative(Path::new(&entry.file), cwd)
                .unwrap_or_else(|| entry.file.clone()),
            FileKey::Absolute => entry.file.clone(),
        };
        grouped.entry(map_key).or_default().push(entry.clone());
    }

    grouped
}
