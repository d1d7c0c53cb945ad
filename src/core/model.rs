//! Core data model
//!
//! The position-addressable token records produced by the extractor and the
//! result shapes returned by the orchestrator. Everything here is plain data;
//! it serializes directly to the machine-readable CLI output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A set of class-name strings. BTreeSet keeps persisted and printed output
/// deterministic without a separate sort step.
pub type ClassSet = BTreeSet<String>;

/// One detected candidate occurrence in project source content.
///
/// Offsets are 0-based byte positions into the original file content; line
/// and column are 1-based, with column counted in bytes from the line start.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLocation {
    /// Absolute path, '/'-normalized.
    pub file: String,

    /// Path relative to the scan cwd, '/'-normalized.
    pub relative_file: String,

    /// 1-based line number.
    pub line: u32,

    /// 1-based column (bytes from line start).
    pub column: u32,

    /// 0-based byte offset of the candidate start.
    pub start: usize,

    /// 0-based byte offset one past the candidate end.
    pub end: usize,

    /// The candidate text exactly as it appears in the source.
    pub raw_candidate: String,
}

/// A file the scanner could not process, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// The full result of one token extraction run. Not cached; recomputed per
/// call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailwindTokenReport {
    pub entries: Vec<TokenLocation>,
    pub files_scanned: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_files: Vec<SkippedFile>,
}

impl TailwindTokenReport {
    /// Sort entries by file then start offset for stable output.
    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.start.cmp(&b.start)));
    }
}

/// Result of an `extract` run.
#[derive(Debug, Clone)]
pub struct ExtractResult {
    /// The class set in deterministic order.
    pub class_list: Vec<String>,

    /// The same classes as a set.
    pub class_set: ClassSet,

    /// The output file, when the result was persisted.
    pub filename: Option<PathBuf>,
}

impl ExtractResult {
    pub fn from_set(class_set: ClassSet, filename: Option<PathBuf>) -> Self {
        let class_list = class_set.iter().cloned().collect();
        Self {
            class_list,
            class_set,
            filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(file: &str, start: usize) -> TokenLocation {
        TokenLocation {
            file: file.to_string(),
            relative_file: file.to_string(),
            line: 1,
            column: start as u32 + 1,
            start,
            end: start + 4,
            raw_candidate: "flex".to_string(),
        }
    }

    #[test]
    fn test_report_sort_is_stable_by_file_then_offset() {
        let mut report = TailwindTokenReport {
            entries: vec![token("b.html", 0), token("a.html", 8), token("a.html", 2)],
            files_scanned: 2,
            skipped_files: Vec::new(),
        };
        report.sort();

        let order: Vec<_> = report
            .entries
            .iter()
            .map(|t| (t.file.as_str(), t.start))
            .collect();
        assert_eq!(order, vec![("a.html", 2), ("a.html", 8), ("b.html", 0)]);
    }

    #[test]
    fn test_extract_result_list_matches_set() {
        let set: ClassSet = ["p-4", "flex", "mt-2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = ExtractResult::from_set(set.clone(), None);
        assert_eq!(result.class_list, vec!["flex", "mt-2", "p-4"]);
        assert_eq!(result.class_set, set);
    }

    #[test]
    fn test_token_location_serializes_camel_case() {
        let json = serde_json::to_string(&token("a.html", 0)).unwrap();
        assert!(json.contains("\"relativeFile\""));
        assert!(json.contains("\"rawCandidate\""));
    }

    #[test]
    fn test_empty_skipped_files_are_omitted() {
        let report = TailwindTokenReport::default();
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("skippedFiles"));
    }
}
