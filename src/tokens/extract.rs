//! Candidate token extraction
//!
//! Scans project source files for utility-class-shaped tokens inside string
//! literals and emits position-addressable records with byte-accurate
//! offsets against the original content. A file that cannot be read or
//! parsed is recorded as skipped and never aborts the scan.

use ignore::WalkBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::model::{SkippedFile, TailwindTokenReport, TokenLocation};
use crate::core::paths::{make_relative, normalize_path};

/// Extensions scanned when no explicit sources are given.
const DEFAULT_EXTENSIONS: &[&str] = &[
    "html", "vue", "jsx", "tsx", "js", "ts", "svelte", "astro",
];

/// Quoted string literals; candidates are only recognized inside these.
/// Backtick templates may span lines, the other quotes may not.
static STRING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`"#)
        .expect("Invalid STRING_RE regex")
});

/// A utility-class-shaped token: optional important leader, variant chain,
/// optional negative prefix, root, dashed segments (including arbitrary
/// values), optional opacity or fraction suffix.
static CANDIDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        !?
        (?:[A-Za-z][\w-]*:)*
        -?
        [a-z][a-z0-9]*
        (?:-(?:\[[^\]\s'\x22`]+\]|[A-Za-z0-9.%]+))*
        (?:/(?:[0-9]{1,3}|\[[^\]\s]+\]))?
        ",
    )
    .expect("Invalid CANDIDATE_RE regex")
});

/// Bare root utilities accepted without a dash, variant or arbitrary value.
static ROOT_UTILITIES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "absolute", "antialiased", "block", "border", "capitalize", "container", "contents",
        "fixed", "flex", "grid", "grow", "hidden", "inline", "invisible", "isolate", "italic",
        "lowercase", "relative", "resize", "rounded", "shadow", "shrink", "static", "sticky",
        "transition", "truncate", "underline", "uppercase", "visible",
    ]
    .into_iter()
    .collect()
});

/// Numeric arbitrary values must use a recognized length unit.
const LENGTH_UNITS: &[&str] = &[
    "px", "rem", "em", "vh", "vw", "vmin", "vmax", "pt", "pc", "in", "cm", "mm", "ex", "ch",
    "fr", "s", "ms", "deg", "%",
];

/// Additional units accepted when the extended-length-units feature is on
/// (mini-program and legacy viewport units).
const EXTENDED_LENGTH_UNITS: &[&str] = &["rpx", "upx", "vm"];

/// Decide whether a regex match is worth reporting as a candidate.
fn looks_like_utility(token: &str, extended_units: bool) -> bool {
    // Bare words are prose unless they name a known root utility.
    let shaped = token.contains('-') || token.contains(':') || token.contains('[');
    if !shaped && !ROOT_UTILITIES.contains(token) {
        return false;
    }

    // Reject pure numeric tokens the grammar lets through via segments.
    if token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return false;
    }

    // Validate numeric arbitrary values against the unit set.
    if let Some(open) = token.find('[') {
        if let Some(close) = token[open..].find(']') {
            let value = &token[open + 1..open + close];
            if !arbitrary_value_ok(value, extended_units) {
                return false;
            }
        }
    }

    true
}

fn arbitrary_value_ok(value: &str, extended_units: bool) -> bool {
    let Some(unit_start) = value.find(|c: char| c.is_ascii_alphabetic() || c == '%') else {
        // Bare numbers and anything non-numeric (colors, calc(), vars).
        return true;
    };
    let number = value[..unit_start].trim_start_matches('-');
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        // Not a plain <number><unit> form; let it through.
        return true;
    }

    let unit = &value[unit_start..];
    LENGTH_UNITS.contains(&unit) || (extended_units && EXTENDED_LENGTH_UNITS.contains(&unit))
}

/// Recognize candidates in file content. Returns (start, end, text) with
/// 0-based byte offsets into the original content.
pub fn extract_candidates(content: &str, extended_units: bool) -> Vec<(usize, usize, String)> {
    let mut found = Vec::new();

    for literal in STRING_RE.find_iter(content) {
        let inner_start = literal.start() + 1;
        let inner_end = literal.end().saturating_sub(1);
        if inner_start >= inner_end {
            continue;
        }
        let inner = &content[inner_start..inner_end];

        for m in CANDIDATE_RE.find_iter(inner) {
            let token = m.as_str();
            if looks_like_utility(token, extended_units) {
                found.push((inner_start + m.start(), inner_start + m.end(), token.to_string()));
            }
        }
    }

    found
}

/// Byte offsets where each line begins.
fn line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

/// Scan the files selected by `sources` (glob entries, or a default
/// gitignore-aware walk when empty) and build a token report.
pub fn extract_tokens(cwd: &Path, sources: &[String], extended_units: bool) -> TailwindTokenReport {
    let mut report = TailwindTokenReport::default();
    let files = resolve_files(cwd, sources, &mut report.skipped_files);

    for file in files {
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                report.skipped_files.push(SkippedFile {
                    file: normalize_path(&file),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        report.files_scanned += 1;
        let starts = line_starts(&content);
        let absolute = normalize_path(&file);
        let relative = make_relative(&file, cwd).unwrap_or_else(|| absolute.clone());

        for (start, end, raw) in extract_candidates(&content, extended_units) {
            let line_idx = starts.partition_point(|&s| s <= start);
            let line_start = starts[line_idx - 1];
            report.entries.push(TokenLocation {
                file: absolute.clone(),
                relative_file: relative.clone(),
                line: line_idx as u32,
                column: (start - line_start) as u32 + 1,
                start,
                end,
                raw_candidate: raw,
            });
        }
    }

    report.sort();
    report
}

/// Resolve the file list for a scan. Explicit glob entries bypass ignore
/// rules (they are explicit caller intent); the default walk respects them.
fn resolve_files(cwd: &Path, sources: &[String], skipped: &mut Vec<SkippedFile>) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();

    if sources.is_empty() {
        for entry in WalkBuilder::new(cwd).build().flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| DEFAULT_EXTENSIONS.contains(&e))
                .unwrap_or(false);
            if matches_ext {
                files.insert(path.to_path_buf());
            }
        }
        return files.into_iter().collect();
    }

    for source in sources {
        let pattern = if Path::new(source).is_absolute() {
            source.clone()
        } else {
            normalize_path(&cwd.join(source))
        };

        let entries = match glob::glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                skipped.push(SkippedFile {
                    file: source.clone(),
                    reason: format!("invalid glob pattern: {}", e),
                });
                continue;
            }
        };

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(path);
                }
                Ok(_) => {}
                Err(e) => {
                    skipped.push(SkippedFile {
                        file: source.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    files.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_candidates_only_inside_string_literals() {
        let content = r#"const a = "flex p-4"; // flex outside strings is ignored"#;
        let found = extract_candidates(content, false);
        let tokens: Vec<_> = found.iter().map(|(_, _, t)| t.as_str()).collect();
        assert_eq!(tokens, vec!["flex", "p-4"]);
    }

    #[test]
    fn test_offsets_are_byte_accurate() {
        let content = r#"<div class="mt-2"></div>"#;
        let found = extract_candidates(content, false);
        assert_eq!(found.len(), 1);
        let (start, end, raw) = &found[0];
        assert_eq!(&content[*start..*end], "mt-2");
        assert_eq!(raw, "mt-2");
    }

    #[test]
    fn test_variants_arbitrary_values_and_fractions() {
        let content = r#"cls = "hover:bg-red-500 md:w-1/2 w-[32px] !mt-4 -mx-2""#;
        let found = extract_candidates(content, false);
        let tokens: Vec<_> = found.iter().map(|(_, _, t)| t.as_str()).collect();
        assert!(tokens.contains(&"hover:bg-red-500"));
        assert!(tokens.contains(&"md:w-1/2"));
        assert!(tokens.contains(&"w-[32px]"));
        assert!(tokens.contains(&"!mt-4"));
        assert!(tokens.contains(&"-mx-2"));
    }

    #[test]
    fn test_prose_words_are_not_candidates() {
        let content = r#"msg = "hello beautiful world""#;
        assert!(extract_candidates(content, false).is_empty());
    }

    #[test]
    fn test_extended_units_gate_arbitrary_values() {
        let content = r#"cls = "w-[750rpx]""#;
        assert!(extract_candidates(content, false).is_empty());
        let found = extract_candidates(content, true);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].2, "w-[750rpx]");
    }

    #[test]
    fn test_template_literals_span_lines() {
        let content = "const s = `flex\np-4`";
        let found = extract_candidates(content, false);
        let tokens: Vec<_> = found.iter().map(|(_, _, t)| t.as_str()).collect();
        assert_eq!(tokens, vec!["flex", "p-4"]);
    }

    #[test]
    fn test_extract_tokens_positions() {
        let temp = tempdir().unwrap();
        write_file(
            &temp.path().join("app.vue"),
            "<template>\n  <div class=\"flex p-4\"></div>\n</template>\n",
        );

        let report = extract_tokens(temp.path(), &[], false);
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.entries.len(), 2);

        let flex = &report.entries[0];
        assert_eq!(flex.raw_candidate, "flex");
        assert_eq!(flex.line, 2);
        assert_eq!(flex.column, 15);
        assert_eq!(flex.relative_file, "app.vue");
        assert!(flex.file.ends_with("app.vue"));

        let p4 = &report.entries[1];
        assert_eq!(p4.raw_candidate, "p-4");
        assert_eq!(p4.line, 2);
        assert_eq!(p4.column, 20);
    }

    #[test]
    fn test_bad_file_is_skipped_not_fatal() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("good.html"), r#"<a class="p-4"></a>"#);
        fs::write(temp.path().join("bad.html"), [0xff, 0xfe, 0x00]).unwrap();

        let report = extract_tokens(temp.path(), &[], false);
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.skipped_files.len(), 1);
        assert!(report.skipped_files[0].file.ends_with("bad.html"));
        assert!(!report.skipped_files[0].reason.is_empty());
        assert_eq!(report.entries.len(), 1);
    }

    #[test]
    fn test_explicit_glob_sources() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("src/a.html"), r#"<a class="p-1"></a>"#);
        write_file(&temp.path().join("src/b.txt"), r#"class="p-2""#);
        write_file(&temp.path().join("other/c.html"), r#"<a class="p-3"></a>"#);

        let report = extract_tokens(temp.path(), &["src/**/*.html".to_string()], false);
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].raw_candidate, "p-1");
    }

    #[test]
    fn test_invalid_glob_pattern_is_recorded() {
        let temp = tempdir().unwrap();
        let report = extract_tokens(temp.path(), &["src/[".to_string()], false);
        assert_eq!(report.skipped_files.len(), 1);
        assert!(report.skipped_files[0].reason.contains("glob"));
    }

    #[test]
    fn test_line_starts() {
        assert_eq!(line_starts("ab\ncd\n"), vec![0, 3, 6]);
        assert_eq!(line_starts(""), vec![0]);
    }
}
