//! Rendering of token reports for CLI output.

use anyhow::Result;
use std::path::Path;
use std::str::FromStr;

use crate::core::model::TailwindTokenReport;
use crate::core::util::to_json_with_indent;
use crate::tokens::group::{group_tokens_by_file, FileKey};

/// Output shape for a token report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokensFormat {
    #[default]
    Json,
    ByFile,
    Lines,
}

impl FromStr for TokensFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(TokensFormat::Json),
            "by-file" | "byfile" => Ok(TokensFormat::ByFile),
            "lines" | "text" => Ok(TokensFormat::Lines),
            _ => Err(format!(
                "Unknown tokens format: {}. Valid formats: json, by-file, lines",
                s
            )),
        }
    }
}

/// Render a token report. `key` and `strip_absolute` only affect the
/// by-file shape; the lines shape always uses relative paths.
pub fn render_report(
    report: &TailwindTokenReport,
    format: TokensFormat,
    key: FileKey,
    strip_absolute: bool,
    cwd: &Path,
    indent: usize,
) -> Result<String> {
    match format {
        TokensFormat::Json => to_json_with_indent(report, indent),
        TokensFormat::ByFile => {
            let grouped = group_tokens_by_file(report, key, strip_absolute, cwd);
            to_json_with_indent(&grouped, indent)
        }
        TokensFormat::Lines => {
            let mut out = String::new();
            for entry in &report.entries {
                out.push_str(&format!(
                    "{}:{}:{} {} ({}-{})\n",
                    entry.relative_file,
                    entry.line,
                    entry.column,
                    entry.raw_candidate,
                    entry.start,
                    entry.end
                ));
            }
            Ok(out)
        }
    }
}
