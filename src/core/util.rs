//! Common utilities

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serialize a value to JSON with a caller-chosen indent width.
///
/// An indent of 0 produces compact output.
pub fn to_json_with_indent<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }

    let indent_str = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Write a file, replacing any prior content. Parent directories are created
/// as needed; the content lands via a temp-file rename so readers observe
/// either the old or the new content, never a partial write.
pub fn write_replacing(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)
        .with_context(|| format!("Failed to write temp file: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}
