//! Cache store - durable set-of-strings persistence
//!
//! One JSON file at `{dir}/{file}` holding the serialized class set as an
//! array of unique strings. Reads are tolerant: a missing or corrupt file is
//! an empty set, never an error. Writes replace the whole file via a
//! temp-file rename, creating parent directories as needed. The sync and
//! async accessors have identical semantics; only the I/O model differs.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::model::ClassSet;

#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(dir: &Path, file: &str) -> Self {
        Self {
            path: dir.join(file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted set. Missing or unparsable content yields an empty
    /// set.
    pub fn read_sync(&self) -> ClassSet {
        match fs::read_to_string(&self.path) {
            Ok(content) => parse_class_set(&content),
            Err(_) => ClassSet::new(),
        }
    }

    /// Persist exactly the provided set, replacing any prior content.
    pub fn write_sync(&self, set: &ClassSet) -> Result<()> {
        let content = serialize_class_set(set)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache dir: {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write cache file: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace cache file: {}", self.path.display()))?;
        Ok(())
    }

    /// Async variant of [`read_sync`](Self::read_sync).
    pub async fn read(&self) -> ClassSet {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => parse_class_set(&content),
            Err(_) => ClassSet::new(),
        }
    }

    /// Async variant of [`write_sync`](Self::write_sync).
    pub async fn write(&self, set: &ClassSet) -> Result<()> {
        let content = serialize_class_set(set)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache dir: {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write cache file: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace cache file: {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the cache file; absence is not an error.
    pub fn clear_sync(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove cache file: {}", self.path.display()))
            }
        }
    }
}

fn parse_class_set(content: &str) -> ClassSet {
    serde_json::from_str::<Vec<String>>(content)
        .map(|list| list.into_iter().collect())
        .unwrap_or_default()
}

fn serialize_class_set(set: &ClassSet) -> Result<String> {
    // BTreeSet iterates sorted, so the file content is deterministic.
    let list: Vec<&String> = set.iter().collect();
    Ok(serde_json::to_string(&list)?)
}
