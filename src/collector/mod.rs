//! Version-dispatched class collection and cache reconciliation
//!
//! - legacy: v2/v3 context-based collection and build option selection
//! - pipeline: v4 build-pipeline collection
//!
//! Reconciliation of an observed set with the persisted cache lives here,
//! next to the collectors that produce the observations. The store itself
//! stays policy-free.

pub mod legacy;
pub mod pipeline;

use anyhow::Result;
use regex::Regex;

use crate::cache::store::CacheStore;
use crate::core::model::ClassSet;
use crate::core::options::{CacheStrategy, FilterOptions};

/// Compiled class filter. Absence of both inputs accepts everything.
#[derive(Debug, Default)]
pub struct ClassFilter {
    prefix: Option<String>,
    pattern: Option<Regex>,
}

impl ClassFilter {
    pub fn compile(filter: &FilterOptions) -> Result<Self> {
        let pattern = match &filter.pattern {
            Some(raw) => Some(Regex::new(raw)?),
            None => None,
        };
        Ok(Self {
            prefix: filter.prefix.clone(),
            pattern,
        })
    }

    #[cfg(test)]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
            pattern: None,
        }
    }

    pub fn accepts(&self, class: &str) -> bool {
        if let Some(prefix) = &self.prefix {
            if !class.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(class) {
                return false;
            }
        }
        true
    }
}

/// Reconcile an observed class set with the persisted cache.
///
/// merge: the union of observed and persisted is written back and returned,
/// even when the observation is empty (monotonic growth).
///
/// overwrite: a non-empty observation replaces the persisted set entirely;
/// an empty observation returns the persisted set unchanged and writes
/// nothing. An empty run is "no signal", not "signal of emptiness".
pub fn reconcile_sync(
    store: &CacheStore,
    strategy: CacheStrategy,
    observed: ClassSet,
) -> Result<ClassSet> {
    match strategy {
        CacheStrategy::Merge => {
            let mut merged = store.read_sync();
            merged.extend(observed);
            store.write_sync(&merged)?;
            Ok(merged)
        }
        CacheStrategy::Overwrite => {
            if observed.is_empty() {
                Ok(store.read_sync())
            } else {
                store.write_sync(&observed)?;
                Ok(observed)
            }
        }
    }
}

/// Async variant of [`reconcile_sync`] with identical semantics.
pub async fn reconcile(
    store: &CacheStore,
    strategy: CacheStrategy,
    observed: ClassSet,
) -> Result<ClassSet> {
    match strategy {
        CacheStrategy::Merge => {
            let mut merged = store.read().await;
            merged.extend(observed);
            store.write(&merged).await?;
            Ok(merged)
        }
        CacheStrategy::Overwrite => {
            if observed.is_empty() {
                Ok(store.read().await)
            } else {
                store.write(&observed).await?;
                Ok(observed)
            }
        }
    }
}
