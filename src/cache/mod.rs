//! Durable class-set cache
//!
//! - store: JSON-file-backed set-of-strings store with sync and async access

pub mod store;
