//! Core functionality
//!
//! - model: token records, report and result shapes
//! - options: option adapters and normalization
//! - version: major-version resolution
//! - paths: path normalization utilities
//! - util: JSON formatting and replace-write helpers

pub mod model;
pub mod options;
pub mod paths;
pub mod util;
pub mod version;
