//! Token extraction, grouping and rendering.

pub mod extract;
pub mod group;
pub mod render;

pub use extract::extract_tokens;
pub use group::{group_tokens_by_file, FileKey};
pub use render::{render_report, TokensFormat};
