//! Typed error taxonomy for the extraction engine
//!
//! Fatal conditions get their own variants so callers (and the CLI) can
//! distinguish configuration mistakes from runtime build failures. Per-file
//! scan problems are not errors at all; they travel as `SkippedFile` data in
//! the token report.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    /// The target tailwind package could not be located. Raised at
    /// construction time; the patcher is unusable after this.
    #[error("tailwind package '{package}' could not be resolved (searched: {searched})")]
    Configuration { package: String, searched: String },

    /// Synchronous class collection was requested against a v4 project.
    /// There is no sync path for the v4 build pipeline; no fallback.
    #[error("synchronous class collection is not supported for tailwindcss v{major}; use the async API")]
    UnsupportedOperation { major: u32 },

    /// The legacy build invocation or the v4 pipeline failed. Not retried:
    /// re-running against a partially built project is not guaranteed safe.
    #[error("tailwind build failed: {message}")]
    BuildExecution { message: String },
}

impl PatchError {
    pub fn build(err: impl std::fmt::Display) -> Self {
        PatchError::BuildExecution {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operation_names_the_combination() {
        let err = PatchError::UnsupportedOperation { major: 4 };
        let msg = err.to_string();
        assert!(msg.contains("v4"));
        assert!(msg.contains("synchronous"));
    }

    #[test]
    fn test_build_error_carries_cause() {
        let err = PatchError::build("postcss exited with code 1");
        assert!(err.to_string().contains("postcss exited with code 1"));
    }
}
