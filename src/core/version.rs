//! Major-version resolution
//!
//! Maps an installed tailwindcss version string (plus an optional explicit
//! hint) onto one of the three execution strategies. Exactly three shapes
//! exist, so this is a closed enum rather than open polymorphism.

use semver::Version;

/// The three supported execution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorVersion {
    V2,
    V3,
    V4,
}

impl MajorVersion {
    pub fn as_u32(self) -> u32 {
        match self {
            MajorVersion::V2 => 2,
            MajorVersion::V3 => 3,
            MajorVersion::V4 => 4,
        }
    }

    /// An explicit hint is only honored when it names a known strategy.
    pub fn from_hint(hint: u32) -> Option<Self> {
        match hint {
            2 => Some(MajorVersion::V2),
            3 => Some(MajorVersion::V3),
            4 => Some(MajorVersion::V4),
            _ => None,
        }
    }

    pub fn is_legacy(self) -> bool {
        matches!(self, MajorVersion::V2 | MajorVersion::V3)
    }
}

impl std::fmt::Display for MajorVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Resolve the execution strategy for a project.
///
/// Policy, in order:
/// 1. A valid explicit hint wins verbatim.
/// 2. The installed version string is coerced leniently; major 2 and 3 map
///    directly, every major >= 4 collapses to the v4 strategy.
/// 3. Absent or unparsable versions default to v3.
///
/// Pure; never panics, never errors.
pub fn resolve_major_version(installed: Option<&str>, hint: Option<u32>) -> MajorVersion {
    if let Some(v) = hint.and_then(MajorVersion::from_hint) {
        return v;
    }

    match installed.and_then(coerce_major) {
        Some(2) => MajorVersion::V2,
        Some(3) => MajorVersion::V3,
        Some(n) if n >= 4 => MajorVersion::V4,
        _ => MajorVersion::V3,
    }
}

/// Extract the major component from a possibly-loose version string.
///
/// Tolerates range operators (`^3.4.1`, `~2.2`, `>=4`), a `v` prefix, and
/// partial versions (`3`, `3.1`).
fn coerce_major(raw: &str) -> Option<u64> {
    let trimmed = raw
        .trim()
        .trim_start_matches(['^', '~', '=', '>', '<', 'v', ' ']);

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version.major);
    }

    trimmed
        .split(['.', '-', '+'])
        .next()
        .and_then(|first| first.parse().ok())
}
