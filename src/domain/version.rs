use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Kind of release being prepared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
}

impl ReleaseType {
    /// All release types, in the order they are offered to the user
    pub const ALL: [ReleaseType; 3] = [ReleaseType::Patch, ReleaseType::Minor, ReleaseType::Major];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Patch => "patch",
            ReleaseType::Minor => "minor",
            ReleaseType::Major => "major",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "patch" => Ok(ReleaseType::Patch),
            "minor" => Ok(ReleaseType::Minor),
            "major" => Ok(ReleaseType::Major),
            other => Err(ReleaseError::version(format!(
                "Unknown release type '{}' (expected patch, minor or major)",
                other
            ))),
        }
    }
}

/// Computes the version that follows `current` for the given release type.
///
/// A pre-release of the target version is promoted instead of skipped, so
/// `2.0.0-rc.1` + major is `2.0.0` and `1.2.4-beta` + patch is `1.2.4`.
/// Pre-release and build metadata are always cleared.
pub fn next_version(current: &Version, release_type: ReleaseType) -> Version {
    let is_prerelease = !current.pre.is_empty();

    let mut next = match release_type {
        ReleaseType::Major => {
            if current.minor != 0 || current.patch != 0 || !is_prerelease {
                Version::new(current.major + 1, 0, 0)
            } else {
                Version::new(current.major, 0, 0)
            }
        }
        ReleaseType::Minor => {
            if current.patch != 0 || !is_prerelease {
                Version::new(current.major, current.minor + 1, 0)
            } else {
                Version::new(current.major, current.minor, 0)
            }
        }
        ReleaseType::Patch => {
            if is_prerelease {
                Version::new(current.major, current.minor, current.patch)
            } else {
                Version::new(current.major, current.minor, current.patch + 1)
            }
        }
    };

    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;
    next
}

/// Parses a version out of a tag name such as `v1.2.3` or `1.2.3`.
///
/// Returns `None` for tags that are not strict semantic versions.
pub fn parse_tag_version(tag: &str) -> Option<Version> {
    let clean_tag = tag
        .strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag);

    Version::parse(clean_tag).ok()
}
