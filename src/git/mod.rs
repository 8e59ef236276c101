//! Git inspection abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only git
//! queries a release needs, allowing for a real implementation backed by
//! `git2` and a mock implementation for testing.
//!
//! Mutating steps (git-flow branches, commits, pushes) run through the
//! system `git` binary instead, see [crate::shell].
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

pub use crate::domain::CommitInfo;
use crate::error::Result;
use semver::Version;
use std::fmt;

/// The most recent version tag and the commit it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVersion {
    pub version: Version,
    /// Tag name as it appears in the repository (e.g. `v1.2.3`)
    pub tag: String,
    /// Full hash of the tagged commit
    pub hash: String,
}

/// How a local branch relates to its remote-tracking branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    UpToDate,
    Ahead(usize),
    Behind(usize),
    Diverged { ahead: usize, behind: usize },
    /// No remote-tracking branch exists
    NoUpstream,
}

impl SyncStatus {
    /// Builds a status from ahead/behind commit counts.
    pub fn from_counts(ahead: usize, behind: usize) -> Self {
        match (ahead, behind) {
            (0, 0) => SyncStatus::UpToDate,
            (ahead, 0) => SyncStatus::Ahead(ahead),
            (0, behind) => SyncStatus::Behind(behind),
            (ahead, behind) => SyncStatus::Diverged { ahead, behind },
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::UpToDate => write!(f, "up to date"),
            SyncStatus::Ahead(n) => write!(f, "{} commit(s) ahead", n),
            SyncStatus::Behind(n) => write!(f, "{} commit(s) behind", n),
            SyncStatus::Diverged { ahead, behind } => {
                write!(f, "diverged ({} ahead, {} behind)", ahead, behind)
            }
            SyncStatus::NoUpstream => write!(f, "no upstream"),
        }
    }
}

/// Read-only git queries used by the release workflow
///
/// All methods return [crate::error::Result<T>]; implementations map
/// underlying errors (like `git2::Error`) to [crate::error::ReleaseError].
pub trait Repository {
    /// Fetch branches and tags from a remote so sync checks see its latest state
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Compare a local branch with `<remote>/<branch>`
    ///
    /// # Returns
    /// * `Ok(SyncStatus::NoUpstream)` - If the remote-tracking branch doesn't exist
    /// * `Err` - If the local branch doesn't exist
    fn sync_status(&self, branch: &str, remote: &str) -> Result<SyncStatus>;

    /// Find the highest tag that parses as a semantic version
    ///
    /// # Returns
    /// * `Ok(None)` - If no tag is a version
    fn latest_version_tag(&self) -> Result<Option<TaggedVersion>>;

    /// Commits reachable from HEAD but not from `since`, newest first
    ///
    /// With `since == None` the whole history of HEAD is returned.
    fn commits_since(&self, since: Option<&str>) -> Result<Vec<CommitInfo>>;
}
