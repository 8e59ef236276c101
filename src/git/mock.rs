use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository, SyncStatus, TaggedVersion};
use std::cell::RefCell;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    sync: HashMap<String, SyncStatus>,
    latest: Option<TaggedVersion>,
    commits: Vec<CommitInfo>,
    fail_fetch: bool,
    fetched: RefCell<Vec<String>>,
    requested_ranges: RefCell<Vec<Option<String>>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            sync: HashMap::new(),
            latest: None,
            commits: Vec::new(),
            fail_fetch: false,
            fetched: RefCell::new(Vec::new()),
            requested_ranges: RefCell::new(Vec::new()),
        }
    }

    /// Set the sync status reported for a local branch
    pub fn set_sync_status(&mut self, branch: impl Into<String>, status: SyncStatus) {
        self.sync.insert(branch.into(), status);
    }

    /// Set the latest version tag
    pub fn set_latest_tag(&mut self, latest: TaggedVersion) {
        self.latest = Some(latest);
    }

    /// Add a commit, newest last
    pub fn add_commit(&mut self, info: CommitInfo) {
        self.commits.push(info);
    }

    /// Make every fetch fail
    pub fn fail_fetch(&mut self) {
        self.fail_fetch = true;
    }

    /// Remotes fetched so far
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    /// `since` arguments passed to [Repository::commits_since] so far
    pub fn requested_ranges(&self) -> Vec<Option<String>> {
        self.requested_ranges.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn fetch(&self, remote: &str) -> Result<()> {
        if self.fail_fetch {
            return Err(ReleaseError::branch_sync(format!(
                "Failed to fetch from '{}'",
                remote
            )));
        }
        self.fetched.borrow_mut().push(remote.to_string());
        Ok(())
    }

    fn sync_status(&self, branch: &str, _remote: &str) -> Result<SyncStatus> {
        self.sync
            .get(branch)
            .copied()
            .ok_or_else(|| ReleaseError::branch_sync(format!("Cannot find branch '{}'", branch)))
    }

    fn latest_version_tag(&self) -> Result<Option<TaggedVersion>> {
        Ok(self.latest.clone())
    }

    fn commits_since(&self, since: Option<&str>) -> Result<Vec<CommitInfo>> {
        self.requested_ranges
            .borrow_mut()
            .push(since.map(str::to_string));
        Ok(self.commits.iter().rev().cloned().collect())
    }
}
