use crate::domain::parse_tag_version;
use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, SyncStatus, TaggedVersion};
use git2::{BranchType, CredentialType, ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let mut attempts = CredentialAttempts::new(dirs::home_dir().map(|h| h.join(".ssh")));
        let mut callbacks = git2::RemoteCallbacks::new();

        // libgit2 calls back after every rejected credential; each source is offered once
        callbacks.credentials(move |url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            while let Some(source) = attempts.next(allowed_types) {
                let cred = match &source {
                    CredentialSource::Username => git2::Cred::username(username),
                    CredentialSource::KeyFile(path) => {
                        git2::Cred::ssh_key(username, None, path, None)
                    }
                    CredentialSource::Agent => git2::Cred::ssh_key_from_agent(username),
                    CredentialSource::Helper => self
                        .repo
                        .config()
                        .and_then(|config| {
                            git2::Cred::credential_helper(&config, url, username_from_url)
                        }),
                    CredentialSource::Default => git2::Cred::default(),
                };

                match cred {
                    Ok(cred) => {
                        log::debug!("Trying {:?} credentials for {}", source, url);
                        return Ok(cred);
                    }
                    Err(e) => log::debug!("No {:?} credentials: {}", source, e),
                }
            }

            Err(git2::Error::from_str(&format!(
                "No usable credentials left for {}",
                url
            )))
        });
        callbacks
    }
}

/// Where a fetch credential comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum CredentialSource {
    Username,
    KeyFile(PathBuf),
    Agent,
    Helper,
    Default,
}

const SSH_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

/// Hands out each credential source at most once, key files before the agent.
#[derive(Debug)]
struct CredentialAttempts {
    ssh_dir: Option<PathBuf>,
    tried: Vec<CredentialSource>,
}

impl CredentialAttempts {
    fn new(ssh_dir: Option<PathBuf>) -> Self {
        CredentialAttempts {
            ssh_dir,
            tried: Vec::new(),
        }
    }

    fn sources(&self, allowed: CredentialType) -> Vec<CredentialSource> {
        let mut sources = Vec::new();

        if allowed.contains(CredentialType::USERNAME) {
            sources.push(CredentialSource::Username);
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            if let Some(dir) = &self.ssh_dir {
                sources.extend(
                    SSH_KEY_NAMES
                        .iter()
                        .map(|name| dir.join(name))
                        .filter(|path| path.exists())
                        .map(CredentialSource::KeyFile),
                );
            }
            sources.push(CredentialSource::Agent);
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            sources.push(CredentialSource::Helper);
        }

        if allowed.contains(CredentialType::DEFAULT) {
            sources.push(CredentialSource::Default);
        }

        sources
    }

    fn next(&mut self, allowed: CredentialType) -> Option<CredentialSource> {
        let source = self
            .sources(allowed)
            .into_iter()
            .find(|source| !self.tried.contains(source))?;
        self.tried.push(source.clone());
        Some(source)
    }
}

impl super::Repository for Git2Repository {
    fn fetch(&self, remote: &str) -> Result<()> {
        let mut remote_handle = self.repo.find_remote(remote).map_err(|e| {
            ReleaseError::branch_sync(format!("Cannot find remote '{}': {}", remote, e))
        })?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(self.remote_callbacks());
        // Only remote-tracking branches are updated; local tags stay as they are
        fetch_options.download_tags(git2::AutotagOption::None);

        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        remote_handle
            .fetch(&[refspec_heads.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| {
                ReleaseError::branch_sync(format!("Failed to fetch from '{}': {}", remote, e))
            })?;

        log::debug!("Fetched branches from {}", remote);
        Ok(())
    }

    fn sync_status(&self, branch: &str, remote: &str) -> Result<SyncStatus> {
        let local_oid = self
            .repo
            .find_branch(branch, BranchType::Local)
            .map_err(|e| {
                ReleaseError::branch_sync(format!("Cannot find branch '{}': {}", branch, e))
            })?
            .get()
            .target()
            .ok_or_else(|| ReleaseError::branch_sync(format!("Branch '{}' has no target", branch)))?;

        let remote_ref = format!("refs/remotes/{}/{}", remote, branch);
        let remote_oid = match self.repo.find_reference(&remote_ref) {
            Ok(reference) => match reference.target() {
                Some(oid) => oid,
                None => return Ok(SyncStatus::NoUpstream),
            },
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(SyncStatus::NoUpstream),
            Err(e) => return Err(e.into()),
        };

        let (ahead, behind) = self.repo.graph_ahead_behind(local_oid, remote_oid)?;
        Ok(SyncStatus::from_counts(ahead, behind))
    }

    fn latest_version_tag(&self) -> Result<Option<TaggedVersion>> {
        let tags = self.repo.tag_names(None)?;
        let mut latest: Option<TaggedVersion> = None;

        for tag_name in tags.iter().flatten() {
            let Some(version) = parse_tag_version(tag_name) else {
                continue;
            };

            if latest.as_ref().is_some_and(|l| l.version >= version) {
                continue;
            }

            // Annotated tags peel through the tag object to the commit
            let commit = self
                .repo
                .find_reference(&format!("refs/tags/{}", tag_name))
                .and_then(|r| r.peel_to_commit());

            match commit {
                Ok(commit) => {
                    latest = Some(TaggedVersion {
                        version,
                        tag: tag_name.to_string(),
                        hash: commit.id().to_string(),
                    });
                }
                Err(e) => log::warn!("Skipping tag '{}': {}", tag_name, e),
            }
        }

        Ok(latest)
    }

    fn commits_since(&self, since: Option<&str>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(hash) = since {
            revwalk.hide(Oid::from_str(hash)?)?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let message = commit.message().unwrap_or("(empty message)").to_string();
            let author = commit.author().name().unwrap_or("unknown").to_string();

            commits.push(CommitInfo::new(oid.to_string(), message, author));
        }

        Ok(commits)
    }
}
