//! Main release workflow orchestration logic
//!
//! The workflow is one strictly sequential pass; the first failing step
//! aborts everything after it. Nothing already done is rolled back: a
//! started release branch or bumped version files stay as they are for the
//! user to clean up.

use std::path::Path;

use semver::Version;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::history::{render_history, HistoryOptions};
use crate::domain::{next_version, ReleaseType};
use crate::error::{ReleaseError, Result};
use crate::files;
use crate::git::{Repository, SyncStatus, TaggedVersion};
use crate::shell::{CommandRunner, Invocation};
use crate::ui::{self, Prompter};

/// Tag message used when none is given
pub const DEFAULT_TAG_MESSAGE: &str = "Release";

pub const PUSH_PROMPT: &str = "Push all branches and tags?";
pub const PUBLISH_PROMPT: &str = "Publish the new version?";

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Release type given up front; prompts when `None`
    pub release_type: Option<ReleaseType>,

    /// Message for the release tag
    pub tag_message: Option<String>,

    /// Never ask to publish and never publish
    pub skip_publish: bool,

    /// Leave files untouched and skip confirmations
    pub dry_run: bool,

    /// Date printed in the history block
    pub release_date: String,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub previous_version: Version,
    pub new_version: Version,
    pub history_updated: bool,
    pub built: bool,
    pub pushed: bool,
    pub published: bool,
}

/// Builds the release commit message.
///
/// ```text
/// bumped version(s); updated History.md; updated build;
/// ```
pub fn commit_message(history_file: Option<&Path>, built: bool) -> String {
    let mut message = String::from("bumped version(s);");

    if let Some(path) = history_file {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        message.push_str(&format!(" updated {};", name));
    }

    if built {
        message.push_str(" updated build;");
    }

    message
}

/// Fails unless every release branch matches its remote-tracking branch.
pub fn ensure_branches_up_to_date<R: Repository>(repo: &R, config: &Config) -> Result<()> {
    let remote = &config.branches.remote;
    repo.fetch(remote)?;

    for branch in config.branches.release_branches() {
        match repo.sync_status(branch, remote)? {
            SyncStatus::UpToDate => {
                log::debug!("{} is up to date with {}/{}", branch, remote, branch);
            }
            SyncStatus::NoUpstream => {
                ui::display_warning(&BoundaryWarning::NoUpstream {
                    branch: branch.to_string(),
                    remote: remote.to_string(),
                });
            }
            status => {
                return Err(ReleaseError::branch_sync(format!(
                    "'{}' is {} relative to '{}/{}'",
                    branch, status, remote, branch
                )));
            }
        }
    }

    Ok(())
}

fn current_version<R: Repository>(repo: &R) -> Result<Option<TaggedVersion>> {
    let latest = repo.latest_version_tag()?;
    if latest.is_none() {
        ui::display_warning(&BoundaryWarning::NoVersionTag);
    }
    Ok(latest)
}

fn update_history<R: Repository>(
    repo: &R,
    history_file: &Path,
    since: Option<&TaggedVersion>,
    options: HistoryOptions,
    dry_run: bool,
) -> Result<()> {
    let commits = repo.commits_since(since.map(|t| t.hash.as_str()))?;

    if commits.is_empty() {
        ui::display_warning(&BoundaryWarning::NoNewCommits {
            since: since.map(|t| t.tag.clone()).unwrap_or_default(),
        });
    } else {
        ui::display_commit_summary(&commits);
    }

    let block = render_history(&commits, &options);

    if dry_run {
        ui::display_history_preview(&block);
        return Ok(());
    }

    files::prepend_to_history_file(history_file, &block)?;
    log::info!(
        "Updated {} with {} commit(s)",
        history_file.display(),
        commits.len()
    );
    ui::display_success(&format!("Updated {}", history_file.display()));
    Ok(())
}

/// Main release workflow
///
/// Orchestrates the entire release:
/// 1. Verify production and develop branches match the remote
/// 2. Read the latest version tag
/// 3. Choose the release type and compute the new version
/// 4. Start the release branch and bump version files
/// 5. Prepend the history block (if configured)
/// 6. Run the build (if configured)
/// 7. Commit and finish the release branch
/// 8. Push and publish, each after confirmation
///
/// # Arguments
///
/// * `args` - Workflow arguments
/// * `config` - Release configuration
/// * `repo` - Read-only repository queries
/// * `runner` - Executes git, build and publish commands
/// * `prompter` - Answers interactive questions
pub fn run_release_workflow<R, C, P>(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    repo: &R,
    runner: &mut C,
    prompter: &mut P,
) -> Result<WorkflowResult>
where
    R: Repository,
    C: CommandRunner,
    P: Prompter,
{
    ui::display_status("Checking that branches are up to date...");
    ensure_branches_up_to_date(repo, config)?;

    let latest = current_version(repo)?;
    let previous_version = latest
        .as_ref()
        .map(|t| t.version.clone())
        .unwrap_or_else(|| Version::new(0, 0, 0));

    let release_type = match args.release_type {
        Some(release_type) => release_type,
        None => prompter.select_release_type(&previous_version)?,
    };
    let new_version = next_version(&previous_version, release_type);
    let version_str = new_version.to_string();

    ui::display_release_plan(
        latest.as_ref().map(|t| t.tag.as_str()),
        &new_version,
        release_type,
    );

    runner.run(&Invocation::git(["flow", "release", "start", version_str.as_str()]))?;
    ui::display_success(&format!("Started release branch for {}", version_str));

    if args.dry_run {
        for path in &config.version_files {
            ui::display_status(&format!("Would bump {} to {}", path.display(), version_str));
        }
    } else {
        let modified = files::bump_version_files(&config.version_files, &version_str)?;
        ui::display_success(&format!("Bumped {} version file(s)", modified.len()));
    }

    let history_file = config.history.file.as_deref();
    if let Some(path) = history_file {
        let options = HistoryOptions {
            include: config.history.include.clone(),
            exclude: config.history.exclude.clone(),
            commit_base_url: config.history.commit_base_url.clone(),
            version: version_str.clone(),
            date: args.release_date.clone(),
        };
        update_history(repo, path, latest.as_ref(), options, args.dry_run)?;
    }

    let built = match config.build_command() {
        Some(command) => {
            ui::display_status("Building...");
            runner.run(&Invocation::shell(command))?;
            ui::display_success("Build finished");
            true
        }
        None => false,
    };

    // `commit -a` skips untracked files, and a first release creates the history file
    if let Some(path) = history_file {
        runner.run(&Invocation::git(["add".to_string(), path.display().to_string()]))?;
    }

    let message = commit_message(history_file, built);
    runner.run(&Invocation::git(["commit", "-am", message.as_str()]))?;

    let tag_message = args
        .tag_message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(DEFAULT_TAG_MESSAGE);
    runner.run(
        &Invocation::git([
            "flow",
            "release",
            "finish",
            "-m",
            tag_message,
            version_str.as_str(),
        ])
        .interactive(),
    )?;
    ui::display_success(&format!("Finished release {}", version_str));

    let mut result = WorkflowResult {
        previous_version,
        new_version,
        history_updated: history_file.is_some(),
        built,
        pushed: false,
        published: false,
    };

    if !args.dry_run && !prompter.confirm(PUSH_PROMPT)? {
        ui::display_status("Skipping push; branches and tags stay local");
        return Ok(result);
    }

    let remote = config.branches.remote.as_str();
    ui::display_status("Pushing branches and tags");
    runner.run(&Invocation::git(["push", remote, "--all"]).interactive())?;
    runner.run(&Invocation::git(["push", remote, "--tags"]).interactive())?;
    result.pushed = !args.dry_run;
    ui::display_success(&format!("Pushed branches and tags to {}", remote));

    if args.skip_publish {
        return Ok(result);
    }

    if !args.dry_run && !prompter.confirm(PUBLISH_PROMPT)? {
        return Ok(result);
    }

    ui::display_status(&format!("Publishing with '{}'", config.publish.command));
    runner.run(&Invocation::shell(config.publish.command.as_str()).interactive())?;
    result.published = !args.dry_run;
    ui::display_success(&format!("Published {}", version_str));

    Ok(result)
}
