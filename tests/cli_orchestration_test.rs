use std::fs;
use std::path::PathBuf;

use gf_release::cli::orchestration::{PUBLISH_PROMPT, PUSH_PROMPT};
use gf_release::cli::{run_release_workflow, ReleaseWorkflowArgs};
use gf_release::config::Config;
use gf_release::domain::{CommitInfo, ReleaseType};
use gf_release::git::{MockRepository, SyncStatus, TaggedVersion};
use gf_release::shell::RecordingRunner;
use gf_release::ui::ScriptedPrompter;
use gf_release::ReleaseError;
use semver::Version;
use tempfile::TempDir;

const RELEASE_DATE: &str = "October 18, 2026";
const TAG_HASH: &str = "abc123def4567890abc123def4567890abc123de";

fn synced_repo() -> MockRepository {
    let mut repo = MockRepository::new();
    repo.set_sync_status("master", SyncStatus::UpToDate);
    repo.set_sync_status("develop", SyncStatus::UpToDate);
    repo.set_latest_tag(TaggedVersion {
        version: Version::new(1, 2, 3),
        tag: "v1.2.3".to_string(),
        hash: TAG_HASH.to_string(),
    });
    repo.add_commit(CommitInfo::new("1111111aaaa", "feat: add export", "Dev"));
    repo.add_commit(CommitInfo::new(
        "2222222bbbb",
        "Merge branch 'feature/export' into develop",
        "Dev",
    ));
    repo
}

/// Temp dir holding a package.json at 1.2.3 and a config pointing at it
fn workspace() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let package = dir.path().join("package.json");
    fs::write(&package, "{\n  \"name\": \"app\",\n  \"version\": \"1.2.3\"\n}\n").unwrap();

    let mut config = Config::default();
    config.version_files = vec![package];
    (dir, config)
}

fn args(release_type: Option<ReleaseType>) -> ReleaseWorkflowArgs {
    ReleaseWorkflowArgs {
        release_type,
        tag_message: None,
        skip_publish: false,
        dry_run: false,
        release_date: RELEASE_DATE.to_string(),
    }
}

fn package_json(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("package.json")).unwrap()
}

fn history_path(dir: &TempDir) -> PathBuf {
    dir.path().join("History.md")
}

#[test]
fn test_full_minor_release() {
    let (dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new()
        .with_confirmation(true)
        .with_confirmation(true);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Minor)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert_eq!(result.previous_version, Version::new(1, 2, 3));
    assert_eq!(result.new_version, Version::new(1, 3, 0));
    assert!(result.pushed);
    assert!(result.published);
    assert!(!result.built);
    assert!(!result.history_updated);

    let commands = runner.commands();
    assert_eq!(commands.len(), 6, "unexpected commands: {:?}", commands);
    assert_eq!(commands[0], "git flow release start 1.3.0");
    assert_eq!(commands[1], "git commit -am \"bumped version(s);\"");
    assert_eq!(commands[2], "git flow release finish -m Release 1.3.0");
    assert_eq!(commands[3], "git push origin --all");
    assert_eq!(commands[4], "git push origin --tags");
    assert!(commands[5].contains("npm publish"));

    assert!(package_json(&dir).contains("\"version\": \"1.3.0\""));
    assert_eq!(repo.fetched(), vec!["origin".to_string()]);
    assert!(!prompter.was_asked("release type"));
}

#[test]
fn test_release_type_prompted_when_not_given() {
    let (_dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new()
        .with_release_type(ReleaseType::Major)
        .with_confirmation(false);

    let result =
        run_release_workflow(&args(None), &config, &repo, &mut runner, &mut prompter).unwrap();

    assert_eq!(result.new_version, Version::new(2, 0, 0));
    assert!(prompter.was_asked("release type (current: 1.2.3)"));
    assert_eq!(runner.commands()[0], "git flow release start 2.0.0");
}

#[test]
fn test_no_build_command_skips_build_and_commit_clause() {
    let (_dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert!(!result.built);
    let commit = runner
        .commands()
        .iter()
        .find(|c| c.starts_with("git commit"))
        .unwrap();
    assert!(!commit.contains("updated build;"));
    assert_eq!(runner.commands().len(), 3);
}

#[test]
fn test_build_command_runs_before_commit() {
    let (_dir, mut config) = workspace();
    config.build.command = Some("make dist".to_string());
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert!(result.built);
    let commands = runner.commands();
    assert!(commands[1].contains("make dist"));
    assert_eq!(
        commands[2],
        "git commit -am \"bumped version(s); updated build;\""
    );
}

#[test]
fn test_skip_publish_never_prompts_or_publishes() {
    let (_dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(true);

    let mut workflow_args = args(Some(ReleaseType::Patch));
    workflow_args.skip_publish = true;

    let result =
        run_release_workflow(&workflow_args, &config, &repo, &mut runner, &mut prompter).unwrap();

    assert!(result.pushed);
    assert!(!result.published);
    assert!(prompter.was_asked(PUSH_PROMPT));
    assert!(!prompter.was_asked(PUBLISH_PROMPT));
    assert!(!runner.commands().iter().any(|c| c.contains("npm publish")));
}

#[test]
fn test_declined_publish() {
    let (_dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new()
        .with_confirmation(true)
        .with_confirmation(false);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert!(result.pushed);
    assert!(!result.published);
    assert!(prompter.was_asked(PUBLISH_PROMPT));
    assert!(!runner.commands().iter().any(|c| c.contains("npm publish")));
}

#[test]
fn test_declined_push_skips_publish_prompt() {
    let (_dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert!(!result.pushed);
    assert!(!result.published);
    assert!(!runner.ran("git push"));
    assert_eq!(prompter.asked(), &[PUSH_PROMPT.to_string()]);
}

#[test]
fn test_custom_tag_message_and_remote() {
    let (_dir, mut config) = workspace();
    config.branches.remote = "upstream".to_string();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(true);

    let mut workflow_args = args(Some(ReleaseType::Patch));
    workflow_args.tag_message = Some("Spring release".to_string());
    workflow_args.skip_publish = true;

    run_release_workflow(&workflow_args, &config, &repo, &mut runner, &mut prompter).unwrap();

    assert!(runner.ran("git flow release finish -m \"Spring release\" 1.2.4"));
    assert!(runner.ran("git push upstream --all"));
    assert!(runner.ran("git push upstream --tags"));
    assert_eq!(repo.fetched(), vec!["upstream".to_string()]);
}

#[test]
fn test_history_file_prepended() {
    let (dir, mut config) = workspace();
    let history = history_path(&dir);
    fs::write(&history, "### 1.2.3 / June 1, 2026\n\n* older change (0000000)\n").unwrap();

    config.history.file = Some(history.clone());
    config.history.exclude = vec!["Merge branch".to_string()];
    config.history.commit_base_url = Some("https://example.com/c".to_string());

    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Minor)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert!(result.history_updated);
    assert_eq!(
        fs::read_to_string(&history).unwrap(),
        "### 1.3.0 / October 18, 2026\n\n\
         * feat: add export ([1111111](https://example.com/c/1111111aaaa))\n\n\
         ### 1.2.3 / June 1, 2026\n\n\
         * older change (0000000)\n"
    );
    assert_eq!(repo.requested_ranges(), vec![Some(TAG_HASH.to_string())]);
    assert_eq!(runner.commands()[1], format!("git add {}", history.display()));
    assert_eq!(
        runner.commands()[2],
        "git commit -am \"bumped version(s); updated History.md;\""
    );
}

#[test]
fn test_new_history_file_is_staged_before_commit() {
    let (dir, mut config) = workspace();
    let history = history_path(&dir);
    assert!(!history.exists());
    config.history.file = Some(history.clone());

    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert!(history.exists());
    let commands = runner.commands();
    let add = commands
        .iter()
        .position(|c| c == &format!("git add {}", history.display()))
        .expect("history file should be staged");
    let commit = commands
        .iter()
        .position(|c| c.starts_with("git commit"))
        .unwrap();
    assert!(add < commit, "unexpected order: {:?}", commands);
}

#[test]
fn test_no_history_file_stages_nothing() {
    let (_dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert!(!runner.ran("git add"));
}

#[test]
fn test_history_block_identical_across_runs() {
    let mut blocks = Vec::new();

    for _ in 0..2 {
        let (dir, mut config) = workspace();
        config.history.file = Some(history_path(&dir));
        let repo = synced_repo();
        let mut runner = RecordingRunner::new();
        let mut prompter = ScriptedPrompter::new().with_confirmation(false);

        run_release_workflow(
            &args(Some(ReleaseType::Patch)),
            &config,
            &repo,
            &mut runner,
            &mut prompter,
        )
        .unwrap();

        blocks.push(fs::read_to_string(history_path(&dir)).unwrap());
    }

    assert_eq!(blocks[0], blocks[1]);
}

#[test]
fn test_first_release_without_tags() {
    let (dir, mut config) = workspace();
    config.history.file = Some(history_path(&dir));

    let mut repo = MockRepository::new();
    repo.set_sync_status("master", SyncStatus::UpToDate);
    repo.set_sync_status("develop", SyncStatus::UpToDate);
    repo.add_commit(CommitInfo::new("3333333cccc", "Initial commit", "Dev"));

    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Minor)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap();

    assert_eq!(result.previous_version, Version::new(0, 0, 0));
    assert_eq!(result.new_version, Version::new(0, 1, 0));
    assert_eq!(repo.requested_ranges(), vec![None]);
    assert!(fs::read_to_string(history_path(&dir))
        .unwrap()
        .contains("* Initial commit (3333333)"));
}

#[test]
fn test_branch_behind_remote_aborts_before_any_command() {
    let (dir, config) = workspace();
    let mut repo = synced_repo();
    repo.set_sync_status("develop", SyncStatus::Behind(2));

    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new();

    let err = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::BranchSync(_)));
    assert!(err.to_string().contains("develop"));
    assert!(runner.commands().is_empty());
    assert!(package_json(&dir).contains("\"version\": \"1.2.3\""));
}

#[test]
fn test_diverged_and_ahead_branches_abort() {
    for status in [
        SyncStatus::Ahead(1),
        SyncStatus::Diverged { ahead: 1, behind: 1 },
    ] {
        let (_dir, config) = workspace();
        let mut repo = synced_repo();
        repo.set_sync_status("master", status);

        let mut runner = RecordingRunner::new();
        let mut prompter = ScriptedPrompter::new();

        let result = run_release_workflow(
            &args(Some(ReleaseType::Patch)),
            &config,
            &repo,
            &mut runner,
            &mut prompter,
        );
        assert!(result.is_err(), "{:?} should abort", status);
        assert!(runner.commands().is_empty());
    }
}

#[test]
fn test_missing_upstream_only_warns() {
    let (_dir, config) = workspace();
    let mut repo = synced_repo();
    repo.set_sync_status("master", SyncStatus::NoUpstream);

    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new().with_confirmation(false);

    let result = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    );
    assert!(result.is_ok());
}

#[test]
fn test_fetch_failure_aborts() {
    let (_dir, config) = workspace();
    let mut repo = synced_repo();
    repo.fail_fetch();

    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new();

    let result = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    );
    assert!(result.is_err());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_failed_release_start_stops_everything() {
    let (dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new().fail_on("git flow release start");
    let mut prompter = ScriptedPrompter::new();

    let err = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::Command(_)));
    assert_eq!(runner.commands().len(), 1);
    assert!(package_json(&dir).contains("\"version\": \"1.2.3\""));
    assert!(prompter.asked().is_empty());
}

#[test]
fn test_failed_commit_leaves_bumped_files() {
    let (dir, config) = workspace();
    let repo = synced_repo();
    let mut runner = RecordingRunner::new().fail_on("git commit");
    let mut prompter = ScriptedPrompter::new();

    let result = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    );

    assert!(result.is_err());
    assert!(!runner.ran("git flow release finish"));
    assert!(package_json(&dir).contains("\"version\": \"1.2.4\""));
}

#[test]
fn test_missing_version_file_aborts_after_branch_start() {
    let (dir, mut config) = workspace();
    config.version_files.push(dir.path().join("missing.json"));
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new();

    let err = run_release_workflow(
        &args(Some(ReleaseType::Patch)),
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::VersionFile(_)));
    assert_eq!(runner.commands(), &["git flow release start 1.2.4".to_string()]);
}

#[test]
fn test_dry_run_changes_nothing_and_asks_nothing() {
    let (dir, mut config) = workspace();
    config.history.file = Some(history_path(&dir));
    let repo = synced_repo();
    let mut runner = RecordingRunner::new();
    let mut prompter = ScriptedPrompter::new();

    let mut workflow_args = args(Some(ReleaseType::Minor));
    workflow_args.dry_run = true;

    let result =
        run_release_workflow(&workflow_args, &config, &repo, &mut runner, &mut prompter).unwrap();

    assert_eq!(result.new_version, Version::new(1, 3, 0));
    assert!(package_json(&dir).contains("\"version\": \"1.2.3\""));
    assert!(!history_path(&dir).exists());
    assert!(prompter.asked().is_empty());
    assert!(runner.ran("git push origin --all"));
    assert!(runner.commands().iter().any(|c| c.contains("npm publish")));
    assert!(!result.pushed);
    assert!(!result.published);
}
