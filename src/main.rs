use anyhow::{Context, Result};
use clap::Parser;

use gf_release::cli::{run_release_workflow, Args, WorkflowResult};
use gf_release::config;
use gf_release::domain::history;
use gf_release::git::Git2Repository;
use gf_release::shell::{CommandRunner, DryRunRunner, SystemRunner};
use gf_release::ui::{self, TerminalPrompter};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    log::debug!("Using configuration: {:?}", config);

    let repo = Git2Repository::open(".").context("Not in a git repository")?;

    let mut runner: Box<dyn CommandRunner> = if args.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner)
    };
    let mut prompter = TerminalPrompter;

    let workflow_args = args.into_workflow_args(history::today());
    let result = run_release_workflow(
        &workflow_args,
        &config,
        &repo,
        &mut runner,
        &mut prompter,
    )?;

    report(&result, &config.branches.remote, workflow_args.dry_run);
    Ok(())
}

fn report(result: &WorkflowResult, remote: &str, dry_run: bool) {
    let verb = if dry_run { "Would release" } else { "Released" };
    println!(
        "\n{} {} {} (previously {})\n",
        console::style("✓").green(),
        verb,
        result.new_version,
        result.previous_version
    );

    if !result.pushed && !dry_run {
        println!(
            "To push the release later, run:\n  git push {0} --all && git push {0} --tags",
            remote
        );
    }
}
