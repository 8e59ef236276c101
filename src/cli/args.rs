use std::path::PathBuf;

use clap::Parser;

use crate::cli::orchestration::ReleaseWorkflowArgs;
use crate::domain::ReleaseType;

fn parse_release_type(value: &str) -> Result<ReleaseType, String> {
    value.parse::<ReleaseType>().map_err(|e| e.to_string())
}

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "gf-release",
    version,
    about = "Bump versions, update history and finish a git-flow release"
)]
pub struct Args {
    #[arg(
        short = 't',
        long = "type",
        value_name = "patch|minor|major",
        value_parser = parse_release_type,
        help = "Release type; prompts when omitted"
    )]
    pub release_type: Option<ReleaseType>,

    #[arg(short = 'm', long = "message", help = "Message for the release tag")]
    pub tag_message: Option<String>,

    #[arg(short = 'n', long = "no-publish", help = "Skip the publish prompt and never publish")]
    pub no_publish: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    pub dry_run: bool,
}

impl Args {
    /// Converts parsed flags into workflow arguments.
    pub fn into_workflow_args(self, release_date: String) -> ReleaseWorkflowArgs {
        ReleaseWorkflowArgs {
            release_type: self.release_type,
            tag_message: self.tag_message,
            skip_publish: self.no_publish,
            dry_run: self.dry_run,
            release_date,
        }
    }
}
