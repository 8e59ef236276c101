//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;
use semver::Version;

use crate::boundary::BoundaryWarning;
use crate::domain::{CommitInfo, ReleaseType};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change about to be released.
///
/// # Arguments
/// * `previous` - Current version tag, `None` for the first release
/// * `next` - Version being released
/// * `release_type` - The chosen release type
pub fn display_release_plan(previous: Option<&str>, next: &Version, release_type: ReleaseType) {
    println!("\n{}", style(format!("Preparing {} release", release_type)).bold());
    match previous {
        Some(prev) => {
            println!("  From: {}", style(prev).red());
            println!("  To:   {}", style(next).green());
        }
        None => println!("  Initial version: {}", style(next).green()),
    }
}

/// Display the commits that go into the history block.
///
/// Shows up to 10 commit summaries, then a count of the remaining ones.
pub fn display_commit_summary(commits: &[CommitInfo]) {
    println!(
        "\n{}",
        style(format!("{} commit(s) since last release:", commits.len())).underlined()
    );

    for commit in commits.iter().take(10) {
        let summary: String = commit.summary.chars().take(60).collect();
        println!("  {} {}", style(commit.short_hash()).dim(), summary);
    }

    if commits.len() > 10 {
        println!("  ... and {} more commits", commits.len() - 10);
    }
}

/// Display the history block as it would be written.
pub fn display_history_preview(block: &str) {
    println!("\n{}", style("History entry:").bold());
    for line in block.lines() {
        println!("  {}", line);
    }
}
