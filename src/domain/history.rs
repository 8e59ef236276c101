//! Rendering of the history (changelog) block prepended on every release.

use chrono::{Local, NaiveDate};

use crate::domain::commit::CommitInfo;

/// Line used when every commit in the range was filtered out
pub const NO_CHANGES_LINE: &str = "* No notable changes";

/// Settings for a single history block
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryOptions {
    /// Keep only commits whose message contains one of these (empty keeps all)
    pub include: Vec<String>,
    /// Drop commits whose message contains any of these
    pub exclude: Vec<String>,
    /// Base URL that a commit hash is appended to, e.g. `https://github.com/org/repo/commit`
    pub commit_base_url: Option<String>,
    pub version: String,
    pub date: String,
}

/// Long date used in history headings, e.g. `October 18, 2026`.
pub fn format_release_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Today's date in the local timezone, formatted for a history heading.
pub fn today() -> String {
    format_release_date(Local::now().date_naive())
}

/// Applies the include/exclude message filters, preserving order.
pub fn filter_commits<'a>(
    commits: &'a [CommitInfo],
    include: &[String],
    exclude: &[String],
) -> Vec<&'a CommitInfo> {
    commits
        .iter()
        .filter(|commit| {
            include.is_empty() || include.iter().any(|s| commit.message.contains(s.as_str()))
        })
        .filter(|commit| !exclude.iter().any(|s| commit.message.contains(s.as_str())))
        .collect()
}

fn render_item(commit: &CommitInfo, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) => format!(
            "* {} ([{}]({}/{}))",
            commit.summary,
            commit.short_hash(),
            base.trim_end_matches('/'),
            commit.hash
        ),
        None => format!("* {} ({})", commit.summary, commit.short_hash()),
    }
}

/// Renders the Markdown block for one release.
///
/// ```text
/// ### 1.3.0 / October 18, 2026
///
/// * add login ([abc1234](https://example.com/commit/abc1234...))
/// ```
///
/// Output depends only on the arguments, so rendering the same range twice
/// gives identical bytes.
pub fn render_history(commits: &[CommitInfo], options: &HistoryOptions) -> String {
    let base_url = options
        .commit_base_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());

    let items: Vec<String> = filter_commits(commits, &options.include, &options.exclude)
        .into_iter()
        .map(|commit| render_item(commit, base_url))
        .collect();

    let body = if items.is_empty() {
        NO_CHANGES_LINE.to_string()
    } else {
        items.join("\n")
    };

    format!("### {} / {}\n\n{}", options.version, options.date, body)
}

/// Places `block` in front of the existing history contents.
pub fn prepend_block(existing: &str, block: &str) -> String {
    if existing.is_empty() {
        format!("{}\n", block)
    } else {
        format!("{}\n\n{}", block, existing)
    }
}
