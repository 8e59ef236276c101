use std::fmt;

/// Warnings that occur at the edges of the release workflow.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Local branch has no remote-tracking counterpart to compare against
    NoUpstream { branch: String, remote: String },
    /// No tag in the repository parses as a semantic version
    NoVersionTag,
    /// No commits between the last release and HEAD
    NoNewCommits { since: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoUpstream { branch, remote } => {
                write!(
                    f,
                    "Branch '{}' has no counterpart on remote '{}', skipping sync check",
                    branch, remote
                )
            }
            BoundaryWarning::NoVersionTag => {
                write!(f, "No version tag found, starting from 0.0.0")
            }
            BoundaryWarning::NoNewCommits { since } => {
                write!(f, "No new commits since '{}'", since)
            }
        }
    }
}
