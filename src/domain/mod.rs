//! Domain logic - pure release rules independent of git and the filesystem

pub mod bump;
pub mod commit;
pub mod history;
pub mod version;

pub use commit::CommitInfo;
pub use history::HistoryOptions;
pub use version::{next_version, parse_tag_version, ReleaseType};
