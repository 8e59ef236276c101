/// Commit metadata used for history generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// First line of the commit message
    pub summary: String,
    /// The complete commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

impl CommitInfo {
    /// Builds commit info from a full message, deriving the summary line.
    pub fn new(hash: impl Into<String>, message: impl Into<String>, author: impl Into<String>) -> Self {
        let message = message.into();
        let summary = message.lines().next().unwrap_or("").trim().to_string();

        CommitInfo {
            hash: hash.into(),
            summary,
            message,
            author: author.into(),
        }
    }

    /// Abbreviated 7-character hash
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(7) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }
}
