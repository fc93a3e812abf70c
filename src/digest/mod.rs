/// Line-preserving splitter for size-limited delivery channels.
pub mod chunk;
/// Day bucketing of fetched commits.
pub mod group;
/// Markdown rendering of day buckets.
pub mod render;

pub use chunk::{DEFAULT_CHUNK_SIZE, split};
pub use group::{DayBuckets, group};
pub use render::render;

use time::OffsetDateTime;

/// A single commit as it appears in the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub repository: String,
    pub timestamp: OffsetDateTime,
    pub message_first_line: String,
}

impl CommitRecord {
    /// Build a record, keeping only the first line of `message`.
    pub fn new(
        repository: impl Into<String>,
        timestamp: OffsetDateTime,
        message: &str,
    ) -> Self {
        let first_line = message.split('\n').next().unwrap_or_default();
        Self {
            repository: repository.into(),
            timestamp,
            message_first_line: first_line.trim_end_matches('\r').to_string(),
        }
    }

    /// `[repository] message`
    pub fn entry(&self) -> String {
        format!("[{}] {}", self.repository, self.message_first_line)
    }
}
