/// REST client for the GitHub v3 API.
pub mod client;

pub use client::GitHubClient;

use std::fmt::{Display, Formatter};

use time::OffsetDateTime;

use crate::{AppError, AppResult};
use crate::digest::CommitRecord;

/// A repository the authenticated user can read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Filters for a commit listing.
#[derive(Debug, Clone)]
pub struct CommitQuery {
    pub author: String,
    pub since: OffsetDateTime,
    pub until: OffsetDateTime,
}

/// Result of fetching one repository's commits.
///
/// A failed fetch never aborts the run; it is kept as `Tolerated` so logs and
/// tests can tell it apart from a repository that simply had no commits.
#[derive(Debug)]
pub enum CommitFetch {
    Fetched(Vec<CommitRecord>),
    Tolerated(AppError),
}

impl CommitFetch {
    pub fn into_records(self) -> Vec<CommitRecord> {
        match self {
            CommitFetch::Fetched(records) => records,
            CommitFetch::Tolerated(_) => Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn is_tolerated(&self) -> bool {
        matches!(self, CommitFetch::Tolerated(_))
    }
}

impl From<AppResult<Vec<CommitRecord>>> for CommitFetch {
    fn from(result: AppResult<Vec<CommitRecord>>) -> Self {
        match result {
            Ok(records) => CommitFetch::Fetched(records),
            Err(e) => CommitFetch::Tolerated(e),
        }
    }
}

/// Source of repositories and their commits.
pub trait CommitSource {
    /// Repositories pushed to at or after `pushed_since`, most recently pushed first.
    async fn list_active_repositories(&self, pushed_since: OffsetDateTime)
    -> AppResult<Vec<RepoRef>>;

    /// Commits in `repo` matching `query`, in the order the API returns them.
    async fn list_commits(&self, repo: &RepoRef, query: &CommitQuery) -> CommitFetch;
}
