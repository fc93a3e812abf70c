use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tracing::{debug, trace};

use super::{CommitFetch, CommitQuery, CommitSource, RepoRef};
use crate::AppResult;
use crate::digest::CommitRecord;
use crate::serde_helpers::github_datetime;
use crate::time_utils::github_timestamp;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const PER_PAGE: &str = "100";

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    owner: Owner,
    #[serde(default, with = "github_datetime::option")]
    pushed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    #[serde(with = "github_datetime")]
    date: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: Option<Signature>,
    committer: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    commit: CommitDetail,
}

impl CommitResponse {
    fn into_record(self, repo: &str) -> Option<CommitRecord> {
        let CommitDetail {
            message,
            author,
            committer,
        } = self.commit;
        let date = author.or(committer)?.date;
        Some(CommitRecord::new(repo, date, &message))
    }
}

struct Page<T> {
    items: Vec<T>,
    next: Option<String>,
}

/// Thin GitHub REST client that follows `Link` pagination.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new<S: AsRef<str>>(token: &str, api_base: S) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.as_ref().trim_end_matches('/').to_string(),
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<Page<T>> {
        let response = request.send().await?.error_for_status()?;
        let next = next_page_link(response.headers());
        let items = response.json::<Vec<T>>().await?;
        trace!("Fetched page of {} items, next: {:?}", items.len(), next);
        Ok(Page { items, next })
    }

    #[tracing::instrument(level = "debug", skip(self, repo, query), fields(repo = %repo))]
    async fn fetch_commits(&self, repo: &RepoRef, query: &CommitQuery) -> AppResult<Vec<CommitRecord>> {
        let since = github_timestamp(query.since)?;
        let until = github_timestamp(query.until)?;
        let mut request = self
            .http
            .get(format!(
                "{}/repos/{}/{}/commits",
                self.api_base, repo.owner, repo.repo
            ))
            .query(&[
                ("author", query.author.as_str()),
                ("since", since.as_str()),
                ("until", until.as_str()),
                ("per_page", PER_PAGE),
            ]);

        let mut records = Vec::new();
        loop {
            let page: Page<CommitResponse> = self.get_page(request).await?;
            records.extend(
                page.items
                    .into_iter()
                    .filter_map(|c| c.into_record(&repo.repo)),
            );
            match page.next {
                Some(next) => request = self.http.get(next),
                None => break,
            }
        }
        debug!("Found {} commits in {}", records.len(), repo);
        Ok(records)
    }
}

impl CommitSource for GitHubClient {
    #[tracing::instrument(name = "Listing active repositories", level = "info", skip(self))]
    async fn list_active_repositories(
        &self,
        pushed_since: OffsetDateTime,
    ) -> AppResult<Vec<RepoRef>> {
        let mut request = self.http.get(format!("{}/user/repos", self.api_base)).query(&[
            ("visibility", "all"),
            ("sort", "pushed"),
            ("direction", "desc"),
            ("per_page", PER_PAGE),
        ]);

        let mut active = Vec::new();
        loop {
            let page: Page<RepoResponse> = self.get_page(request).await?;
            let (fresh, reached_stale) = select_active(page.items, pushed_since);
            active.extend(fresh);
            // Sorted by push time, so everything after a stale repository is stale too.
            match page.next {
                Some(next) if !reached_stale => request = self.http.get(next),
                _ => break,
            }
        }
        debug!("{} repositories pushed since {}", active.len(), pushed_since);
        Ok(active)
    }

    async fn list_commits(&self, repo: &RepoRef, query: &CommitQuery) -> CommitFetch {
        self.fetch_commits(repo, query).await.into()
    }
}

/// Keep repositories pushed at or after the cutoff. The flag reports whether a
/// repository older than the cutoff was seen.
fn select_active(repos: Vec<RepoResponse>, cutoff: OffsetDateTime) -> (Vec<RepoRef>, bool) {
    let mut reached_stale = false;
    let active = repos
        .into_iter()
        .filter(|r| match r.pushed_at {
            Some(pushed) if pushed >= cutoff => true,
            Some(_) => {
                reached_stale = true;
                false
            }
            None => false,
        })
        .map(|r| RepoRef {
            owner: r.owner.login,
            repo: r.name,
        })
        .collect();
    (active, reached_stale)
}

/// URL of the `rel="next"` entry in a GitHub `Link` header.
fn next_page_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(link)
}

fn parse_next_link(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let url = segments
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;
        segments
            .any(|s| s.trim() == r#"rel="next""#)
            .then(|| url.to_string())
    })
}
