use std::time::Duration;

use time::OffsetDateTime;
use tracing::{Span, debug, info, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::AppResult;
use crate::ai::Summarizer;
use crate::config::{Config, Mode};
use crate::digest::{CommitRecord, group, render, split};
use crate::github::{CommitFetch, CommitQuery, CommitSource};
use crate::logging::bar_style;
use crate::time_utils::ReportWindow;

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No commits in the window; nothing was rendered or summarized.
    NoActivity,
    Digest { mode: Mode, chunks: Vec<String> },
}

/// Fixed courtesy delay between consecutive external calls.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    primed: bool,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: false,
        }
    }

    /// Sleep unless this is the first call.
    pub async fn wait(&mut self) {
        if self.primed && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.primed = true;
    }
}

/// Fetch, group, render, split and optionally polish one week of commits.
pub struct Diary<'cfg, F, S> {
    config: &'cfg Config,
    fetcher: F,
    summarizer: S,
}

impl<'cfg, F, S> Diary<'cfg, F, S>
where
    F: CommitSource,
    S: Summarizer,
{
    pub fn new(config: &'cfg Config, fetcher: F, summarizer: S) -> Self {
        Self {
            config,
            fetcher,
            summarizer,
        }
    }

    #[tracing::instrument(
        name = "Building dev diary",
        level = "info",
        skip(self),
        fields(mode = %self.config.mode, author = %self.config.author)
    )]
    pub async fn run(&self, now: OffsetDateTime) -> AppResult<Outcome> {
        let window = ReportWindow::ending_at(now, self.config.lookback);
        let mut pacer = Pacer::new(self.config.delay);

        let records = self.collect(&window, &mut pacer).await?;
        let buckets = group(&records);
        if buckets.is_empty() {
            info!("No commits since {}", window.start);
            return Ok(Outcome::NoActivity);
        }
        info!(
            "Collected {} commits over {} days",
            buckets.entry_count(),
            buckets.len()
        );

        let Some(markdown) = render(&window, &buckets)? else {
            return Ok(Outcome::NoActivity);
        };
        let chunks = split(&markdown, self.config.chunk_size);
        debug!("Digest split into {} chunks", chunks.len());

        let chunks = match self.config.mode {
            Mode::Raw => chunks,
            Mode::Polished => self.polish(chunks, &mut pacer).await,
        };
        Ok(Outcome::Digest {
            mode: self.config.mode,
            chunks,
        })
    }

    #[tracing::instrument(name = "Fetching commits", level = "info", skip_all)]
    async fn collect(
        &self,
        window: &ReportWindow,
        pacer: &mut Pacer,
    ) -> AppResult<Vec<CommitRecord>> {
        pacer.wait().await;
        let repos = self
            .fetcher
            .list_active_repositories(window.end.saturating_sub(self.config.active_within))
            .await?;

        let span = Span::current();
        span.pb_set_style(&bar_style());
        span.pb_set_message("Fetching commits");
        span.pb_set_length(repos.len() as u64);

        let query = CommitQuery {
            author: self.config.author.clone(),
            since: window.since(),
            until: window.until(),
        };
        let mut records = Vec::new();
        for repo in &repos {
            pacer.wait().await;
            let fetch = self.fetcher.list_commits(repo, &query).await;
            if let CommitFetch::Tolerated(e) = &fetch {
                warn!("Skipping {} after failed commit fetch: {}", repo, e);
            }
            let found = fetch.into_records();
            debug!("{}: {} commits", repo, found.len());
            records.extend(found);
            span.pb_inc(1);
        }
        Ok(records)
    }

    #[tracing::instrument(name = "Polishing digest", level = "info", skip_all)]
    async fn polish(&self, chunks: Vec<String>, pacer: &mut Pacer) -> Vec<String> {
        let span = Span::current();
        span.pb_set_style(&bar_style());
        span.pb_set_message("Polishing");
        span.pb_set_length(chunks.len() as u64);

        let mut polished = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            pacer.wait().await;
            match self.summarizer.summarize(&chunk).await {
                Ok(text) if !text.trim().is_empty() => polished.push(text.trim().to_string()),
                Ok(_) => {
                    warn!("Language model returned no text, keeping the raw chunk");
                    polished.push(chunk);
                }
                Err(e) => {
                    warn!("Language model call failed, keeping the raw chunk: {}", e);
                    polished.push(chunk);
                }
            }
            span.pb_inc(1);
        }
        polished
    }
}
