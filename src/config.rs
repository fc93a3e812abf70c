use std::fmt::{Debug, Display, Formatter};

use time::Duration;

use crate::cli::RunArgs;
use crate::time_utils::to_time_duration;
use crate::{AppError, AppResult};

/// How chunks are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Markdown digest as rendered.
    #[default]
    Raw,
    /// Each chunk rewritten by the language model.
    Polished,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Raw => write!(f, "raw"),
            Mode::Polished => write!(f, "polished"),
        }
    }
}

/// Everything a run needs, resolved once at startup from flags and environment.
#[derive(Clone)]
pub struct Config {
    pub github_token: String,
    pub gemini_api_key: String,
    pub author: String,
    pub mode: Mode,
    /// How far back commits are collected.
    pub lookback: Duration,
    /// Repositories not pushed to within this span are skipped.
    pub active_within: Duration,
    /// Pause between consecutive API calls.
    pub delay: std::time::Duration,
    pub chunk_size: usize,
    pub model: String,
    pub api_base: String,
    pub github_api: String,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("gemini_api_key", &"<redacted>")
            .field("author", &self.author)
            .field("mode", &self.mode)
            .field("lookback", &self.lookback)
            .field("active_within", &self.active_within)
            .field("delay", &self.delay)
            .field("chunk_size", &self.chunk_size)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("github_api", &self.github_api)
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl TryFrom<&RunArgs> for Config {
    type Error = AppError;

    /// Fails with every missing credential listed at once.
    fn try_from(args: &RunArgs) -> AppResult<Self> {
        let github_token = present(&args.github_token);
        let gemini_api_key = present(&args.gemini_api_key);
        let author = present(&args.author);

        let (Some(github_token), Some(gemini_api_key), Some(author)) =
            (github_token.clone(), gemini_api_key.clone(), author.clone())
        else {
            let missing = [
                ("TOKEN_GITHUB", github_token.is_none()),
                ("GEMINI_API_KEY", gemini_api_key.is_none()),
                ("DIARY_AUTHOR", author.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(AppError::MissingConfig(missing));
        };

        Ok(Self {
            github_token,
            gemini_api_key,
            author,
            mode: if args.polished {
                Mode::Polished
            } else {
                Mode::Raw
            },
            lookback: to_time_duration(args.lookback)?,
            active_within: to_time_duration(args.active_within)?,
            delay: args.delay,
            chunk_size: args.chunk_size,
            model: args.model.clone(),
            api_base: args.api_base.clone(),
            github_api: args.github_api.clone(),
        })
    }
}
