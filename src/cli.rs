use std::fmt::Display;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::builder::RangedU64ValueParser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{ArgAction, Args, ColorChoice, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::aot::{Generator, Shell, generate};
use clap_complete_nushell::Nushell;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use time::OffsetDateTime;
use tracing::info;

use crate::ai::{self, ChatSummarizer, DEFAULT_MODEL, GEMINI_API_BASE};
use crate::config::Config;
use crate::diary::Diary;
use crate::digest::DEFAULT_CHUNK_SIZE;
use crate::github::GitHubClient;
use crate::github::client::DEFAULT_API_BASE;
use crate::io_utils::{self, OutputFormat};
use crate::AppResult;

const STYLES: Styles = Styles::styled()
    .header(Style::new().bold())
    .usage(Style::new().bold())
    .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
    .literal(
        Style::new()
            .bold()
            .fg_color(Some(Color::Ansi(AnsiColor::Green))),
    )
    .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
    .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
    .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightRed))));

/// Long-form CLI description shown in `--help`.
const LONG_ABOUT: &str = "Dev Diary - A weekly digest of your GitHub commits

This tool:
- lists the repositories you pushed to recently
- collects the commits you authored in each of them over the past week
- renders them as a Markdown digest grouped by day (UTC)
- optionally asks a language model to rewrite the digest as prose (--polished)

The digest is printed in chunks small enough for chat messages, or written
to a CI output file with --format heredoc --output \"$GITHUB_OUTPUT\".";

/// Dev Diary - A weekly digest of your GitHub commits.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = Some(LONG_ABOUT), styles = STYLES)]
pub struct Cli {
    /// Color choice for log output
    #[arg(long, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

/// Auxiliary commands. Without one, the digest is generated.
#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Generate shell completion for a given shell
    Completion {
        /// Output file to write the completion script to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The shell to generate the completion for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// Options that shape the digest.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Rewrite each chunk into prose with the language model
    #[arg(long, default_value_t = false, action = ArgAction::SetTrue)]
    pub polished: bool,

    /// GitHub token used to list repositories and commits
    #[arg(long, env = "TOKEN_GITHUB", hide_env_values = true)]
    pub github_token: Option<String>,

    /// API key for the language model service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// GitHub login whose commits are collected
    #[arg(long, env = "DIARY_AUTHOR")]
    pub author: Option<String>,

    /// How far back to collect commits
    ///
    /// Accepts humantime durations such as `7d`, `2weeks` or `36h`
    #[arg(long, default_value = "7d", value_parser = humantime::parse_duration)]
    pub lookback: std::time::Duration,

    /// Only repositories pushed to within this span are scanned
    #[arg(long, default_value = "30d", value_parser = humantime::parse_duration)]
    pub active_within: std::time::Duration,

    /// Pause between consecutive API calls
    #[arg(long, default_value = "300ms", value_parser = humantime::parse_duration)]
    pub delay: std::time::Duration,

    /// Maximum characters per output chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub chunk_size: usize,

    /// Model used in polished mode
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible language model API
    #[arg(long, default_value = GEMINI_API_BASE)]
    pub api_base: String,

    /// Base URL of the GitHub REST API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub github_api: String,
}

/// Options controlling where and how chunks are written.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output framing for the chunks
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markers)]
    pub format: OutputFormat,

    /// Prefix for heredoc output names
    #[arg(long, default_value = "digest")]
    pub output_name: String,

    /// File to append the framed digest to
    /// If not provided, prints to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Supported completion targets for shell auto-completion.
#[derive(ValueEnum, Clone, Debug)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
    Nushell,
}

impl Display for CompletionShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CompletionShell::Bash => "bash",
            CompletionShell::Zsh => "zsh",
            CompletionShell::Fish => "fish",
            CompletionShell::PowerShell => "powershell",
            CompletionShell::Elvish => "elvish",
            CompletionShell::Nushell => "nushell",
        };
        write!(f, "{}", s)
    }
}

impl Generator for &CompletionShell {
    fn generate(&self, cmd: &clap::builder::Command, buf: &mut dyn Write) {
        match self {
            CompletionShell::Bash => Shell::Bash.generate(cmd, buf),
            CompletionShell::Zsh => Shell::Zsh.generate(cmd, buf),
            CompletionShell::Fish => Shell::Fish.generate(cmd, buf),
            CompletionShell::PowerShell => Shell::PowerShell.generate(cmd, buf),
            CompletionShell::Elvish => Shell::Elvish.generate(cmd, buf),
            CompletionShell::Nushell => Nushell.generate(cmd, buf),
        }
    }

    fn file_name(&self, name: &str) -> String {
        match self {
            CompletionShell::Bash => Shell::Bash.file_name(name),
            CompletionShell::Zsh => Shell::Zsh.file_name(name),
            CompletionShell::Fish => Shell::Fish.file_name(name),
            CompletionShell::PowerShell => Shell::PowerShell.file_name(name),
            CompletionShell::Elvish => Shell::Elvish.file_name(name),
            CompletionShell::Nushell => Nushell.file_name(name),
        }
    }
}

impl Cli {
    /// Whether log output on stderr should be colored.
    pub fn use_ansi(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal(),
        }
    }

    /// Execute the chosen command.
    pub async fn run(&self) -> AppResult<()> {
        match &self.cmd {
            Some(Cmd::Completion { shell, output }) => write_completion(shell, output.as_deref()),
            None => self.run_diary().await,
        }
    }

    #[tracing::instrument(name = "Generating weekly digest", level = "debug", skip(self))]
    async fn run_diary(&self) -> AppResult<()> {
        // Validation happens before any client is built or request is sent.
        let config = Config::try_from(&self.run)?;

        let fetcher = GitHubClient::new(&config.github_token, &config.github_api)?;
        let summarizer = ChatSummarizer::new(
            ai::get_client(&config.api_base, &config.gemini_api_key),
            config.model.as_str(),
        )?;

        let outcome = Diary::new(&config, fetcher, summarizer)
            .run(OffsetDateTime::now_utc())
            .await?;

        let framed = io_utils::frame(&outcome, self.output.format, &self.output.output_name)?;
        io_utils::write_output(self.output.output.as_deref(), &framed).await
    }
}

fn write_completion(shell: &CompletionShell, output: Option<&Path>) -> AppResult<()> {
    let mut cmd = Cli::command();
    let bin = env!("CARGO_PKG_NAME");
    if let Some(output_path) = output {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(output_path)?;
        generate(shell, &mut cmd, bin, &mut file);
        info!(
            "Generated completion script for {} at {}",
            shell,
            output_path.display()
        );
    } else {
        generate(shell, &mut cmd, bin, &mut std::io::stdout());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dev-diary").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_weekly_digest() {
        let cli = parse(&["--github-token", "t", "--gemini-api-key", "k", "--author", "octo"]);
        assert!(cli.cmd.is_none());
        assert_eq!(cli.output.format, OutputFormat::Markers);
        assert_eq!(cli.output.output_name, "digest");

        let config = Config::try_from(&cli.run).unwrap();
        assert_eq!(config.mode, Mode::Raw);
        assert_eq!(config.lookback, time::Duration::days(7));
        assert_eq!(config.active_within, time::Duration::days(30));
        assert_eq!(config.delay, std::time::Duration::from_millis(300));
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn polished_and_overrides_parse() {
        let cli = parse(&[
            "--polished",
            "--github-token",
            "t",
            "--gemini-api-key",
            "k",
            "--author",
            "octo",
            "--lookback",
            "2weeks",
            "--delay",
            "1s",
            "--chunk-size",
            "500",
            "--format",
            "heredoc",
        ]);
        let config = Config::try_from(&cli.run).unwrap();
        assert_eq!(config.mode, Mode::Polished);
        assert_eq!(config.lookback, time::Duration::days(14));
        assert_eq!(config.delay, std::time::Duration::from_secs(1));
        assert_eq!(config.chunk_size, 500);
        assert_eq!(cli.output.format, OutputFormat::Heredoc);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let result = Cli::try_parse_from(["dev-diary", "--chunk-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn completion_subcommand_parses() {
        let cli = parse(&["completion", "nushell"]);
        assert!(matches!(
            cli.cmd,
            Some(Cmd::Completion {
                shell: CompletionShell::Nushell,
                output: None
            })
        ));
    }
}
