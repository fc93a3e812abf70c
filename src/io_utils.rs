use std::fmt::Write as _;
use std::path::Path;

use clap::ValueEnum;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::AppResult;
use crate::diary::Outcome;

pub const CHUNK_MARKER: &str = "<<CHUNK>>";
pub const NO_ACTIVITY: &str = "No commits in the last week.";

/// How chunks are framed on output.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Each chunk preceded by a `<<CHUNK>>` line
    #[default]
    Markers,

    /// `name_N<<EOF ... EOF` blocks plus `name_count=N`, as read by CI output files
    /// such as `$GITHUB_OUTPUT`
    Heredoc,
}

/// Frame a run's outcome for output.
pub fn frame(outcome: &Outcome, format: OutputFormat, name: &str) -> AppResult<String> {
    let chunks: &[String] = match outcome {
        Outcome::Digest { chunks, .. } => chunks,
        Outcome::NoActivity => &[],
    };
    match format {
        OutputFormat::Markers => frame_markers(chunks),
        OutputFormat::Heredoc => frame_heredoc(chunks, name),
    }
}

fn frame_markers(chunks: &[String]) -> AppResult<String> {
    if chunks.is_empty() {
        return Ok(format!("{NO_ACTIVITY}\n"));
    }
    let mut out = String::new();
    for chunk in chunks {
        writeln!(out, "{CHUNK_MARKER}\n{chunk}")?;
    }
    Ok(out)
}

fn frame_heredoc(chunks: &[String], name: &str) -> AppResult<String> {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let delimiter = heredoc_delimiter(chunk);
        writeln!(out, "{name}_{}<<{delimiter}\n{chunk}\n{delimiter}", i + 1)?;
    }
    writeln!(out, "{name}_count={}", chunks.len())?;
    Ok(out)
}

/// `EOF`, lengthened until no line of the chunk collides with it.
fn heredoc_delimiter(chunk: &str) -> String {
    let mut delimiter = String::from("EOF");
    while chunk.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// Append to `path` when given, otherwise print to stdout.
#[tracing::instrument(name = "Writing digest", level = "debug", skip(content))]
pub async fn write_output(path: Option<&Path>, content: &str) -> AppResult<()> {
    match path {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
            info!("Wrote digest to {}", path.display());
        }
        None => {
            debug!("Writing {} bytes to stdout", content.len());
            tracing_indicatif::indicatif_println!("{}", content.trim_end_matches('\n'));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;

    fn digest(chunks: &[&str]) -> Outcome {
        Outcome::Digest {
            mode: Mode::Raw,
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn markers_precede_each_chunk() {
        let out = frame(&digest(&["one", "two\nlines"]), OutputFormat::Markers, "digest").unwrap();
        assert_eq!(out, "<<CHUNK>>\none\n<<CHUNK>>\ntwo\nlines\n");
    }

    #[test]
    fn heredoc_names_and_counts_chunks() {
        let out = frame(&digest(&["one", "two"]), OutputFormat::Heredoc, "diary").unwrap();
        assert_eq!(
            out,
            "diary_1<<EOF\none\nEOF\ndiary_2<<EOF\ntwo\nEOF\ndiary_count=2\n"
        );
    }

    #[test]
    fn heredoc_delimiter_avoids_collisions() {
        assert_eq!(heredoc_delimiter("a\nEOF\nEOF_\nb"), "EOF__");
        assert_eq!(heredoc_delimiter("mentions EOF inline"), "EOF");
    }

    #[test]
    fn no_activity_framing() {
        assert_eq!(
            frame(&Outcome::NoActivity, OutputFormat::Markers, "digest").unwrap(),
            "No commits in the last week.\n"
        );
        assert_eq!(
            frame(&Outcome::NoActivity, OutputFormat::Heredoc, "digest").unwrap(),
            "digest_count=0\n"
        );
    }

    #[tokio::test]
    async fn appends_to_output_file() {
        let path = std::env::temp_dir().join(format!("dev-diary-output-{}", std::process::id()));
        let _ = tokio::fs::remove_file(&path).await;

        write_output(Some(path.as_path()), "first=1\n").await.unwrap();
        write_output(Some(path.as_path()), "second=2\n").await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "first=1\nsecond=2\n");
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
