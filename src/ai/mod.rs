pub mod prompt;

use std::collections::HashMap;

use async_openai::Client;
use async_openai::config::{Config, OpenAIConfig};
use async_openai::types::chat::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use dev_diary_include_zstd::include_zstd;
use tracing::{debug, trace};

use crate::AppResult;
use prompt::PromptTemplate;

/// Gemini's OpenAI-compatible endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

static POLISH_PROMPT: &[u8] = include_zstd!("src/ai/prompts/polish_prompt.md");

/// Build an async-openai client for any OpenAI-compatible server.
#[tracing::instrument(name = "Connecting to language model", level = "debug", skip(api_key))]
pub fn get_client(api_base: &str, api_key: &str) -> Client<Box<dyn Config>> {
    let config = Box::new(
        OpenAIConfig::default()
            .with_api_base(api_base.trim_end_matches('/'))
            .with_api_key(api_key),
    ) as Box<dyn Config>;

    Client::with_config(config)
}

/// Rewrites a block of digest Markdown into prose.
pub trait Summarizer {
    async fn summarize(&self, text: &str) -> AppResult<String>;
}

/// Summarizer backed by a chat-completions model.
pub struct ChatSummarizer<C: Config> {
    client: Client<C>,
    model: String,
    prompt: PromptTemplate,
}

impl<C: Config> ChatSummarizer<C> {
    pub fn new<S: Into<String>>(client: Client<C>, model: S) -> AppResult<Self> {
        Ok(Self {
            client,
            model: model.into(),
            prompt: PromptTemplate::from_zstd(POLISH_PROMPT)?,
        })
    }
}

impl<C: Config> Summarizer for ChatSummarizer<C> {
    #[tracing::instrument(name = "Polishing chunk", level = "debug", skip_all, fields(model = %self.model))]
    async fn summarize(&self, text: &str) -> AppResult<String> {
        let mut vars = HashMap::new();
        vars.insert("commits", text);
        let prompt = self.prompt.render(&vars);
        trace!("Prompt: {prompt}");

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .build()?;

        let response = self.client.chat().create(request).await?;
        debug!("AI Response: {:?}", response);

        let reply = response
            .choices
            .into_iter()
            .filter_map(|choice| choice.message.content)
            .collect::<Vec<String>>()
            .join("\n");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_prompt_has_commits_placeholder() {
        let prompt = PromptTemplate::from_zstd(POLISH_PROMPT).unwrap();
        let mut vars = HashMap::new();
        vars.insert("commits", "### 2024-01-01\n- [a] fix bug");
        let rendered = prompt.render(&vars);
        assert!(rendered.ends_with("### 2024-01-01\n- [a] fix bug\n"));
        assert!(!rendered.contains("{{commits}}"));
    }

    #[test]
    fn summarizer_builds_without_network() {
        let client = get_client(GEMINI_API_BASE, "key");
        let summarizer = ChatSummarizer::new(client, DEFAULT_MODEL).unwrap();
        assert_eq!(summarizer.model, DEFAULT_MODEL);
    }
}
