//! Completion clients for the hosted language model.
//!
//! Every stage talks to the model through [`CompletionClient`]; the provider is
//! picked from configuration once at startup. Providers hand back either plain
//! text or a list of content blocks, and [`CompletionContent::into_text`] is the
//! single place where the two shapes are reconciled.

mod anthropic;
mod openrouter;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{Config, LlmProvider};

pub use anthropic::AnthropicClient;
pub use openrouter::OpenRouterClient;

#[derive(Error, Debug)]
pub enum CompletionError {
    /// No credential configured; raised before any request is made
    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One block of a block-structured completion
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Tool calls, thinking and anything else that carries no answer text
    #[serde(other)]
    Other,
}

/// Raw completion output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CompletionContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl CompletionContent {
    pub fn into_text(self) -> String {
        match self {
            CompletionContent::Text(text) => text,
            CompletionContent::Blocks(blocks) => blocks
                .into_iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text),
                    ContentBlock::Other => None,
                })
                .collect(),
        }
    }
}

impl CompletionError {
    /// Configuration problems end a request; anything else is a per-call failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, CompletionError::MissingCredential(_))
    }
}

impl From<String> for CompletionContent {
    fn from(text: String) -> Self {
        CompletionContent::Text(text)
    }
}

/// Sends a prompt to the completion service and returns its raw output.
///
/// One outbound request per call. Errors are returned as-is: no retry, no
/// backoff, no timeout beyond the transport's own.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<CompletionContent, CompletionError>;

    /// Fails with [`CompletionError::MissingCredential`] when no request could be sent
    fn ensure_configured(&self) -> Result<(), CompletionError> {
        Ok(())
    }

    /// Convenience wrapper flattening the content to text
    async fn complete_text(&self, prompt: &str) -> Result<String, CompletionError> {
        Ok(self.complete(prompt).await?.into_text())
    }
}

/// Build the client for the configured provider
pub fn build_completion_client(config: &Config) -> Arc<dyn CompletionClient> {
    match config.llm_provider {
        LlmProvider::OpenRouter => Arc::new(OpenRouterClient::new(
            config.openrouter_api_key.clone(),
            config.model(),
            config.llm_temperature,
            config.llm_max_tokens,
        )),
        LlmProvider::Anthropic => Arc::new(AnthropicClient::new(
            config.anthropic_api_key.clone(),
            config.anthropic_api_url.clone(),
            config.model(),
            config.llm_temperature,
            config.llm_max_tokens,
        )),
    }
}
