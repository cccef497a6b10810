//! Summarizer backends and provider selection.
//!
//! The [`Summarizer`] trait and the reference [`TruncationSummarizer`] live
//! in `docsum-core`. This module adds:
//! - **[`OpenAiSummarizer`]** calls an OpenAI-compatible
//!   `POST /chat/completions` endpoint.
//! - **[`create_summarizer`]** picks a backend from `[summarizer]` config.
//!
//! # Failure policy
//!
//! The OpenAI backend does not retry. Transport errors, non-2xx responses,
//! and responses without a usable message all become
//! [`SummarizeError::Unavailable`]; the pipeline reports them to the caller
//! as a rejection.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use docsum_core::models::ExtractedText;
use docsum_core::summarize::{SummarizeError, Summarizer, TruncationSummarizer};

use crate::config::SummarizerConfig;

const SYSTEM_PROMPT: &str = "Sei un assistente che crea riassunti concisi di documenti.";
const USER_PROMPT_PREFIX: &str = "Riassumi il seguente testo in modo conciso:\n\n";

/// Builds the summarizer named by `config.provider`.
///
/// # Errors
///
/// Fails for unknown providers, or for `"openai"` when `OPENAI_API_KEY` is
/// not set or the HTTP client cannot be built.
pub fn create_summarizer(config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>> {
    match config.provider.as_str() {
        "truncate" => Ok(Arc::new(TruncationSummarizer::new(config.max_words))),
        "openai" => {
            let api_key = std::env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;
            Ok(Arc::new(OpenAiSummarizer::new(config, api_key)?))
        }
        other => bail!("Unknown summarizer provider: {}", other),
    }
}

// ============ OpenAI Provider ============

/// Summarizer backed by an OpenAI-compatible chat completion API.
///
/// Output length is bounded by `max_tokens`.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiSummarizer {
    pub fn new(config: &SummarizerConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("{}{}", USER_PROMPT_PREFIX, text) },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &ExtractedText) -> Result<String, SummarizeError> {
        debug!(model = %self.model, words = text.word_count(), "requesting chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text.as_str()))
            .send()
            .await
            .map_err(|e| SummarizeError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            warn!(%status, "chat completion rejected");
            return Err(SummarizeError::Unavailable(format!(
                "OpenAI API error {}: {}",
                status, body_text
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| SummarizeError::Unavailable(format!("invalid response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SummarizeError::Unavailable("response contained no summary".to_string()))
    }
}
