//! Generative extraction backend trait and Anthropic implementation.

use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use voxnote_core::{defaults, schema, Error, Result, StructuredState};

use crate::error::{to_voxnote_error, AnthropicErrorCode};
use crate::prompts;

/// Backend for the generative extraction and merge steps.
///
/// Both operations receive the accumulated state in full and return the
/// complete next state; semantic matching of references against existing
/// items is the model's job, not the caller's.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Extract tasks/events/notes from a transcript, merged with the
    /// previous state when one exists.
    async fn extract_structured(
        &self,
        transcript: &str,
        previous: Option<&StructuredState>,
        context: Option<&str>,
    ) -> Result<StructuredState>;

    /// Produce the complete replacement Markdown document for a new
    /// transcript against the current document.
    async fn update_document(
        &self,
        transcript: &str,
        current: Option<&str>,
        context: Option<&str>,
    ) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Configuration for the Anthropic messages backend.
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// Model used for extraction.
    pub model: String,
    /// Max tokens for structured extraction responses.
    pub extract_max_tokens: u32,
    /// Max tokens for document-mode responses.
    pub document_max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClaudeConfig {
    /// Configuration with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: defaults::ANTHROPIC_BASE_URL.to_string(),
            model: defaults::EXTRACT_MODEL.to_string(),
            extract_max_tokens: defaults::EXTRACT_MAX_TOKENS,
            document_max_tokens: defaults::DOCUMENT_MAX_TOKENS,
            timeout_secs: defaults::EXTRACT_TIMEOUT_SECS,
        }
    }
}

/// Anthropic messages API extraction backend.
pub struct ClaudeBackend {
    client: reqwest::Client,
    config: ClaudeConfig,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

impl ClaudeBackend {
    /// Create a new Anthropic backend with the given configuration.
    pub fn new(config: ClaudeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("Anthropic API key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Extraction(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// Returns `Ok(None)` when `ANTHROPIC_API_KEY` is unset or empty: the
    /// generative step is unavailable and callers fall back to the
    /// deterministic extractor.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var(defaults::ENV_ANTHROPIC_API_KEY) {
            Ok(key) if !key.trim().is_empty() => Self::new(ClaudeConfig::new(key)).map(Some),
            _ => Ok(None),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ClaudeConfig {
        &self.config
    }

    /// Send one messages-API call and return the response text.
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        let url = format!(
            "{}/v1/messages",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "system": system,
            "messages": [
                { "role": "user", "content": user }
            ],
        });

        debug!(model = %self.config.model, prompt_len = system.len(), "sending extraction request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", defaults::ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Extraction(format!("extraction request timed out: {e}"))
                } else {
                    Error::Extraction(format!("extraction request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let envelope: ErrorEnvelope = serde_json::from_str(&raw).unwrap_or(ErrorEnvelope {
                error: None,
            });
            let (kind, message) = envelope
                .error
                .map(|e| (e.kind, e.message))
                .unwrap_or_else(|| (String::new(), raw));
            let code = AnthropicErrorCode::from_response(status.as_u16(), &kind, &message);
            return Err(to_voxnote_error(code, &message));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Extraction(format!("failed to parse response envelope: {e}")))?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::Extraction("response contained no text content".to_string()))
    }
}

#[async_trait]
impl ExtractionBackend for ClaudeBackend {
    async fn extract_structured(
        &self,
        transcript: &str,
        previous: Option<&StructuredState>,
        context: Option<&str>,
    ) -> Result<StructuredState> {
        let today = Local::now().date_naive();
        let system = prompts::structured_extraction_prompt(previous, today, context);
        let user = format!("Transcript: {transcript}");

        let text = self
            .complete(&system, &user, self.config.extract_max_tokens)
            .await?;
        schema::parse_extraction(&text)
    }

    async fn update_document(
        &self,
        transcript: &str,
        current: Option<&str>,
        context: Option<&str>,
    ) -> Result<String> {
        let today = Local::now().date_naive();
        let system = prompts::document_update_prompt(current, today, context);
        let user = format!("Transcript: {transcript}");

        let text = self
            .complete(&system, &user, self.config.document_max_tokens)
            .await?;
        let document = schema::strip_code_fence(&text).to_string();
        if document.trim().is_empty() {
            return Err(Error::Extraction(
                "response contained an empty document".to_string(),
            ));
        }
        Ok(document)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
