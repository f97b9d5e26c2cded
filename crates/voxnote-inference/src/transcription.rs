//! Transcription backend trait and Deepgram implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use voxnote_core::audio::{AudioInput, AudioSource};
use voxnote_core::{defaults, Error, Result};

/// Result of transcribing one audio payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionOutput {
    /// Full transcribed text.
    pub transcript: String,
    /// Service confidence, 0.0–1.0.
    pub confidence: f64,
    /// Audio duration in seconds.
    pub duration_secs: f64,
}

/// Backend for turning audio into text.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Transcribe an audio payload (raw bytes or URL).
    async fn transcribe(&self, input: &AudioInput) -> Result<TranscriptionOutput>;

    /// Check if the transcription backend is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Configuration for the Deepgram backend.
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// Transcription model.
    pub model: String,
    /// Apply Deepgram smart formatting (punctuation, numerals).
    pub smart_format: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl DeepgramConfig {
    /// Configuration with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: defaults::DEEPGRAM_BASE_URL.to_string(),
            model: defaults::TRANSCRIBE_MODEL.to_string(),
            smart_format: true,
            timeout_secs: defaults::TRANSCRIBE_TIMEOUT_SECS,
        }
    }
}

/// Deepgram prerecorded-audio transcription backend.
pub struct DeepgramBackend {
    client: reqwest::Client,
    config: DeepgramConfig,
}

/// Deepgram prerecorded API response envelope.
#[derive(Deserialize)]
struct DeepgramResponse {
    #[serde(default)]
    metadata: Option<DeepgramMetadata>,
    #[serde(default)]
    results: Option<DeepgramResults>,
}

#[derive(Deserialize)]
struct DeepgramMetadata {
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Deserialize)]
struct DeepgramResults {
    #[serde(default)]
    channels: Vec<DeepgramChannel>,
}

#[derive(Deserialize)]
struct DeepgramChannel {
    #[serde(default)]
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(Deserialize)]
struct DeepgramAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: Option<f64>,
}

impl DeepgramBackend {
    /// Create a new Deepgram backend with the given configuration.
    pub fn new(config: DeepgramConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("Deepgram API key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transcription(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// Returns `Ok(None)` when `DEEPGRAM_API_KEY` is unset or empty: the
    /// service is simply unavailable, not misconfigured.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var(defaults::ENV_DEEPGRAM_API_KEY) {
            Ok(key) if !key.trim().is_empty() => Self::new(DeepgramConfig::new(key)).map(Some),
            _ => Ok(None),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &DeepgramConfig {
        &self.config
    }

    fn listen_url(&self) -> String {
        format!(
            "{}/v1/listen?model={}&smart_format={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.smart_format
        )
    }
}

#[async_trait]
impl TranscriptionBackend for DeepgramBackend {
    async fn transcribe(&self, input: &AudioInput) -> Result<TranscriptionOutput> {
        let url = self.listen_url();

        let request = match &input.source {
            AudioSource::Url(audio_url) => {
                debug!(model = %self.config.model, "transcribing audio from URL");
                self.client
                    .post(&url)
                    .header("Authorization", format!("Token {}", self.config.api_key))
                    .json(&serde_json::json!({ "url": audio_url }))
            }
            AudioSource::Bytes(data) => {
                let mime = input
                    .resolved_mime()
                    .unwrap_or_else(|| "audio/wav".to_string());
                debug!(
                    model = %self.config.model,
                    mime_type = %mime,
                    payload_bytes = data.len(),
                    "transcribing raw audio"
                );
                self.client
                    .post(&url)
                    .header("Authorization", format!("Token {}", self.config.api_key))
                    .header("Content-Type", mime)
                    .body(data.clone())
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("transcription request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transcription(format!(
                "transcription service returned {status}: {body}"
            )));
        }

        let parsed: DeepgramResponse = response
            .json()
            .await
            .map_err(|e| Error::Transcription(format!("failed to parse response: {e}")))?;

        let alternative = parsed
            .results
            .as_ref()
            .and_then(|r| r.channels.first())
            .and_then(|c| c.alternatives.first());

        let transcript = alternative
            .map(|a| a.transcript.trim().to_string())
            .unwrap_or_default();
        if transcript.is_empty() {
            return Err(Error::Transcription(
                "service returned no usable transcript".to_string(),
            ));
        }

        Ok(TranscriptionOutput {
            transcript,
            confidence: alternative.and_then(|a| a.confidence).unwrap_or(0.0),
            duration_secs: parsed.metadata.and_then(|m| m.duration).unwrap_or(0.0),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!(
            "{}/v1/projects",
            self.config.base_url.trim_end_matches('/')
        );
        match self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.config.api_key))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response_body(transcript: &str, confidence: f64, duration: f64) -> serde_json::Value {
        serde_json::json!({
            "metadata": { "duration": duration },
            "results": {
                "channels": [
                    { "alternatives": [ { "transcript": transcript, "confidence": confidence } ] }
                ]
            }
        })
    }

    fn backend_for(server: &MockServer) -> DeepgramBackend {
        let config = DeepgramConfig {
            base_url: server.uri(),
            ..DeepgramConfig::new("test-key")
        };
        DeepgramBackend::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = DeepgramBackend::new(DeepgramConfig::new("  "));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = DeepgramConfig::new("key");
        assert_eq!(config.model, "nova-2");
        assert!(config.smart_format);
        assert_eq!(config.timeout_secs, 300);
    }

    #[tokio::test]
    async fn test_transcribe_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/listen"))
            .and(header("Authorization", "Token test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(response_body("Hello world.", 0.97, 3.2)),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let input = AudioInput::from_bytes(vec![0u8; 16], "audio/wav");
        let output = backend.transcribe(&input).await.unwrap();

        assert_eq!(output.transcript, "Hello world.");
        assert!((output.confidence - 0.97).abs() < f64::EPSILON);
        assert!((output.duration_secs - 3.2).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_transcribe_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/listen"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(response_body("From a URL.", 0.9, 1.0)),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let input = AudioInput::from_url("https://example.com/audio.mp3");
        let output = backend.transcribe(&input).await.unwrap();
        assert_eq!(output.transcript, "From a URL.");
    }

    #[tokio::test]
    async fn test_empty_transcript_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/listen"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body("", 0.0, 0.5)))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let input = AudioInput::from_bytes(vec![0u8; 16], "audio/wav");
        let err = backend.transcribe(&input).await.unwrap_err();
        match err {
            Error::Transcription(msg) => assert!(msg.contains("no usable transcript")),
            other => panic!("Expected Transcription error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/listen"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let input = AudioInput::from_bytes(vec![0u8; 16], "audio/wav");
        let err = backend.transcribe(&input).await.unwrap_err();
        match err {
            Error::Transcription(msg) => assert!(msg.contains("401")),
            other => panic!("Expected Transcription error, got {other:?}"),
        }
    }
}
