//! Mock backends for deterministic testing.
//!
//! Builder-style mock implementations of the transcription and extraction
//! backend traits, with call logs for assertions. Enabled for this crate's
//! own tests and for downstream crates via the `mock` feature.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use voxnote_core::audio::AudioInput;
use voxnote_core::{Error, Result, StructuredState};

use crate::extractor::ExtractionBackend;
use crate::transcription::{TranscriptionBackend, TranscriptionOutput};

/// A logged call against a mock backend.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
}

/// How a mock backend should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureMode {
    None,
    /// Fail with `Error::ExtractionUnavailable` (triggers fallback).
    Unavailable,
    /// Fail with `Error::Extraction` (propagates).
    Extraction,
    /// Fail with `Error::Transcription`.
    Transcription,
}

// =============================================================================
// TRANSCRIPTION MOCK
// =============================================================================

/// Mock transcription backend returning a scripted transcript.
#[derive(Clone)]
pub struct MockTranscriptionBackend {
    transcript: String,
    confidence: f64,
    duration_secs: f64,
    failure: FailureMode,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranscriptionBackend {
    /// Mock that transcribes everything to the given text.
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: 0.95,
            duration_secs: 3.0,
            failure: FailureMode::None,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the reported confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the reported audio duration.
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Make every call fail with a transcription error.
    pub fn failing(mut self) -> Self {
        self.failure = FailureMode::Transcription;
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    fn log(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
        });
    }
}

#[async_trait]
impl TranscriptionBackend for MockTranscriptionBackend {
    async fn transcribe(&self, input: &AudioInput) -> Result<TranscriptionOutput> {
        self.log("transcribe", &format!("{:?}", input.mime_type));
        if self.failure == FailureMode::Transcription {
            return Err(Error::Transcription("simulated failure".to_string()));
        }
        Ok(TranscriptionOutput {
            transcript: self.transcript.clone(),
            confidence: self.confidence,
            duration_secs: self.duration_secs,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.failure == FailureMode::None)
    }

    fn model_name(&self) -> &str {
        "mock-transcription"
    }
}

// =============================================================================
// EXTRACTION MOCK
// =============================================================================

/// Mock extraction backend with scripted responses.
#[derive(Clone)]
pub struct MockExtractionBackend {
    structured: Option<StructuredState>,
    document: Option<String>,
    failure: FailureMode,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockExtractionBackend {
    /// Mock returning empty state and an empty-document error by default.
    pub fn new() -> Self {
        Self {
            structured: None,
            document: None,
            failure: FailureMode::None,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the structured extraction response.
    pub fn with_structured_response(mut self, state: StructuredState) -> Self {
        self.structured = Some(state);
        self
    }

    /// Script the document-mode response.
    pub fn with_document_response(mut self, markdown: impl Into<String>) -> Self {
        self.document = Some(markdown.into());
        self
    }

    /// Make every call fail with an unavailable-class error.
    pub fn failing_unavailable(mut self) -> Self {
        self.failure = FailureMode::Unavailable;
        self
    }

    /// Make every call fail with a fatal extraction error.
    pub fn failing_extraction(mut self) -> Self {
        self.failure = FailureMode::Extraction;
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of extraction calls seen (both modes).
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn log(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
        });
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure {
            FailureMode::Unavailable => Err(Error::ExtractionUnavailable(
                "simulated credit exhaustion".to_string(),
            )),
            FailureMode::Extraction => {
                Err(Error::Extraction("simulated malformed output".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl Default for MockExtractionBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionBackend for MockExtractionBackend {
    async fn extract_structured(
        &self,
        transcript: &str,
        _previous: Option<&StructuredState>,
        _context: Option<&str>,
    ) -> Result<StructuredState> {
        self.log("extract_structured", transcript);
        self.check_failure()?;
        Ok(self.structured.clone().unwrap_or_default())
    }

    async fn update_document(
        &self,
        transcript: &str,
        _current: Option<&str>,
        _context: Option<&str>,
    ) -> Result<String> {
        self.log("update_document", transcript);
        self.check_failure()?;
        self.document
            .clone()
            .ok_or_else(|| Error::Extraction("no scripted document response".to_string()))
    }

    fn model_name(&self) -> &str {
        "mock-extraction"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxnote_core::models::Task;

    #[tokio::test]
    async fn test_mock_transcription_returns_script() {
        let backend = MockTranscriptionBackend::new("Hello world.").with_confidence(0.8);
        let input = AudioInput::from_bytes(vec![0u8; 4], "audio/wav");

        let output = backend.transcribe(&input).await.unwrap();
        assert_eq!(output.transcript, "Hello world.");
        assert!((output.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_transcription_failure() {
        let backend = MockTranscriptionBackend::new("ignored").failing();
        let input = AudioInput::from_bytes(vec![0u8; 4], "audio/wav");
        assert!(backend.transcribe(&input).await.is_err());
        assert!(!backend.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_extraction_scripted_state() {
        let state = StructuredState {
            tasks: vec![Task::with_title("Scripted")],
            ..Default::default()
        };
        let backend = MockExtractionBackend::new().with_structured_response(state);

        let result = backend.extract_structured("t", None, None).await.unwrap();
        assert_eq!(result.tasks.len(), 1);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_extraction_failure_modes() {
        let unavailable = MockExtractionBackend::new().failing_unavailable();
        assert!(matches!(
            unavailable.extract_structured("t", None, None).await,
            Err(Error::ExtractionUnavailable(_))
        ));

        let fatal = MockExtractionBackend::new().failing_extraction();
        assert!(matches!(
            fatal.extract_structured("t", None, None).await,
            Err(Error::Extraction(_))
        ));
    }
}
