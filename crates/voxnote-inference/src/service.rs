//! Real-or-fallback extraction dispatch.
//!
//! [`ExtractionService`] holds an optional generative backend as an explicit
//! capability flag. When the backend is absent, or fails with an
//! unavailable-class error (missing credentials, exhausted credits, rate
//! limits), the deterministic fallback runs instead and the outcome is
//! tagged accordingly. Every other failure propagates: malformed model
//! output is a contract violation, never a silent degrade.

use std::sync::Arc;

use tracing::warn;

use voxnote_core::{fallback, DocumentOutcome, Error, ExtractionOutcome, Result, StructuredState};

use crate::extractor::{ClaudeBackend, ExtractionBackend};

/// Dispatch layer over the generative extraction backend.
#[derive(Clone)]
pub struct ExtractionService {
    backend: Option<Arc<dyn ExtractionBackend>>,
}

impl ExtractionService {
    /// Service with a generative backend.
    pub fn with_backend(backend: Arc<dyn ExtractionBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Service with no generative backend; every call uses the
    /// deterministic fallback.
    pub fn fallback_only() -> Self {
        Self { backend: None }
    }

    /// Build from the environment: a backend when `ANTHROPIC_API_KEY` is
    /// configured, fallback-only otherwise.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend: ClaudeBackend::from_env()?
                .map(|b| Arc::new(b) as Arc<dyn ExtractionBackend>),
        })
    }

    /// Whether a generative backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Extract tasks/events/notes from a transcript, merging with the
    /// previous state.
    pub async fn extract(
        &self,
        transcript: &str,
        previous: Option<&StructuredState>,
        context: Option<&str>,
    ) -> Result<ExtractionOutcome> {
        let Some(backend) = &self.backend else {
            warn!(fallback = true, "no extraction backend configured, using fallback extraction");
            return Ok(fallback::extract(transcript, previous));
        };

        match backend.extract_structured(transcript, previous, context).await {
            Ok(state) => Ok(ExtractionOutcome {
                state,
                used_fallback: false,
            }),
            Err(Error::ExtractionUnavailable(reason)) => {
                warn!(fallback = true, error = %reason, "extraction unavailable, using fallback extraction");
                Ok(fallback::extract(transcript, previous))
            }
            Err(other) => Err(other),
        }
    }

    /// Produce the next Markdown document for a transcript against the
    /// current one.
    pub async fn update_document(
        &self,
        transcript: &str,
        current: Option<&str>,
        context: Option<&str>,
    ) -> Result<DocumentOutcome> {
        let Some(backend) = &self.backend else {
            warn!(fallback = true, "no extraction backend configured, appending to document");
            let markdown = fallback::append_to_document(current, transcript);
            return Ok(DocumentOutcome {
                markdown,
                used_fallback: true,
            });
        };

        match backend.update_document(transcript, current, context).await {
            Ok(markdown) => Ok(DocumentOutcome {
                markdown,
                used_fallback: false,
            }),
            Err(Error::ExtractionUnavailable(reason)) => {
                warn!(fallback = true, error = %reason, "extraction unavailable, appending to document");
                let markdown = fallback::append_to_document(current, transcript);
                Ok(DocumentOutcome {
                    markdown,
                    used_fallback: true,
                })
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExtractionBackend;
    use voxnote_core::models::Task;

    #[tokio::test]
    async fn test_fallback_only_extracts_deterministically() {
        let service = ExtractionService::fallback_only();
        assert!(!service.has_backend());

        let outcome = service
            .extract("Remind me to water the plants.", None, None)
            .await
            .unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(outcome.state.tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_backend_success_is_not_fallback() {
        let state = StructuredState {
            tasks: vec![Task::with_title("From the model")],
            ..Default::default()
        };
        let backend = MockExtractionBackend::new().with_structured_response(state.clone());
        let service = ExtractionService::with_backend(Arc::new(backend));

        let outcome = service.extract("whatever", None, None).await.unwrap();
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.state, state);
    }

    #[tokio::test]
    async fn test_unavailable_backend_falls_back_with_previous_state() {
        let previous = StructuredState {
            tasks: vec![Task::with_title("Existing task")],
            ..Default::default()
        };
        let backend = MockExtractionBackend::new().failing_unavailable();
        let service = ExtractionService::with_backend(Arc::new(backend));

        let outcome = service
            .extract("Remind me to add a second task.", Some(&previous), None)
            .await
            .unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(outcome.state.tasks.len(), 2);
        assert_eq!(outcome.state.tasks[0].title, "Existing task");
    }

    #[tokio::test]
    async fn test_extraction_error_propagates() {
        let backend = MockExtractionBackend::new().failing_extraction();
        let service = ExtractionService::with_backend(Arc::new(backend));

        let err = service.extract("whatever", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[tokio::test]
    async fn test_document_fallback_preserves_existing_document() {
        let service = ExtractionService::fallback_only();
        let current = "# My Notes\n\n## Tasks\n- [ ] Buy milk\n";

        let outcome = service
            .update_document("A completely new thought.", Some(current), None)
            .await
            .unwrap();
        assert!(outcome.used_fallback);
        assert!(outcome.markdown.contains("- [ ] Buy milk"));
        assert!(outcome.markdown.contains("- A completely new thought"));
    }

    #[tokio::test]
    async fn test_document_backend_success() {
        let backend =
            MockExtractionBackend::new().with_document_response("# My Notes\n\n- replaced\n");
        let service = ExtractionService::with_backend(Arc::new(backend));

        let outcome = service.update_document("hi", None, None).await.unwrap();
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.markdown, "# My Notes\n\n- replaced\n");
    }

    #[tokio::test]
    async fn test_document_error_propagates() {
        let backend = MockExtractionBackend::new().failing_extraction();
        let service = ExtractionService::with_backend(Arc::new(backend));

        let err = service.update_document("hi", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
