//! The per-recording processing pipeline.
//!
//! One recording runs strictly sequentially: validate input → transcribe →
//! extract/merge → persist → (structured mode) calendar links. No step
//! begins before the previous completes, and no retry happens here; a
//! failed recording leaves the session's accumulated state exactly as it
//! was, including when the failure is a storage write after a successful
//! in-memory merge.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use voxnote_core::audio::{AudioInput, AudioSource};
use voxnote_core::{DocumentNoteMeta, NoteRecord, Result, StorageResult, StructuredState};
use voxnote_inference::{ExtractionService, TranscriptionBackend};
use voxnote_storage::NoteStore;

use crate::calendar;
use crate::session::{Session, SessionData, SessionMode};

/// Wall-clock duration of each pipeline step, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTimings {
    pub transcription_ms: u64,
    pub extraction_ms: u64,
    pub storage_ms: u64,
    pub calendar_ms: u64,
}

/// Everything one committed recording produced.
#[derive(Debug, Clone)]
pub struct RecordingOutcome {
    /// Correlation id carried through every log line of this recording.
    pub request_id: Uuid,
    pub transcript: String,
    pub confidence: f64,
    pub audio_duration_secs: f64,
    /// The merged state the session now holds.
    pub data: SessionData,
    pub storage: StorageResult,
    /// True when the deterministic fallback produced the merge.
    pub used_fallback: bool,
    pub timings: StepTimings,
}

/// Runs recordings through the pipeline against a session.
pub struct Processor {
    transcription: Arc<dyn TranscriptionBackend>,
    extraction: ExtractionService,
    store: NoteStore,
}

impl Processor {
    pub fn new(
        transcription: Arc<dyn TranscriptionBackend>,
        extraction: ExtractionService,
        store: NoteStore,
    ) -> Self {
        Self {
            transcription,
            extraction,
            store,
        }
    }

    /// Process one finalized recording.
    ///
    /// The session must be in the `Capturing` phase. On success its state
    /// is replaced with the merge result and the phase is `Complete`; on
    /// any fatal failure the phase is `Error` and the accumulated state is
    /// untouched. An invalid audio payload is reported immediately without
    /// entering the `Processing` phase.
    pub async fn process(
        &self,
        session: &mut Session,
        audio: &AudioInput,
    ) -> Result<RecordingOutcome> {
        let request_id = Uuid::now_v7();

        audio.validate()?;
        session.begin_processing()?;

        let mode = session.mode();
        let previous_state = session
            .structured_state()
            .filter(|state| !state.is_empty())
            .cloned();
        let previous_document = session
            .document()
            .filter(|doc| !doc.trim().is_empty())
            .map(str::to_string);

        match self
            .run(request_id, mode, previous_state, previous_document, audio)
            .await
        {
            Ok(outcome) => {
                match &outcome.data {
                    SessionData::Structured(state) => {
                        session.commit_structured(state.clone(), outcome.transcript.clone())?
                    }
                    SessionData::Document(document) => {
                        session.commit_document(document.clone(), outcome.transcript.clone())?
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                session.fail();
                error!(
                    request_id = %request_id,
                    mode = mode.as_str(),
                    error = %e,
                    success = false,
                    "recording failed, session state unchanged"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request_id: Uuid,
        mode: SessionMode,
        previous_state: Option<StructuredState>,
        previous_document: Option<String>,
        audio: &AudioInput,
    ) -> Result<RecordingOutcome> {
        let started = Instant::now();
        info!(
            request_id = %request_id,
            mode = mode.as_str(),
            op = "process_recording",
            "processing recording"
        );

        let step = Instant::now();
        let transcription = self.transcription.transcribe(audio).await?;
        let transcription_ms = step.elapsed().as_millis() as u64;
        info!(
            request_id = %request_id,
            op = "transcribe",
            duration_ms = transcription_ms,
            transcript_len = transcription.transcript.len(),
            confidence = transcription.confidence,
            "transcription complete"
        );

        let audio_url = match &audio.source {
            AudioSource::Url(url) => Some(url.clone()),
            AudioSource::Bytes(_) => None,
        };

        let outcome = match mode {
            SessionMode::Structured => {
                self.run_structured(
                    request_id,
                    transcription,
                    previous_state,
                    audio_url,
                    transcription_ms,
                )
                .await?
            }
            SessionMode::Document => {
                self.run_document(
                    request_id,
                    transcription,
                    previous_document,
                    audio_url,
                    transcription_ms,
                )
                .await?
            }
        };

        info!(
            request_id = %request_id,
            op = "process_recording",
            duration_ms = started.elapsed().as_millis() as u64,
            storage_type = outcome.storage.storage_type.as_str(),
            fallback = outcome.used_fallback,
            success = true,
            "recording complete"
        );
        Ok(outcome)
    }

    async fn run_structured(
        &self,
        request_id: Uuid,
        transcription: voxnote_inference::TranscriptionOutput,
        previous: Option<StructuredState>,
        audio_url: Option<String>,
        transcription_ms: u64,
    ) -> Result<RecordingOutcome> {
        let step = Instant::now();
        let extraction = self
            .extraction
            .extract(&transcription.transcript, previous.as_ref(), None)
            .await?;
        let extraction_ms = step.elapsed().as_millis() as u64;
        let mut state = extraction.state;
        info!(
            request_id = %request_id,
            op = "extract",
            duration_ms = extraction_ms,
            task_count = state.tasks.len(),
            event_count = state.events.len(),
            note_count = state.notes.len(),
            fallback = extraction.used_fallback,
            "extraction complete"
        );

        let step = Instant::now();
        let record = NoteRecord::from_state(
            NoteStore::generate_note_id(),
            Utc::now(),
            transcription.transcript.clone(),
            &state,
            audio_url,
        );
        let storage = self.store.persist_structured(&record).await?;
        let storage_ms = step.elapsed().as_millis() as u64;

        let step = Instant::now();
        let attached = calendar::attach_links(&mut state.events);
        let calendar_ms = step.elapsed().as_millis() as u64;
        debug!(
            request_id = %request_id,
            op = "calendar_links",
            duration_ms = calendar_ms,
            event_count = attached,
            "calendar links attached"
        );

        Ok(RecordingOutcome {
            request_id,
            transcript: transcription.transcript,
            confidence: transcription.confidence,
            audio_duration_secs: transcription.duration_secs,
            data: SessionData::Structured(state),
            storage,
            used_fallback: extraction.used_fallback,
            timings: StepTimings {
                transcription_ms,
                extraction_ms,
                storage_ms,
                calendar_ms,
            },
        })
    }

    async fn run_document(
        &self,
        request_id: Uuid,
        transcription: voxnote_inference::TranscriptionOutput,
        previous: Option<String>,
        audio_url: Option<String>,
        transcription_ms: u64,
    ) -> Result<RecordingOutcome> {
        let step = Instant::now();
        let merge = self
            .extraction
            .update_document(&transcription.transcript, previous.as_deref(), None)
            .await?;
        let extraction_ms = step.elapsed().as_millis() as u64;
        info!(
            request_id = %request_id,
            op = "update_document",
            duration_ms = extraction_ms,
            document_len = merge.markdown.len(),
            fallback = merge.used_fallback,
            "document merge complete"
        );

        let step = Instant::now();
        let meta = DocumentNoteMeta::new(
            NoteStore::generate_note_id(),
            Utc::now(),
            transcription.transcript.clone(),
            audio_url,
        );
        let storage = self.store.persist_document(&merge.markdown, &meta).await?;
        let storage_ms = step.elapsed().as_millis() as u64;

        Ok(RecordingOutcome {
            request_id,
            transcript: transcription.transcript,
            confidence: transcription.confidence,
            audio_duration_secs: transcription.duration_secs,
            data: SessionData::Document(merge.markdown),
            storage,
            used_fallback: merge.used_fallback,
            timings: StepTimings {
                transcription_ms,
                extraction_ms,
                storage_ms,
                calendar_ms: 0,
            },
        })
    }
}
