//! Session lifecycle and accumulated state.
//!
//! A session owns one accumulated state (structured collections or a
//! Markdown document) across a sequence of recordings. The capture mode is
//! fixed for the session's lifetime; switching requires a cleared session.
//!
//! Phases: `Idle → Capturing → Processing → Complete | Error`, with
//! "continue" (`Complete → Capturing`) and "reset" (any phase → `Idle`,
//! state cleared).

use serde::{Deserialize, Serialize};

use voxnote_core::{Error, Result, StructuredState};

/// How the session accumulates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Typed collections of tasks, events, and notes.
    Structured,
    /// A single Markdown document.
    Document,
}

impl SessionMode {
    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            SessionMode::Structured => "structured",
            SessionMode::Document => "document",
        }
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Capturing,
    Processing,
    Complete,
    Error,
}

/// The accumulated state, by mode.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionData {
    Structured(StructuredState),
    Document(String),
}

impl SessionData {
    fn empty_for(mode: SessionMode) -> Self {
        match mode {
            SessionMode::Structured => SessionData::Structured(StructuredState::default()),
            SessionMode::Document => SessionData::Document(String::new()),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            SessionData::Structured(state) => state.is_empty(),
            SessionData::Document(doc) => doc.trim().is_empty(),
        }
    }
}

/// One user's capture session: accumulated state, transcript history, and
/// lifecycle phase. Single-owner; no step mutates it concurrently.
#[derive(Debug, Clone)]
pub struct Session {
    mode: SessionMode,
    phase: SessionPhase,
    data: SessionData,
    transcripts: Vec<String>,
    recording_count: u32,
}

impl Session {
    /// Create an idle session in the given mode with empty state.
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            phase: SessionPhase::Idle,
            data: SessionData::empty_for(mode),
            transcripts: Vec::new(),
            recording_count: 0,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn recording_count(&self) -> u32 {
        self.recording_count
    }

    /// Raw transcripts of every committed recording, oldest first.
    pub fn transcripts(&self) -> &[String] {
        &self.transcripts
    }

    /// The accumulated structured state, in structured mode.
    pub fn structured_state(&self) -> Option<&StructuredState> {
        match &self.data {
            SessionData::Structured(state) => Some(state),
            SessionData::Document(_) => None,
        }
    }

    /// The accumulated Markdown document, in document mode.
    pub fn document(&self) -> Option<&str> {
        match &self.data {
            SessionData::Document(doc) => Some(doc.as_str()),
            SessionData::Structured(_) => None,
        }
    }

    /// Whether the session holds nothing: no state, no history, idle.
    pub fn is_cleared(&self) -> bool {
        self.phase == SessionPhase::Idle
            && self.recording_count == 0
            && self.transcripts.is_empty()
            && self.data.is_empty()
    }

    /// Begin a recording: `Idle → Capturing`, or `Complete → Capturing`
    /// ("continue", keeping the accumulated state).
    pub fn begin_capture(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::Idle | SessionPhase::Complete => {
                self.phase = SessionPhase::Capturing;
                Ok(())
            }
            other => Err(Error::InvalidInput(format!(
                "cannot begin capture from the {other:?} phase"
            ))),
        }
    }

    /// Audio finalized: `Capturing → Processing`.
    pub(crate) fn begin_processing(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::Capturing => {
                self.phase = SessionPhase::Processing;
                Ok(())
            }
            other => Err(Error::InvalidInput(format!(
                "cannot process a recording from the {other:?} phase"
            ))),
        }
    }

    /// Commit a structured merge: replace the state wholesale, append the
    /// transcript, bump the counter, `Processing → Complete`.
    pub(crate) fn commit_structured(
        &mut self,
        state: StructuredState,
        transcript: String,
    ) -> Result<()> {
        self.ensure_processing()?;
        if self.mode != SessionMode::Structured {
            return Err(Error::Internal(
                "structured commit against a document-mode session".to_string(),
            ));
        }
        self.data = SessionData::Structured(state);
        self.finish_commit(transcript);
        Ok(())
    }

    /// Commit a document merge: replace the document wholesale.
    pub(crate) fn commit_document(&mut self, document: String, transcript: String) -> Result<()> {
        self.ensure_processing()?;
        if self.mode != SessionMode::Document {
            return Err(Error::Internal(
                "document commit against a structured-mode session".to_string(),
            ));
        }
        self.data = SessionData::Document(document);
        self.finish_commit(transcript);
        Ok(())
    }

    /// A pipeline stage failed: `Processing → Error`, accumulated state
    /// untouched.
    pub(crate) fn fail(&mut self) {
        self.phase = SessionPhase::Error;
    }

    /// Clear everything: any phase → `Idle`, state emptied, counter zeroed,
    /// history cleared.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.data = SessionData::empty_for(self.mode);
        self.transcripts.clear();
        self.recording_count = 0;
    }

    /// Switch capture mode. Only valid on a cleared session; a session's
    /// state representation is fixed for its lifetime.
    pub fn switch_mode(&mut self, mode: SessionMode) -> Result<()> {
        if !self.is_cleared() {
            return Err(Error::InvalidInput(
                "cannot switch mode on a session with accumulated state; reset first".to_string(),
            ));
        }
        self.mode = mode;
        self.data = SessionData::empty_for(mode);
        Ok(())
    }

    fn ensure_processing(&self) -> Result<()> {
        if self.phase != SessionPhase::Processing {
            return Err(Error::Internal(format!(
                "commit outside the Processing phase ({:?})",
                self.phase
            )));
        }
        Ok(())
    }

    fn finish_commit(&mut self, transcript: String) {
        self.transcripts.push(transcript);
        self.recording_count += 1;
        self.phase = SessionPhase::Complete;
    }
}
