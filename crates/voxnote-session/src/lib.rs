//! # voxnote-session
//!
//! Session lifecycle and the per-recording processing pipeline.
//!
//! A [`Session`] owns the accumulated state (structured collections or a
//! Markdown document) for a sequence of recordings; the [`Processor`] runs
//! each finalized recording through the strictly sequential pipeline
//! (transcribe → extract/merge → persist → calendar links) and commits the
//! merged state only when every fatal step succeeded.

pub mod calendar;
pub mod pipeline;
pub mod session;

// Re-export core types
pub use voxnote_core::{Error, Result};

pub use pipeline::{Processor, RecordingOutcome, StepTimings};
pub use session::{Session, SessionData, SessionMode, SessionPhase};
