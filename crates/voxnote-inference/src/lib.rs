//! # voxnote-inference
//!
//! Transcription and generative extraction backends for voxnote.
//!
//! This crate provides:
//! - Pluggable transcription backend trait with a Deepgram implementation
//! - Pluggable extraction backend trait with an Anthropic implementation
//! - Prompt builders for structured extraction and document-mode merging
//! - Provider error classification (which failures trigger the
//!   deterministic fallback vs. propagate)
//! - [`ExtractionService`], the real-or-fallback dispatch layer
//!
//! # Feature Flags
//!
//! - `mock`: expose builder-style mock backends for downstream tests

pub mod error;
pub mod extractor;
pub mod prompts;
pub mod service;
pub mod transcription;

// Mock backends for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use voxnote_core::{Error, Result};

pub use error::AnthropicErrorCode;
pub use extractor::{ClaudeBackend, ClaudeConfig, ExtractionBackend};
pub use service::ExtractionService;
pub use transcription::{
    DeepgramBackend, DeepgramConfig, TranscriptionBackend, TranscriptionOutput,
};
