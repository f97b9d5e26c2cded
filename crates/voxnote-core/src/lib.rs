//! # voxnote-core
//!
//! Core types, contracts, and deterministic logic for the voxnote
//! voice-note capture pipeline.
//!
//! This crate provides the foundational data structures the other voxnote
//! crates depend on:
//! - Extraction and storage wire contracts (tasks, events, notes, storage
//!   results) as explicit serde types
//! - The workspace error taxonomy
//! - Strict validation of generative extraction output
//! - The deterministic fallback extractor used when the generative step is
//!   unavailable
//! - Audio payload validation
//! - Centralized defaults and structured-logging field constants

pub mod audio;
pub mod defaults;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod models;
pub mod schema;
pub mod time_format;

// Re-export commonly used types at crate root
pub use audio::{AudioInput, AudioSource};
pub use error::{Error, Result};
pub use models::*;
