//! Core data models for voxnote.
//!
//! These types are shared across all voxnote crates and mirror the
//! extraction and storage wire contracts exactly: required fields are plain
//! values, optional fields are `Option`, and enums carry lowercase wire
//! names.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_format;

// =============================================================================
// EXTRACTION TYPES
// =============================================================================

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A step within a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// An actionable item extracted from a transcript.
///
/// Tasks carry no stable identity; matching across merges is semantic and
/// performed by the generative step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Create a task with just a title; everything else defaulted.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            priority: Priority::default(),
            subtasks: Vec::new(),
        }
    }
}

/// A calendar event extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, with = "time_format::hhmm_option")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub description: Option<String>,
    /// Populated after link generation; never part of the extraction contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_link: Option<String>,
}

impl Event {
    /// Create an event with a title and date; everything else defaulted.
    pub fn on_date(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date,
            time: None,
            description: None,
            calendar_link: None,
        }
    }
}

/// A free-form note extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// The whole-state merge unit for structured mode.
///
/// A merge replaces the previous state wholesale with a new one of these;
/// there is no diff representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl StructuredState {
    /// True when no tasks, events, or notes are present.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.events.is_empty() && self.notes.is_empty()
    }

    /// Total number of items across all three collections.
    pub fn item_count(&self) -> usize {
        self.tasks.len() + self.events.len() + self.notes.len()
    }
}

/// Result of a structured extraction, with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    pub state: StructuredState,
    /// True when the deterministic fallback extractor produced the state.
    pub used_fallback: bool,
}

/// Result of a document-mode merge, with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    pub markdown: String,
    /// True when the deterministic append fallback produced the document.
    pub used_fallback: bool,
}

// =============================================================================
// STORAGE TYPES
// =============================================================================

/// Which backend persisted a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    S3,
    Local,
}

impl StorageType {
    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            StorageType::S3 => "s3",
            StorageType::Local => "local",
        }
    }
}

/// Uniform outcome of persisting a note, regardless of backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageResult {
    pub note_id: String,
    /// URI with a scheme identifying the backend: `s3://bucket/key` or
    /// `file:///path`.
    pub storage_url: String,
    pub created_at: DateTime<Utc>,
    pub storage_type: StorageType,
}

/// Persisted note record for structured mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub transcript: String,
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl NoteRecord {
    /// Assemble a record from a merged state snapshot.
    pub fn from_state(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        transcript: impl Into<String>,
        state: &StructuredState,
        audio_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            transcript: transcript.into(),
            tasks: state.tasks.clone(),
            events: state.events.clone(),
            notes: state.notes.clone(),
            audio_url,
        }
    }
}

fn markdown_format() -> String {
    "markdown".to_string()
}

/// Sidecar metadata persisted next to a document-mode markdown file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNoteMeta {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default = "markdown_format")]
    pub format: String,
}

impl DocumentNoteMeta {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        transcript: impl Into<String>,
        audio_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            transcript: transcript.into(),
            audio_url,
            format: markdown_format(),
        }
    }
}
