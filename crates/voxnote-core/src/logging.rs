//! Structured logging schema and field name constants for voxnote.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Recording failed, requires caller attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, step completions |
//! | DEBUG | Decision points, intermediate values, config choices |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across one recording's pipeline steps.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "inference", "storage", "session"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "transcribe", "extract", "persist", "process_recording"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Generated note id being persisted.
pub const NOTE_ID: &str = "note_id";

/// Session capture mode ("structured" or "document").
pub const MODE: &str = "mode";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Character length of a transcript.
pub const TRANSCRIPT_LEN: &str = "transcript_len";

/// Number of tasks in a merged state.
pub const TASK_COUNT: &str = "task_count";

/// Number of events in a merged state.
pub const EVENT_COUNT: &str = "event_count";

/// Number of notes in a merged state.
pub const NOTE_COUNT: &str = "note_count";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for transcription or extraction.
pub const MODEL: &str = "model";

/// Whether the deterministic fallback extractor was used.
pub const FALLBACK: &str = "fallback";

// ─── Storage fields ────────────────────────────────────────────────────────

/// Backend that persisted the note ("s3" or "local").
pub const STORAGE_TYPE: &str = "storage_type";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
