//! Centralized default constants for the voxnote pipeline.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// TRANSCRIPTION
// =============================================================================

/// Environment variable for the Deepgram API key.
pub const ENV_DEEPGRAM_API_KEY: &str = "DEEPGRAM_API_KEY";

/// Default Deepgram API base URL.
pub const DEEPGRAM_BASE_URL: &str = "https://api.deepgram.com";

/// Default transcription model.
pub const TRANSCRIBE_MODEL: &str = "nova-2";

/// Timeout for transcription requests in seconds.
///
/// Long uploads can take minutes on slow upstreams; the pipeline performs
/// no retries, so the ceiling is generous.
pub const TRANSCRIBE_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// EXTRACTION
// =============================================================================

/// Environment variable for the Anthropic API key.
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Default Anthropic API base URL.
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default extraction model.
pub const EXTRACT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Max tokens for a structured extraction response.
pub const EXTRACT_MAX_TOKENS: u32 = 1024;

/// Max tokens for a document-mode response (the whole replacement document).
pub const DOCUMENT_MAX_TOKENS: u32 = 4096;

/// Timeout for extraction requests in seconds.
pub const EXTRACT_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// FALLBACK EXTRACTION
// =============================================================================

/// Minimum clause length (characters) for a clause to become a note.
pub const NOTE_MIN_CLAUSE_CHARS: usize = 10;

/// Category assigned to notes produced by the fallback extractor.
pub const FALLBACK_NOTE_CATEGORY: &str = "general";

/// Document title used when the fallback creates a document from scratch.
pub const DOCUMENT_TITLE: &str = "# My Notes";

/// Notes section heading used by the document-mode fallback.
pub const DOCUMENT_NOTES_HEADING: &str = "## Notes";

// =============================================================================
// AUDIO INPUT
// =============================================================================

/// Maximum audio payload size in bytes (50 MB).
pub const MAX_AUDIO_BYTES: usize = 50 * 1024 * 1024;

// =============================================================================
// STORAGE
// =============================================================================

/// Environment variable for the S3 bucket name.
pub const ENV_S3_BUCKET: &str = "AWS_S3_BUCKET";

/// Environment variable for the AWS region.
pub const ENV_AWS_REGION: &str = "AWS_REGION";

/// Environment variable for the AWS access key id.
pub const ENV_AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable for the AWS secret access key.
pub const ENV_AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Environment variable forcing local storage unconditionally.
pub const ENV_USE_LOCAL_STORAGE: &str = "VOXNOTE_USE_LOCAL_STORAGE";

/// Environment variable forbidding the S3-to-local fallback.
pub const ENV_FORCE_REMOTE_STORAGE: &str = "VOXNOTE_FORCE_REMOTE_STORAGE";

/// Environment variable overriding the local notes directory.
pub const ENV_DATA_DIR: &str = "VOXNOTE_DATA_DIR";

/// Default AWS region.
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Default local directory for persisted notes.
pub const LOCAL_NOTES_DIR: &str = "data/notes";

/// Object key prefix for persisted notes.
pub const NOTE_KEY_PREFIX: &str = "notes/";

/// Random suffix length for generated note ids.
pub const NOTE_ID_SUFFIX_LEN: usize = 9;

// =============================================================================
// CALENDAR
// =============================================================================

/// Google Calendar event-edit deep link base.
pub const CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/r/eventedit";
