//! Error types for voxnote.

use thiserror::Error;

/// Result type alias using voxnote's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for voxnote operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid input (audio payload, session transition)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transcription service unreachable, misconfigured, or returned no usable transcript
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// Generative extraction is unavailable (missing credentials, credit or
    /// rate limits); recovered internally by the fallback extractor
    #[error("Extraction unavailable: {0}")]
    ExtractionUnavailable(String),

    /// Generative extraction failed (including malformed output)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Durable store write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Calendar link could not be built for an event
    #[error("Calendar link error: {0}")]
    CalendarLink(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
