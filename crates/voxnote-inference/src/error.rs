//! Anthropic-specific error classification.
//!
//! The pipeline distinguishes two classes of generative failure: those
//! recovered by the deterministic fallback (missing credentials, exhausted
//! credits, rate limits) and everything else, which must propagate as an
//! extraction failure.

use voxnote_core::Error;

/// Anthropic API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnthropicErrorCode {
    /// Invalid or missing authentication credentials.
    AuthenticationError,
    /// Credit balance or quota exhausted.
    CreditExhausted,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Malformed request (model's side of the contract is fine).
    InvalidRequest,
    /// Service overloaded.
    Overloaded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl AnthropicErrorCode {
    /// Determine error code from HTTP status, error type, and message.
    pub fn from_response(status: u16, error_type: &str, message: &str) -> Self {
        match (status, error_type) {
            (401, _) | (403, _) | (_, "authentication_error") => Self::AuthenticationError,
            (429, _) | (_, "rate_limit_error") => Self::RateLimitExceeded,
            (400, _) if message.contains("credit balance") => Self::CreditExhausted,
            (_, "overloaded_error") | (529, _) => Self::Overloaded,
            (400, _) | (_, "invalid_request_error") => Self::InvalidRequest,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether this failure class is recovered by the deterministic
    /// fallback extractor. Only unavailable-credentials and
    /// rate/credit-limit classes qualify; everything else propagates.
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationError | Self::CreditExhausted | Self::RateLimitExceeded
        )
    }
}

/// Convert a classified Anthropic failure to a voxnote error.
pub fn to_voxnote_error(code: AnthropicErrorCode, message: &str) -> Error {
    if code.triggers_fallback() {
        return Error::ExtractionUnavailable(match code {
            AnthropicErrorCode::AuthenticationError => {
                format!("authentication failed: {message}")
            }
            AnthropicErrorCode::CreditExhausted => format!("credit exhausted: {message}"),
            _ => format!("rate limited: {message}"),
        });
    }
    match code {
        AnthropicErrorCode::InvalidRequest => {
            Error::Extraction(format!("invalid request: {message}"))
        }
        AnthropicErrorCode::Overloaded => Error::Extraction(format!("overloaded: {message}")),
        AnthropicErrorCode::ServerError => Error::Extraction(format!("server error: {message}")),
        _ => Error::Extraction(message.to_string()),
    }
}
