//! Audio payload validation.
//!
//! Recordings arrive either as raw bytes or as a URL the transcription
//! service can fetch. Validation happens before any pipeline step runs:
//! a bad payload is an input error, reported immediately, with no
//! processing attempted.

use tracing::debug;

use crate::defaults;
use crate::error::{Error, Result};

/// Where the audio lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Raw audio bytes, uploaded or recorded.
    Bytes(Vec<u8>),
    /// A URL the transcription service fetches itself.
    Url(String),
}

/// An audio payload plus its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInput {
    pub source: AudioSource,
    pub mime_type: Option<String>,
}

impl AudioInput {
    /// Audio from raw bytes with a declared MIME type.
    pub fn from_bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            source: AudioSource::Bytes(data),
            mime_type: Some(mime_type.into()),
        }
    }

    /// Audio from raw bytes with no declared MIME type; it will be sniffed
    /// from magic bytes during validation.
    pub fn from_raw_bytes(data: Vec<u8>) -> Self {
        Self {
            source: AudioSource::Bytes(data),
            mime_type: None,
        }
    }

    /// Audio fetched by URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            source: AudioSource::Url(url.into()),
            mime_type: None,
        }
    }

    /// The declared MIME type, or one sniffed from magic bytes.
    pub fn resolved_mime(&self) -> Option<String> {
        if let Some(declared) = &self.mime_type {
            return Some(declared.clone());
        }
        match &self.source {
            AudioSource::Bytes(data) => detect_mime(data).map(str::to_string),
            AudioSource::Url(_) => None,
        }
    }

    /// Validate the payload: non-empty, within size bounds, and not a
    /// recognizably non-audio format.
    pub fn validate(&self) -> Result<()> {
        match &self.source {
            AudioSource::Bytes(data) => {
                if data.is_empty() {
                    return Err(Error::InvalidInput("no audio data provided".to_string()));
                }
                if data.len() > defaults::MAX_AUDIO_BYTES {
                    return Err(Error::InvalidInput(format!(
                        "audio payload exceeds {} bytes",
                        defaults::MAX_AUDIO_BYTES
                    )));
                }
                let effective = self
                    .mime_type
                    .clone()
                    .or_else(|| detect_mime(data).map(str::to_string));
                match effective {
                    Some(mime) if is_audio_mime(&mime) => {
                        debug!(mime_type = %mime, "audio payload accepted");
                        Ok(())
                    }
                    Some(mime) => Err(Error::InvalidInput(format!(
                        "payload is not audio (detected {mime})"
                    ))),
                    // Unknown container; the transcription service gets the
                    // final say.
                    None => Ok(()),
                }
            }
            AudioSource::Url(url) => {
                if url.trim().is_empty() {
                    return Err(Error::InvalidInput("audio URL is empty".to_string()));
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(Error::InvalidInput(format!(
                        "audio URL has unsupported scheme: {url}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Sniff a MIME type from magic bytes.
pub fn detect_mime(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

/// Whether a MIME type is acceptable as an audio payload.
///
/// Browser recordings commonly arrive as `video/webm` or `video/mp4`
/// containers holding an audio-only stream, so those pass too.
pub fn is_audio_mime(mime: &str) -> bool {
    mime.starts_with("audio/")
        || matches!(
            mime,
            "video/webm" | "video/mp4" | "application/ogg" | "application/octet-stream"
        )
}

/// File extension for a MIME type, used when a backend needs a filename.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/ogg" | "application/ogg" => "ogg",
        "audio/flac" => "flac",
        "audio/aac" => "aac",
        "audio/webm" | "video/webm" => "webm",
        "audio/mp4" | "video/mp4" => "m4a",
        _ => "wav",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RIFF....WAVE header
    fn wav_bytes() -> Vec<u8> {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"WAVEfmt ");
        data.extend_from_slice(&[0u8; 32]);
        data
    }

    #[test]
    fn test_empty_bytes_rejected() {
        let input = AudioInput::from_raw_bytes(Vec::new());
        let err = input.validate().unwrap_err();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("no audio data")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_declared_audio_mime_accepted() {
        let input = AudioInput::from_bytes(vec![0u8; 64], "audio/webm");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_wav_magic_bytes_detected() {
        let input = AudioInput::from_raw_bytes(wav_bytes());
        assert!(input.validate().is_ok());
        assert_eq!(input.resolved_mime().as_deref(), Some("audio/x-wav"));
    }

    #[test]
    fn test_png_payload_rejected() {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0u8; 32]);
        let input = AudioInput::from_raw_bytes(data);
        let err = input.validate().unwrap_err();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("not audio")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_bytes_pass_through() {
        // Unrecognized container: the transcription service decides.
        let input = AudioInput::from_raw_bytes(vec![0x01, 0x02, 0x03, 0x04]);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let input = AudioInput::from_bytes(vec![0u8; defaults::MAX_AUDIO_BYTES + 1], "audio/wav");
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(AudioInput::from_url("https://example.com/a.mp3")
            .validate()
            .is_ok());
        assert!(AudioInput::from_url("").validate().is_err());
        assert!(AudioInput::from_url("ftp://example.com/a.mp3")
            .validate()
            .is_err());
    }

    #[test]
    fn test_extension_for_mime_table() {
        assert_eq!(extension_for_mime("audio/mpeg"), "mp3");
        assert_eq!(extension_for_mime("video/webm"), "webm");
        assert_eq!(extension_for_mime("audio/unknown"), "wav");
    }

    #[test]
    fn test_is_audio_mime() {
        assert!(is_audio_mime("audio/wav"));
        assert!(is_audio_mime("video/webm"));
        assert!(!is_audio_mime("image/png"));
        assert!(!is_audio_mime("application/pdf"));
    }
}
