//! Storage configuration.
//!
//! The storage policy is an explicit value object passed to
//! [`crate::NoteStore`], not a set of flags read ambiently at call sites.
//! `from_env` exists as a convenience for binaries and mirrors the
//! environment variables the rest of the stack uses.

use std::path::PathBuf;

use voxnote_core::{defaults, Error, Result};

/// Credentials and location for the remote (S3) backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Storage backend selection policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Use local storage unconditionally, even when a remote is configured.
    pub prefer_local: bool,
    /// Forbid the S3-to-local fallback: a remote write failure propagates.
    pub force_remote: bool,
    /// Remote backend, when configured.
    pub remote: Option<RemoteStorageConfig>,
    /// Directory for locally persisted notes.
    pub local_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prefer_local: false,
            force_remote: false,
            remote: None,
            local_dir: PathBuf::from(defaults::LOCAL_NOTES_DIR),
        }
    }
}

impl StorageConfig {
    /// Local-only configuration writing into the given directory.
    pub fn local_only(local_dir: impl Into<PathBuf>) -> Self {
        Self {
            prefer_local: true,
            local_dir: local_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables with fallback to
    /// defaults. The remote backend is configured only when both key
    /// halves and a bucket are present.
    pub fn from_env() -> Self {
        let truthy = |name: &str| {
            std::env::var(name)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        let remote = match (
            std::env::var(defaults::ENV_AWS_ACCESS_KEY_ID),
            std::env::var(defaults::ENV_AWS_SECRET_ACCESS_KEY),
            std::env::var(defaults::ENV_S3_BUCKET),
        ) {
            (Ok(access_key_id), Ok(secret_access_key), Ok(bucket))
                if !access_key_id.is_empty() && !secret_access_key.is_empty() && !bucket.is_empty() =>
            {
                Some(RemoteStorageConfig {
                    bucket,
                    region: std::env::var(defaults::ENV_AWS_REGION)
                        .unwrap_or_else(|_| defaults::DEFAULT_AWS_REGION.to_string()),
                    access_key_id,
                    secret_access_key,
                })
            }
            _ => None,
        };

        Self {
            prefer_local: truthy(defaults::ENV_USE_LOCAL_STORAGE),
            force_remote: truthy(defaults::ENV_FORCE_REMOTE_STORAGE),
            remote,
            local_dir: std::env::var(defaults::ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(defaults::LOCAL_NOTES_DIR)),
        }
    }

    /// Reject contradictory policies.
    pub fn validate(&self) -> Result<()> {
        if self.force_remote && self.remote.is_none() {
            return Err(Error::Config(
                "force_remote is set but no remote storage is configured".to_string(),
            ));
        }
        if self.force_remote && self.prefer_local {
            return Err(Error::Config(
                "force_remote and prefer_local are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}
