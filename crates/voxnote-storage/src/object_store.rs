//! Object store trait and S3 implementation.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use voxnote_core::{Error, Result};

use crate::config::RemoteStorageConfig;

/// Remote object storage.
///
/// A trait seam so the fallback policy in [`crate::NoteStore`] can be
/// exercised against injected failures without a network.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write one object.
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Bucket (or equivalent namespace) objects land in.
    fn bucket(&self) -> &str;
}

/// S3-backed object store.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from explicit remote credentials.
    pub fn new(remote: &RemoteStorageConfig) -> Self {
        let credentials = Credentials::from_keys(
            remote.access_key_id.clone(),
            remote.secret_access_key.clone(),
            None,
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(remote.region.clone()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: remote.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        debug!(bucket = %self.bucket, key = %key, bytes = body.len(), "putting object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("S3 put of {key} failed: {e}")))?;
        Ok(())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
