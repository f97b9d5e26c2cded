//! Note persistence with the backend selection and fallback policy.
//!
//! Selection order per call:
//! 1. `prefer_local` set → local, unconditionally.
//! 2. Remote configured → attempt S3; on failure fall back to local unless
//!    `force_remote` is set, in which case the failure propagates and
//!    nothing is written locally.
//! 3. Otherwise → local.
//!
//! Every outcome is normalized into a [`StorageResult`] whose
//! `storage_type` names the backend that actually received the bytes.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info, warn};

use voxnote_core::{
    defaults, DocumentNoteMeta, Error, NoteRecord, Result, StorageResult, StorageType,
};

use crate::config::StorageConfig;
use crate::local::atomic_write;
use crate::object_store::{ObjectStore, S3ObjectStore};

/// One file belonging to a persisted note.
struct StoredFile {
    name: String,
    bytes: Vec<u8>,
    content_type: &'static str,
}

/// Durable store for note payloads.
pub struct NoteStore {
    config: StorageConfig,
    remote: Option<Arc<dyn ObjectStore>>,
}

impl NoteStore {
    /// Create a store from configuration, constructing the S3 client when a
    /// remote is configured and not bypassed.
    pub fn new(config: StorageConfig) -> Result<Self> {
        config.validate()?;
        let remote = if config.prefer_local {
            None
        } else {
            config
                .remote
                .as_ref()
                .map(|r| Arc::new(S3ObjectStore::new(r)) as Arc<dyn ObjectStore>)
        };
        Ok(Self { config, remote })
    }

    /// Create a store with an injected object store (tests, alternate
    /// backends).
    pub fn with_object_store(config: StorageConfig, store: Arc<dyn ObjectStore>) -> Result<Self> {
        config.validate()?;
        let remote = if config.prefer_local { None } else { Some(store) };
        Ok(Self { config, remote })
    }

    /// Generate a note id from creation time and randomness.
    ///
    /// Uniqueness is best-effort, not cryptographically guaranteed.
    pub fn generate_note_id() -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(defaults::NOTE_ID_SUFFIX_LEN)
            .map(|c| (c as char).to_ascii_lowercase())
            .collect();
        format!("note_{millis}_{suffix}")
    }

    /// Persist a structured-mode note record as a single JSON document.
    pub async fn persist_structured(&self, record: &NoteRecord) -> Result<StorageResult> {
        let json = serde_json::to_vec_pretty(record)?;
        let files = vec![StoredFile {
            name: format!("{}.json", record.id),
            bytes: json,
            content_type: "application/json",
        }];
        self.persist(&record.id, record.timestamp, files).await
    }

    /// Persist a document-mode note: the Markdown file plus a JSON sidecar
    /// carrying its metadata. The result URL points at the Markdown file.
    pub async fn persist_document(
        &self,
        markdown: &str,
        meta: &DocumentNoteMeta,
    ) -> Result<StorageResult> {
        let sidecar = serde_json::to_vec_pretty(meta)?;
        let files = vec![
            StoredFile {
                name: format!("{}.md", meta.id),
                bytes: markdown.as_bytes().to_vec(),
                content_type: "text/markdown",
            },
            StoredFile {
                name: format!("{}.meta.json", meta.id),
                bytes: sidecar,
                content_type: "application/json",
            },
        ];
        self.persist(&meta.id, meta.timestamp, files).await
    }

    /// Apply the selection policy; the first file is the primary one the
    /// result URL points at.
    async fn persist(
        &self,
        note_id: &str,
        created_at: DateTime<Utc>,
        files: Vec<StoredFile>,
    ) -> Result<StorageResult> {
        if let Some(remote) = &self.remote {
            match self.put_remote(remote.as_ref(), &files).await {
                Ok(url) => {
                    info!(note_id = %note_id, storage_type = "s3", url = %url, "note persisted");
                    return Ok(StorageResult {
                        note_id: note_id.to_string(),
                        storage_url: url,
                        created_at,
                        storage_type: StorageType::S3,
                    });
                }
                Err(e) if self.config.force_remote => {
                    return Err(e);
                }
                Err(e) => {
                    warn!(note_id = %note_id, error = %e, "remote write failed, falling back to local storage");
                }
            }
        }

        let url = self.put_local(&files).await?;
        info!(note_id = %note_id, storage_type = "local", url = %url, "note persisted");
        Ok(StorageResult {
            note_id: note_id.to_string(),
            storage_url: url,
            created_at,
            storage_type: StorageType::Local,
        })
    }

    async fn put_remote(&self, remote: &dyn ObjectStore, files: &[StoredFile]) -> Result<String> {
        for file in files {
            let key = format!("{}{}", defaults::NOTE_KEY_PREFIX, file.name);
            remote.put(&key, file.bytes.clone(), file.content_type).await?;
        }
        let primary = &files[0];
        Ok(format!(
            "s3://{}/{}{}",
            remote.bucket(),
            defaults::NOTE_KEY_PREFIX,
            primary.name
        ))
    }

    async fn put_local(&self, files: &[StoredFile]) -> Result<String> {
        for file in files {
            let target = self.config.local_dir.join(&file.name);
            debug!(path = %target.display(), "writing note file");
            atomic_write(&target, &file.bytes).await?;
        }
        let primary: PathBuf = self.config.local_dir.join(&files[0].name);
        let absolute = std::path::absolute(&primary).unwrap_or(primary);
        Ok(format!("file://{}", absolute.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;
    use voxnote_core::models::{StructuredState, Task};

    /// Object store that always fails, simulating an unreachable bucket.
    struct FailingObjectStore;

    #[async_trait]
    impl ObjectStore for FailingObjectStore {
        async fn put(&self, key: &str, _body: Vec<u8>, _content_type: &str) -> Result<()> {
            Err(Error::Storage(format!("simulated S3 outage for {key}")))
        }

        fn bucket(&self) -> &str {
            "unreachable-bucket"
        }
    }

    /// Object store that records puts and succeeds.
    struct RecordingObjectStore {
        puts: AtomicUsize,
    }

    impl RecordingObjectStore {
        fn new() -> Self {
            Self {
                puts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for RecordingObjectStore {
        async fn put(&self, _key: &str, _body: Vec<u8>, _content_type: &str) -> Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn bucket(&self) -> &str {
            "recording-bucket"
        }
    }

    fn sample_record() -> NoteRecord {
        let state = StructuredState {
            tasks: vec![Task::with_title("Call the dentist")],
            ..Default::default()
        };
        NoteRecord::from_state(
            NoteStore::generate_note_id(),
            Utc::now(),
            "Remind me to call the dentist.",
            &state,
            None,
        )
    }

    #[test]
    fn test_note_id_shape() {
        let id = NoteStore::generate_note_id();
        assert!(id.starts_with("note_"));
        let suffix = id.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), defaults::NOTE_ID_SUFFIX_LEN);
        assert_ne!(id, NoteStore::generate_note_id());
    }

    #[tokio::test]
    async fn test_local_persist_roundtrip() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(StorageConfig::local_only(dir.path())).unwrap();
        let record = sample_record();

        let result = store.persist_structured(&record).await.unwrap();

        assert_eq!(result.storage_type, StorageType::Local);
        assert!(result.storage_url.starts_with("file://"));
        assert_eq!(result.note_id, record.id);

        let written = std::fs::read_to_string(dir.path().join(format!("{}.json", record.id)))
            .unwrap();
        let parsed: NoteRecord = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, record);
    }

    #[tokio::test]
    async fn test_remote_success_labeled_s3() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            local_dir: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };
        let remote = Arc::new(RecordingObjectStore::new());
        let store = NoteStore::with_object_store(config, remote.clone()).unwrap();
        let record = sample_record();

        let result = store.persist_structured(&record).await.unwrap();

        assert_eq!(result.storage_type, StorageType::S3);
        assert_eq!(
            result.storage_url,
            format!("s3://recording-bucket/notes/{}.json", record.id)
        );
        assert_eq!(remote.puts.load(Ordering::SeqCst), 1);
        // Nothing hit the local directory.
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            local_dir: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };
        let store = NoteStore::with_object_store(config, Arc::new(FailingObjectStore)).unwrap();
        let record = sample_record();

        let result = store.persist_structured(&record).await.unwrap();

        assert_eq!(result.storage_type, StorageType::Local);
        assert!(result.storage_url.starts_with("file://"));
        assert!(dir.path().join(format!("{}.json", record.id)).exists());
    }

    #[tokio::test]
    async fn test_force_remote_failure_propagates_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            force_remote: true,
            remote: Some(crate::config::RemoteStorageConfig {
                bucket: "unreachable-bucket".to_string(),
                region: "us-east-1".to_string(),
                access_key_id: "AKIATEST".to_string(),
                secret_access_key: "secret".to_string(),
            }),
            local_dir: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };
        let store = NoteStore::with_object_store(config, Arc::new(FailingObjectStore)).unwrap();
        let record = sample_record();

        let err = store.persist_structured(&record).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_prefer_local_never_touches_remote() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            prefer_local: true,
            local_dir: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };
        let remote = Arc::new(RecordingObjectStore::new());
        let store = NoteStore::with_object_store(config, remote.clone()).unwrap();

        let result = store.persist_structured(&sample_record()).await.unwrap();

        assert_eq!(result.storage_type, StorageType::Local);
        assert_eq!(remote.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_document_persist_writes_markdown_and_sidecar() {
        let dir = tempdir().unwrap();
        let store = NoteStore::new(StorageConfig::local_only(dir.path())).unwrap();
        let meta = DocumentNoteMeta::new(
            NoteStore::generate_note_id(),
            Utc::now(),
            "I bought the milk.",
            None,
        );
        let markdown = "# My Notes\n\n## Tasks\n- [x] Buy milk\n";

        let result = store.persist_document(markdown, &meta).await.unwrap();

        assert!(result.storage_url.ends_with(&format!("{}.md", meta.id)));
        let written_md =
            std::fs::read_to_string(dir.path().join(format!("{}.md", meta.id))).unwrap();
        assert_eq!(written_md, markdown);

        let sidecar =
            std::fs::read_to_string(dir.path().join(format!("{}.meta.json", meta.id))).unwrap();
        let parsed: DocumentNoteMeta = serde_json::from_str(&sidecar).unwrap();
        assert_eq!(parsed.format, "markdown");
        assert_eq!(parsed.transcript, "I bought the milk.");
    }

    #[tokio::test]
    async fn test_document_remote_url_points_at_markdown() {
        let config = StorageConfig::default();
        let remote = Arc::new(RecordingObjectStore::new());
        let store = NoteStore::with_object_store(config, remote.clone()).unwrap();
        let meta = DocumentNoteMeta::new("note_1_abcdefghi", Utc::now(), "t", None);

        let result = store.persist_document("# Doc\n", &meta).await.unwrap();

        assert_eq!(
            result.storage_url,
            "s3://recording-bucket/notes/note_1_abcdefghi.md"
        );
        assert_eq!(remote.puts.load(Ordering::SeqCst), 2);
    }
}
