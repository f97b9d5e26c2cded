//! Atomic local filesystem writes.

use std::path::Path;

use tempfile::NamedTempFile;

use voxnote_core::{Error, Result};

/// Write `content` to `target` atomically: the bytes land in a temp file in
/// the same directory, then replace the target in one rename. Parent
/// directories are created as needed.
pub async fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    let parent = target
        .parent()
        .ok_or_else(|| Error::Storage(format!("target has no parent: {}", target.display())))?;
    tokio::fs::create_dir_all(parent).await?;

    let temp = NamedTempFile::new_in(parent)?;
    tokio::fs::write(temp.path(), content).await?;
    temp.persist(target)
        .map_err(|e| Error::Storage(format!("failed to persist {}: {e}", target.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_atomic_write_creates_file() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("note.json");

        atomic_write(&target, br#"{"key": "value"}"#).await.unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), r#"{"key": "value"}"#);
    }

    #[tokio::test]
    async fn test_atomic_write_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("nested").join("dir").join("note.json");

        atomic_write(&target, b"content").await.unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "content");
    }

    #[tokio::test]
    async fn test_atomic_write_overwrites_existing() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("note.json");
        fs::write(&target, "old").unwrap();

        atomic_write(&target, b"new").await.unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }
}
