//! Filesystem-backed blob store for item images.
//!
//! Blobs are keyed by a generated filename (thumbnails under a
//! `thumbnails/` prefix) and served statically; the public URL is derived
//! deterministically from the key.

use std::path::PathBuf;

use tokio::fs;

use crate::errors::InternalError;

/// URL path under which the media directory is mounted.
pub const MEDIA_MOUNT: &str = "/media";

pub struct BlobStore {
    root: PathBuf,
    public_base: String,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        let mut public_base = public_base.into();
        while public_base.ends_with('/') {
            public_base.pop();
        }
        Self {
            root: root.into(),
            public_base,
        }
    }

    /// Write a blob under `key` and return its public URL.
    pub async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, InternalError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| InternalError::blob("create_blob_dir", e))?;
        }
        fs::write(&path, bytes)
            .await
            .map_err(|e| InternalError::blob("write_blob", e))?;

        tracing::debug!(key, bytes = bytes.len(), "stored blob");
        Ok(self.public_url(key))
    }

    /// Remove a blob. Missing blobs are not an error; delete is idempotent.
    pub async fn delete(&self, key: &str) -> Result<(), InternalError> {
        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InternalError::blob("delete_blob", e)),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}/{}", self.public_base, MEDIA_MOUNT, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path(), "http://localhost:3000/");

        let url = store.put("abc.jpg", b"bytes").await.unwrap();
        assert_eq!(url, "http://localhost:3000/media/abc.jpg");
        assert!(dir.path().join("abc.jpg").exists());

        store.delete("abc.jpg").await.unwrap();
        assert!(!dir.path().join("abc.jpg").exists());

        // deleting again is fine
        store.delete("abc.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn thumbnail_keys_create_their_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path(), "http://localhost:3000");

        let url = store.put("thumbnails/abc.jpg", b"bytes").await.unwrap();
        assert_eq!(url, "http://localhost:3000/media/thumbnails/abc.jpg");
        assert!(dir.path().join("thumbnails/abc.jpg").exists());
    }
}
