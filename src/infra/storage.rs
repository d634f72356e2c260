//! Object storage abstraction for uploaded assets.
//!
//! The real storage provider is an external collaborator; this trait is the
//! seam. `LocalStorage` keeps assets on the local filesystem for development
//! and tests.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage backend trait for dependency injection.
///
/// Keys are generated by the file service (uuid + extension), never taken
/// from user input.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store an object under a key, overwriting any previous content
    async fn put(&self, key: &str, bytes: &[u8]) -> AppResult<()>;

    /// Remove an object. Removing a missing object is an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Filesystem-backed storage rooted at a configured directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create upload dir: {}", e)))?;

        tokio::fs::write(self.path_for(key), bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to store object {}: {}", key, e)))?;

        tracing::debug!(key = %key, bytes = bytes.len(), "Object stored");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        tokio::fs::remove_file(self.path_for(key))
            .await
            .map_err(|e| AppError::internal(format!("Failed to delete object {}: {}", key, e)))?;

        tracing::debug!(key = %key, "Object deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_delete_round_trip() {
        let dir = std::env::temp_dir().join(format!("campus-storage-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(&dir);

        storage.put("abc.pdf", b"content").await.unwrap();
        let stored = tokio::fs::read(dir.join("abc.pdf")).await.unwrap();
        assert_eq!(stored, b"content");

        storage.delete("abc.pdf").await.unwrap();
        assert!(tokio::fs::read(dir.join("abc.pdf")).await.is_err());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_delete_missing_object_fails() {
        let dir = std::env::temp_dir().join(format!("campus-storage-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(&dir);

        assert!(storage.delete("missing.pdf").await.is_err());
    }
}
