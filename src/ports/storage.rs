use crate::error::StorageError;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Fetch an object. Missing keys yield `StorageError::NotFound`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Store an object, replacing any previous content.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Download an object from storage to a local path
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        let bytes = self.get(key).await?;
        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(local_path, bytes).await?;
        Ok(())
    }

    /// Upload a file from a local path to storage
    async fn upload(&self, local_path: &Path, key: &str) -> Result<(), StorageError> {
        let bytes = tokio::fs::read(local_path).await?;
        self.put(key, bytes).await
    }
}
