//! In-memory storage and queue used by the stage and runner tests.

use crate::domain::messages::PodMessage;
use crate::domain::pod::MediaPod;
use crate::error::{BoxError, StorageError};
use crate::ports::queue::MessageQueuePort;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}

/// Queue that hands out pre-loaded messages and records what is published.
#[derive(Clone, Default)]
pub struct MemoryQueue {
    inbound: Arc<RwLock<VecDeque<PodMessage>>>,
    published: Arc<RwLock<Vec<PodMessage>>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_inbound(&self, message: PodMessage) {
        self.inbound.write().await.push_back(message);
    }

    pub async fn published(&self) -> Vec<PodMessage> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl MessageQueuePort for MemoryQueue {
    async fn publish(&self, pod: &MediaPod, message_type: &str) -> Result<(), BoxError> {
        self.published
            .write()
            .await
            .push(PodMessage::new(pod.clone(), message_type));
        Ok(())
    }

    async fn receive(&self, _timeout_secs: f64) -> Result<Option<PodMessage>, BoxError> {
        Ok(self.inbound.write().await.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_get_missing_key_is_not_found() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.get("u/p/audios/a_1.mp3").await,
            Err(StorageError::NotFound(key)) if key == "u/p/audios/a_1.mp3"
        ));
    }

    #[tokio::test]
    async fn test_download_and_upload_through_files() {
        let storage = MemoryStorage::new();
        storage.put("u/p/videos/a.mp4", b"video".to_vec()).await.unwrap();
        let dir = tempdir().unwrap();
        let local = dir.path().join("nested").join("a.mp4");

        storage.download("u/p/videos/a.mp4", &local).await.unwrap();
        assert_eq!(std::fs::read(&local).unwrap(), b"video");

        storage.upload(&local, "u/p/videos/b.mp4").await.unwrap();
        assert_eq!(storage.get("u/p/videos/b.mp4").await.unwrap(), b"video");

        storage.delete("u/p/videos/a.mp4").await.unwrap();
        assert!(!storage.contains("u/p/videos/a.mp4").await);
    }
}
