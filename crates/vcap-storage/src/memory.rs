//! In-memory object store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::store::{validate_key, ObjectStore};

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Process-local object store for development and tests.
///
/// References use the `memory://` scheme. Presigned URLs carry the TTL as a
/// query parameter so callers can assert on it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    reject_puts: Arc<AtomicBool>,
    reject_presigns: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `put` calls fail, simulating an unavailable bucket.
    pub fn set_reject_puts(&self, reject: bool) {
        self.reject_puts.store(reject, Ordering::SeqCst);
    }

    /// Make subsequent `presign` calls fail.
    pub fn set_reject_presigns(&self, reject: bool) {
        self.reject_presigns.store(reject, Ordering::SeqCst);
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    /// Keys currently stored, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object_url(key: &str) -> String {
        format!("memory://{}", key)
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put(&self, data: Vec<u8>, key: &str, content_type: &str) -> StorageResult<String> {
        validate_key(key)?;
        if self.reject_puts.load(Ordering::SeqCst) {
            return Err(StorageError::upload_failed(format!("store rejected {}", key)));
        }

        debug!(key = %key, bytes = data.len(), "Storing object in memory");
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(Self::object_url(key))
    }

    async fn presign(&self, key: &str, ttl: Duration) -> StorageResult<String> {
        validate_key(key)?;
        if self.reject_presigns.load(Ordering::SeqCst) {
            return Err(StorageError::presign_failed(format!("store rejected {}", key)));
        }
        Ok(format!("{}?expires_in={}", Self::object_url(key), ttl.as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryStore::new();
        let url = store
            .put(b"1\n".to_vec(), "captions/1.srt", "text/plain")
            .await
            .unwrap();

        assert_eq!(url, "memory://captions/1.srt");
        let object = store.get("captions/1.srt").await.unwrap();
        assert_eq!(object.data, b"1\n");
        assert_eq!(object.content_type, "text/plain");
        assert_eq!(store.keys().await, vec!["captions/1.srt".to_string()]);
    }

    #[tokio::test]
    async fn test_presign_carries_ttl() {
        let store = InMemoryStore::new();
        let url = store
            .presign("uploads/a.mp4", Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(url, "memory://uploads/a.mp4?expires_in=3600");
    }

    #[tokio::test]
    async fn test_rejections() {
        let store = InMemoryStore::new();
        store.set_reject_puts(true);
        store.set_reject_presigns(true);

        let err = store.put(vec![1], "a/b", "video/mp4").await.unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
        let err = store.presign("a/b", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, StorageError::PresignFailed(_)));
        assert!(store.get("a/b").await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let store = InMemoryStore::new();
        assert!(store.put(vec![], "", "text/plain").await.is_err());
    }
}
