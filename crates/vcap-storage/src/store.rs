//! Object store contract.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};

/// Durable object storage as seen by the captioning pipeline.
///
/// Presigned URLs must be fetchable by third parties (transcription and
/// render services) without credentials and expire after `ttl`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return its durable reference.
    async fn put(&self, data: Vec<u8>, key: &str, content_type: &str) -> StorageResult<String>;

    /// Create a temporary GET URL for `key`.
    async fn presign(&self, key: &str, ttl: Duration) -> StorageResult<String>;

    /// Check that the backing service is reachable.
    async fn check_connectivity(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Reject keys that are empty, absolute or contain parent segments.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::invalid_key("key is empty"));
    }
    if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::invalid_key(key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("uploads/abc.mp4").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("uploads/../secret").is_err());
    }
}
