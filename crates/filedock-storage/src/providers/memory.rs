//! In-memory object store.
//!
//! Used by tests and the `memory` provider profile. Removals can be made
//! to fail on demand to exercise partial-failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_core::traits::storage::{ObjectStore, PresignedUrl};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// Object store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<HashMap<String, HashMap<String, StoredObject>>>,
    bucket_creations: AtomicUsize,
    fail_removes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `create_bucket` has been called.
    pub fn bucket_creations(&self) -> usize {
        self.bucket_creations.load(Ordering::SeqCst)
    }

    /// Make every subsequent `remove` fail with a storage error.
    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    /// Number of objects in a bucket.
    pub async fn object_count(&self, bucket: &str) -> usize {
        self.buckets
            .read()
            .await
            .get(bucket)
            .map_or(0, HashMap::len)
    }

    /// The content type an object was stored with.
    pub async fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.buckets
            .read()
            .await
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|o| o.content_type.clone())
    }
}

fn no_bucket(bucket: &str) -> AppError {
    AppError::storage(format!("Bucket does not exist: {bucket}"))
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        Ok(self.buckets.read().await.contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        self.bucket_creations.fetch_add(1, Ordering::SeqCst);
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default();
        Ok(())
    }

    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let mut buckets = self.buckets.write().await;
        let objects = buckets.get_mut(bucket).ok_or_else(|| no_bucket(bucket))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        let buckets = self.buckets.read().await;
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|o| o.data.clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {key}")))
    }

    async fn copy(&self, bucket: &str, from: &str, to: &str) -> AppResult<()> {
        let mut buckets = self.buckets.write().await;
        let objects = buckets.get_mut(bucket).ok_or_else(|| no_bucket(bucket))?;
        let source = objects
            .get(from)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {from}")))?;
        objects.insert(to.to_string(), source);
        Ok(())
    }

    async fn remove(&self, bucket: &str, key: &str) -> AppResult<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Failed to remove object: {key}")));
        }
        if let Some(objects) = self.buckets.write().await.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .get(bucket)
            .is_some_and(|objects| objects.contains_key(key)))
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> AppResult<PresignedUrl> {
        let ttl = chrono::Duration::from_std(expires_in)
            .map_err(|_| AppError::internal("Invalid link lifetime"))?;
        let expires_at = Utc::now() + ttl;
        Ok(PresignedUrl {
            url: format!(
                "memory://{bucket}/{key}?expires={}",
                expires_at.timestamp()
            ),
            expires_at,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
