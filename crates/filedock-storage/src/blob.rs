//! Bucket-bound handle over an object store backend.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::info;

use filedock_core::config::{StorageConfig, StorageProviderKind};
use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_core::traits::storage::{ObjectStore, PresignedUrl, SignedObject};

use crate::providers::MemoryObjectStore;

/// The object store plus the one bucket FileDock keeps payloads in.
///
/// Clones share the bucket-ready flag, so the existence check and
/// creation happen at most once per process however many handles exist.
#[derive(Debug, Clone)]
pub struct BlobStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    bucket_ready: Arc<OnceCell<()>>,
}

impl BlobStore {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            bucket_ready: Arc::new(OnceCell::new()),
        }
    }

    /// The configured bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The backend's provider name.
    pub fn provider_type(&self) -> &str {
        self.store.provider_type()
    }

    /// Create the bucket if it is missing. Only the first successful call
    /// talks to the backend; a failed attempt is retried by the next caller.
    pub async fn ensure_bucket(&self) -> AppResult<()> {
        self.bucket_ready
            .get_or_try_init(|| async {
                if !self.store.bucket_exists(&self.bucket).await? {
                    self.store.create_bucket(&self.bucket).await?;
                    info!(bucket = %self.bucket, "Created bucket");
                }
                Ok::<_, AppError>(())
            })
            .await?;
        Ok(())
    }

    /// Store a payload, ensuring the bucket first.
    pub async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        self.ensure_bucket().await?;
        self.store.put(&self.bucket, key, data, content_type).await
    }

    pub async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.store.get(&self.bucket, key).await
    }

    /// Server-side copy to a new key.
    pub async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        self.ensure_bucket().await?;
        self.store.copy(&self.bucket, from, to).await
    }

    pub async fn remove(&self, key: &str) -> AppResult<()> {
        self.store.remove(&self.bucket, key).await
    }

    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        self.store.exists(&self.bucket, key).await
    }

    /// Time-limited GET link for a payload.
    pub async fn presign(&self, key: &str, expires_in: Duration) -> AppResult<PresignedUrl> {
        self.store.presign_get(&self.bucket, key, expires_in).await
    }

    /// Resolve a download token issued by this server.
    pub async fn open_signed(&self, token: &str) -> AppResult<SignedObject> {
        self.store.open_signed(token).await
    }

    /// The `path` recorded on a file whose payload lives under `key`.
    pub fn locator(&self, key: &str) -> String {
        format!("/{}/{key}", self.bucket)
    }

    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }
}

/// Build the configured backend and bind it to the configured bucket.
pub async fn connect(config: &StorageConfig) -> AppResult<BlobStore> {
    let store: Arc<dyn ObjectStore> = match config.provider {
        #[cfg(feature = "s3")]
        StorageProviderKind::S3 => Arc::new(crate::providers::S3ObjectStore::new(config.s3.clone())),
        #[cfg(feature = "local")]
        StorageProviderKind::Local => {
            Arc::new(crate::providers::LocalObjectStore::new(&config.local).await?)
        }
        StorageProviderKind::Memory => Arc::new(MemoryObjectStore::new()),
        #[allow(unreachable_patterns)]
        other => {
            return Err(AppError::configuration(format!(
                "Storage provider {other:?} is not compiled into this build"
            )));
        }
    };

    info!(
        provider = store.provider_type(),
        bucket = %config.bucket,
        "Object store configured"
    );
    Ok(BlobStore::new(store, config.bucket.clone()))
}
