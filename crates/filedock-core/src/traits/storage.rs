//! Object store trait for pluggable blob storage backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::result::AppResult;

/// A time-limited, pre-authorized URL for fetching one object.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrl {
    /// The URL a client can GET without further credentials.
    pub url: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// An object fetched through a locally signed download token.
#[derive(Debug, Clone)]
pub struct SignedObject {
    /// Object key within its bucket.
    pub key: String,
    /// Object contents.
    pub data: Bytes,
    /// Content type recorded at upload time, if the backend keeps one.
    pub content_type: Option<String>,
}

/// Trait for blob storage backends keyed by bucket name + object key.
///
/// Implementations exist for S3-compatible services, the local
/// filesystem, and process memory. Every method is a single round trip;
/// retries are left to the caller (and FileDock makes none).
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "local").
    fn provider_type(&self) -> &str;

    /// Check whether a bucket exists.
    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool>;

    /// Create a bucket. Creating a bucket that already exists is not an error.
    async fn create_bucket(&self, bucket: &str) -> AppResult<()>;

    /// Store `data` under `key`, replacing any existing object.
    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str)
    -> AppResult<()>;

    /// Read an object fully into memory. Missing objects are `NotFound`.
    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes>;

    /// Copy an object to a new key within the same bucket.
    async fn copy(&self, bucket: &str, from: &str, to: &str) -> AppResult<()>;

    /// Remove an object. Removing a missing object is not an error.
    async fn remove(&self, bucket: &str, key: &str) -> AppResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool>;

    /// Produce a time-limited GET URL for an object.
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration)
    -> AppResult<PresignedUrl>;

    /// Resolve a download token previously issued by [`presign_get`] when
    /// this server itself serves the download. Backends whose URLs point
    /// elsewhere (S3) never issue such tokens.
    ///
    /// [`presign_get`]: ObjectStore::presign_get
    async fn open_signed(&self, _token: &str) -> AppResult<SignedObject> {
        Err(AppError::not_found("Download link not found"))
    }

    /// Check whether the provider is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
