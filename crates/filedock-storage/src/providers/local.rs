//! Local filesystem object store.
//!
//! Each bucket is a directory under the configured root and each object a
//! file inside it. Download links point back at this server
//! (`/api/blobs/{token}`) and carry an HS256-signed token naming the
//! object and its expiry. The content type given at upload is kept in a
//! sidecar file under `{root}/.meta/{bucket}/`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use filedock_core::config::LocalStorageConfig;
use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;
use filedock_core::traits::storage::{ObjectStore, PresignedUrl, SignedObject};

/// Route prefix under which signed downloads are served.
pub const BLOB_ROUTE: &str = "/api/blobs";

/// Directory under the root holding per-object content types.
const META_DIR: &str = ".meta";

/// Claims carried by a download token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobClaims {
    /// Bucket.
    b: String,
    /// Object key.
    k: String,
    iat: i64,
    exp: i64,
}

/// Local filesystem object store.
#[derive(Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_url: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for LocalObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalObjectStore")
            .field("root", &self.root)
            .field("public_url", &self.public_url)
            .finish()
    }
}

impl LocalObjectStore {
    /// Create a store rooted at `config.root_path`, creating the directory.
    pub async fn new(config: &LocalStorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Ok(Self {
            root,
            public_url: config.public_url.trim_end_matches('/').to_string(),
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            validation,
        })
    }

    fn bucket_dir(&self, bucket: &str) -> AppResult<PathBuf> {
        check_segment(bucket, "bucket")?;
        if bucket.starts_with('.') {
            return Err(AppError::validation(format!("Invalid bucket: '{bucket}'")));
        }
        Ok(self.root.join(bucket))
    }

    /// Sidecar file recording an object's content type.
    fn meta_path(&self, bucket: &str, key: &str) -> AppResult<PathBuf> {
        self.bucket_dir(bucket)?;
        check_segment(key, "object key")?;
        Ok(self.root.join(META_DIR).join(bucket).join(key))
    }

    async fn read_content_type(&self, bucket: &str, key: &str) -> AppResult<Option<String>> {
        let path = self.meta_path(bucket, key)?;
        match fs::read_to_string(&path).await {
            Ok(content_type) => Ok(Some(content_type).filter(|c| !c.is_empty())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e, "read content type", key)),
        }
    }

    /// Resolve an object to its file. Keys are single path segments.
    fn resolve(&self, bucket: &str, key: &str) -> AppResult<PathBuf> {
        check_segment(key, "object key")?;
        Ok(self.bucket_dir(bucket)?.join(key))
    }

    pub(crate) fn issue_token(
        &self,
        bucket: &str,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = BlobClaims {
            b: bucket.to_string(),
            k: key.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to sign download link", e)
        })
    }
}

fn check_segment(segment: &str, what: &str) -> AppResult<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
    {
        return Err(AppError::validation(format!("Invalid {what}: '{segment}'")));
    }
    Ok(())
}

fn io_error(e: std::io::Error, action: &str, key: &str) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Object not found: {key}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {key}"), e)
    }
}

async fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", parent.display()),
                e,
            )
        })?;
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        let dir = self.bucket_dir(bucket)?;
        Ok(fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()))
    }

    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        let dir = self.bucket_dir(bucket)?;
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create bucket: {bucket}"),
                e,
            )
        })
    }

    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let path = self.resolve(bucket, key)?;
        let meta = self.meta_path(bucket, key)?;
        ensure_parent(&path).await?;
        ensure_parent(&meta).await?;
        fs::write(&meta, content_type)
            .await
            .map_err(|e| io_error(e, "write content type", key))?;
        fs::write(&path, &data)
            .await
            .map_err(|e| io_error(e, "write object", key))?;
        debug!(bucket, key, content_type, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        let path = self.resolve(bucket, key)?;
        let data = fs::read(&path)
            .await
            .map_err(|e| io_error(e, "read object", key))?;
        Ok(Bytes::from(data))
    }

    async fn copy(&self, bucket: &str, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(bucket, from)?;
        let to_path = self.resolve(bucket, to)?;
        fs::copy(&from_path, &to_path)
            .await
            .map_err(|e| io_error(e, "copy object", from))?;

        if let Some(content_type) = self.read_content_type(bucket, from).await? {
            let meta = self.meta_path(bucket, to)?;
            ensure_parent(&meta).await?;
            fs::write(&meta, content_type)
                .await
                .map_err(|e| io_error(e, "write content type", to))?;
        }
        Ok(())
    }

    async fn remove(&self, bucket: &str, key: &str) -> AppResult<()> {
        let path = self.resolve(bucket, key)?;
        let meta = self.meta_path(bucket, key)?;
        for file in [&path, &meta] {
            match fs::remove_file(file).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(io_error(e, "remove object", key)),
            }
        }
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool> {
        let path = self.resolve(bucket, key)?;
        Ok(fs::metadata(&path).await.is_ok_and(|m| m.is_file()))
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> AppResult<PresignedUrl> {
        self.resolve(bucket, key)?;
        let ttl = chrono::Duration::from_std(expires_in)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid link lifetime", e))?;
        let expires_at = Utc::now() + ttl;
        let token = self.issue_token(bucket, key, expires_at)?;

        Ok(PresignedUrl {
            url: format!("{}{BLOB_ROUTE}/{token}", self.public_url),
            expires_at,
        })
    }

    async fn open_signed(&self, token: &str) -> AppResult<SignedObject> {
        let claims = decode::<BlobClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::not_found("Download link not found or expired"))?
            .claims;

        let data = self.get(&claims.b, &claims.k).await?;
        Ok(SignedObject {
            content_type: self.read_content_type(&claims.b, &claims.k).await?,
            key: claims.k,
            data,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root).await.is_ok_and(|m| m.is_dir()))
    }
}
