//! S3-compatible object store (AWS S3, MinIO).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use filedock_core::config::S3StorageConfig;
use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;
use filedock_core::traits::storage::{ObjectStore, PresignedUrl};

/// Region in which buckets are created without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// S3-compatible object store. The SDK client is built on first use.
#[derive(Debug)]
pub struct S3ObjectStore {
    config: S3StorageConfig,
    client: OnceCell<Client>,
}

impl S3ObjectStore {
    /// Create a store. No network traffic happens until the first call.
    pub fn new(config: S3StorageConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> &Client {
        self.client.get_or_init(|| self.build_client()).await
    }

    async fn build_client(&self) -> Client {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(self.config.region.clone()));

        if !self.config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                &self.config.access_key,
                &self.config.secret_key,
                None,
                None,
                "filedock-config",
            ));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(self.config.force_path_style);
        if !self.config.endpoint.is_empty() {
            builder = builder.endpoint_url(&self.config.endpoint);
        }

        info!(
            endpoint = %self.config.endpoint,
            region = %self.config.region,
            path_style = self.config.force_path_style,
            "S3 client initialized"
        );
        Client::from_conf(builder.build())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        let client = self.client().await;
        match client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|s| s.is_not_found()) => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to check bucket: {bucket}"),
                e,
            )),
        }
    }

    async fn create_bucket(&self, bucket: &str) -> AppResult<()> {
        let client = self.client().await;
        let mut request = client.create_bucket().bucket(bucket);
        if self.config.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(
                        self.config.region.as_str(),
                    ))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error().is_some_and(|s| {
                    s.is_bucket_already_owned_by_you() || s.is_bucket_already_exists()
                }) =>
            {
                Ok(())
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create bucket: {bucket}"),
                e,
            )),
        }
    }

    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let client = self.client().await;
        let size = data.len();
        client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to upload {key}"), e)
            })?;
        debug!(bucket, key, bytes = size, "Uploaded object");
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        let client = self.client().await;
        let output = client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    AppError::not_found(format!("Object not found: {key}"))
                } else {
                    AppError::with_source(ErrorKind::Storage, format!("Failed to fetch {key}"), e)
                }
            })?;

        let data = output.body.collect().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to read {key}"), e)
        })?;
        Ok(data.into_bytes())
    }

    async fn copy(&self, bucket: &str, from: &str, to: &str) -> AppResult<()> {
        let client = self.client().await;
        client
            .copy_object()
            .bucket(bucket)
            .copy_source(format!("{bucket}/{from}"))
            .key(to)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to copy {from} -> {to}"),
                    e,
                )
            })?;
        Ok(())
    }

    async fn remove(&self, bucket: &str, key: &str) -> AppResult<()> {
        let client = self.client().await;
        client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to remove {key}"), e)
            })?;
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> AppResult<bool> {
        let client = self.client().await;
        match client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|s| s.is_not_found()) => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to check {key}"),
                e,
            )),
        }
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> AppResult<PresignedUrl> {
        let client = self.client().await;
        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Invalid link lifetime", e)
        })?;
        let ttl = chrono::Duration::from_std(expires_in)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid link lifetime", e))?;
        let expires_at = Utc::now() + ttl;

        let request = client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to presign {key}"),
                    e,
                )
            })?;

        Ok(PresignedUrl {
            url: request.uri().to_string(),
            expires_at,
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        let client = self.client().await;
        match client.list_buckets().send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(error = %e, "S3 health check failed");
                Ok(false)
            }
        }
    }
}
