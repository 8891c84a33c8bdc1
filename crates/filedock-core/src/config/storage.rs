//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Which object store backend holds file payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// S3-compatible object storage (AWS S3, MinIO).
    S3,
    /// A directory on the local filesystem.
    Local,
    /// Process memory. Contents vanish on restart.
    Memory,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use.
    #[serde(default = "default_provider")]
    pub provider: StorageProviderKind,
    /// Bucket that holds every file payload.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            bucket: default_bucket(),
            max_upload_size_bytes: default_max_upload(),
            s3: S3StorageConfig::default(),
            local: LocalStorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// Endpoint URL for non-AWS services like MinIO. Empty means AWS.
    #[serde(default)]
    pub endpoint: String,
    /// Region, also used when creating the bucket.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID. Empty falls back to the default AWS credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    #[serde(default = "default_true")]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: true,
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory; each bucket is a subdirectory.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// HMAC secret for signing download tokens.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
    /// Externally reachable base URL of this server, used to build links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            signing_secret: default_signing_secret(),
            public_url: default_public_url(),
        }
    }
}

impl LocalStorageConfig {
    /// Whether the signing secret is still the shipped default.
    pub fn uses_default_secret(&self) -> bool {
        self.signing_secret == default_signing_secret()
    }
}

fn default_provider() -> StorageProviderKind {
    StorageProviderKind::Local
}

fn default_bucket() -> String {
    "files".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_local_root() -> String {
    "./data/storage".to_string()
}

fn default_signing_secret() -> String {
    "filedock-development-signing-secret".to_string()
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}
