//! Response DTOs.

use serde::{Deserialize, Serialize};

use filedock_service::FolderDeletion;

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a folder delete: the message plus what the cascade removed.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteFolderResponse {
    pub message: String,
    #[serde(flatten)]
    pub deleted: FolderDeletion,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every store answers, `degraded` otherwise.
    pub status: String,
    pub version: String,
    /// `connected`, `unavailable`, or `in_memory`.
    pub database: String,
    /// `available` or `unavailable`.
    pub storage: String,
    /// Object store provider name.
    pub provider: String,
}
