//! Download links.

use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use filedock_core::result::AppResult;
use filedock_core::traits::storage::{PresignedUrl, SignedObject};

use super::service::FileService;

/// Lifetime of every download link.
pub const DOWNLOAD_LINK_TTL: Duration = Duration::from_secs(60 * 60);

impl FileService {
    /// Issues a one-hour presigned GET link for a file's payload.
    pub async fn get_download_link(&self, file_id: Uuid) -> AppResult<PresignedUrl> {
        let file = self.get_file(file_id).await?;
        let link = self.blobs.presign(&file.name, DOWNLOAD_LINK_TTL).await?;
        debug!(file_id = %file.id, expires_at = %link.expires_at, "Download link issued");
        Ok(link)
    }

    /// Resolves a download token served by this process (local provider).
    pub async fn open_download(&self, token: &str) -> AppResult<SignedObject> {
        self.blobs.open_signed(token).await
    }
}
