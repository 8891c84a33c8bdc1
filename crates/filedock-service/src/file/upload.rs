//! Single-request file upload.

use bytes::Bytes;
use tracing::{error, info};
use uuid::Uuid;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_entity::file::{CreateFile, File, storage_key};

use super::service::FileService;

/// Fallback content type when the client sends none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A fully buffered upload.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// File content bytes.
    pub data: Bytes,
    /// File name as sent by the client.
    pub original_name: String,
    /// MIME type as sent by the client.
    pub mime_type: String,
    /// Target folder; `None` is the root level.
    pub folder_id: Option<Uuid>,
}

impl FileService {
    /// Stores the payload under a fresh storage key, then records it.
    ///
    /// If the record insert fails after the payload was written, the
    /// payload stays behind in the bucket and the failure is logged.
    pub async fn upload_file(&self, params: UploadParams) -> AppResult<File> {
        let size = params.data.len() as u64;
        if size > self.max_upload_size {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_size
            )));
        }
        self.require_folder(params.folder_id).await?;

        let original_name = match params.original_name.trim() {
            "" => "file".to_string(),
            name => name.to_string(),
        };
        let mime_type = match params.mime_type.trim() {
            "" => DEFAULT_MIME_TYPE.to_string(),
            mime => mime.to_string(),
        };

        let key = storage_key(&original_name);
        self.blobs.put(&key, params.data, &mime_type).await?;

        let record = CreateFile {
            path: self.blobs.locator(&key),
            name: key,
            original_name,
            mime_type,
            size: size as i64,
            folder_id: params.folder_id,
        };
        let file = self.files.create(&record).await.inspect_err(|e| {
            error!(
                key = %record.name,
                bucket = %self.blobs.bucket(),
                error = %e,
                "Uploaded payload was not recorded and is orphaned"
            );
        })?;

        info!(
            file_id = %file.id,
            key = %file.name,
            size = file.size,
            folder_id = ?file.folder_id,
            "File uploaded"
        );
        Ok(file)
    }
}
