//! File record operations: list, fetch, move, rename, copy, delete.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{info, warn};
use uuid::Uuid;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_database::repositories::{FileRepository, FolderRepository};
use filedock_entity::file::{CreateFile, File, FileChanges, FolderFilter, storage_key};
use filedock_storage::BlobStore;

/// Longest accepted display name for a file, in characters.
const MAX_FILE_NAME_LEN: usize = 255;

/// Manages file records and their payloads.
#[derive(Debug, Clone)]
pub struct FileService {
    pub(crate) files: Arc<dyn FileRepository>,
    pub(crate) folders: Arc<dyn FolderRepository>,
    pub(crate) blobs: BlobStore,
    pub(crate) max_upload_size: u64,
}

/// A move and/or rename applied in one update.
///
/// `folder_id: Some(None)` moves the file to the root level.
#[derive(Debug, Clone, Default)]
pub struct UpdateFile {
    pub folder_id: Option<Option<Uuid>>,
    pub name: Option<String>,
}

/// Where a copy goes and what it is called. Unset fields inherit from the
/// source file.
#[derive(Debug, Clone, Default)]
pub struct CopyFile {
    pub folder_id: Option<Option<Uuid>>,
    pub name: Option<String>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        folders: Arc<dyn FolderRepository>,
        blobs: BlobStore,
        max_upload_size: u64,
    ) -> Self {
        Self {
            files,
            folders,
            blobs,
            max_upload_size,
        }
    }

    /// Lists files, newest first.
    pub async fn list_files(&self, filter: FolderFilter) -> AppResult<Vec<File>> {
        self.files.find(filter).await
    }

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: Uuid) -> AppResult<File> {
        self.files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Fails with NotFound unless `folder_id` names an existing folder or the
    /// root level.
    pub(crate) async fn require_folder(&self, folder_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = folder_id {
            self.folders
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found("Folder not found"))?;
        }
        Ok(())
    }

    /// Moves a file to another folder (or the root level).
    pub async fn move_file(&self, file_id: Uuid, folder_id: Option<Uuid>) -> AppResult<File> {
        self.update_file(
            file_id,
            UpdateFile {
                folder_id: Some(folder_id),
                name: None,
            },
        )
        .await
    }

    /// Changes a file's display name. The storage key is left alone.
    pub async fn rename_file(&self, file_id: Uuid, name: &str) -> AppResult<File> {
        self.update_file(
            file_id,
            UpdateFile {
                folder_id: None,
                name: Some(name.to_string()),
            },
        )
        .await
    }

    /// Applies a move and/or a rename in one record update.
    pub async fn update_file(&self, file_id: Uuid, update: UpdateFile) -> AppResult<File> {
        let changes = FileChanges {
            folder_id: update.folder_id,
            original_name: update.name.as_deref().map(validate_file_name).transpose()?,
        };
        if changes.is_empty() {
            return Err(AppError::validation("Nothing to update: give folderId or name"));
        }
        if let Some(folder_id) = changes.folder_id {
            self.require_folder(folder_id).await?;
        }

        let file = self
            .files
            .update(file_id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(
            file_id = %file.id,
            folder_id = ?file.folder_id,
            name = %file.original_name,
            "File updated"
        );
        Ok(file)
    }

    /// Copies a file's payload to a fresh storage key and records the copy.
    pub async fn copy_file(&self, file_id: Uuid, copy: CopyFile) -> AppResult<File> {
        let source = self.get_file(file_id).await?;

        let folder_id = copy.folder_id.unwrap_or(source.folder_id);
        self.require_folder(folder_id).await?;
        let original_name = match copy.name.as_deref() {
            Some(name) => validate_file_name(name)?,
            None => source.original_name.clone(),
        };

        let key = storage_key(&original_name);
        self.blobs.copy(&source.name, &key).await?;

        let record = CreateFile {
            path: self.blobs.locator(&key),
            name: key,
            original_name,
            mime_type: source.mime_type.clone(),
            size: source.size,
            folder_id,
        };
        let file = self.files.create(&record).await.inspect_err(|e| {
            warn!(key = %record.name, error = %e, "Copied payload has no record");
        })?;

        info!(
            source_id = %source.id,
            file_id = %file.id,
            folder_id = ?file.folder_id,
            "File copied"
        );
        Ok(file)
    }

    /// Deletes a file's payload, then its record.
    pub async fn delete_file(&self, file_id: Uuid) -> AppResult<()> {
        let file = self.get_file(file_id).await?;

        self.blobs.remove(&file.name).await?;
        self.files.delete(file.id).await?;

        info!(file_id = %file.id, key = %file.name, "File deleted");
        Ok(())
    }

    /// Deletes many files: every payload concurrently, then all records in
    /// one statement. The first failed removal aborts the call before any
    /// record is touched. Returns the number of records removed.
    pub async fn delete_files(&self, file_ids: &[Uuid]) -> AppResult<u64> {
        if file_ids.is_empty() {
            return Ok(0);
        }
        let files = self.files.find_by_ids(file_ids).await?;
        self.purge(&files).await
    }

    /// Removes the payloads and records of already-loaded files.
    pub(crate) async fn purge(&self, files: &[File]) -> AppResult<u64> {
        if files.is_empty() {
            return Ok(0);
        }

        try_join_all(files.iter().map(|f| self.blobs.remove(&f.name))).await?;

        let ids: Vec<Uuid> = files.iter().map(|f| f.id).collect();
        let removed = self.files.delete_many(&ids).await?;

        info!(requested = files.len(), removed, "Files deleted");
        Ok(removed)
    }
}

/// Trim and check a user-facing file name.
fn validate_file_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("File name is required"));
    }
    if name.chars().count() > MAX_FILE_NAME_LEN {
        return Err(AppError::validation(format!(
            "File name must be at most {MAX_FILE_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}
