//! Folder CRUD with cascading path rewrites and cascading deletes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_database::repositories::{FileRepository, FolderRepository};
use filedock_entity::folder::{CreateFolder, Folder, FolderRelocation, path};

use crate::file::FileService;

/// Manages the folder hierarchy.
#[derive(Debug, Clone)]
pub struct FolderService {
    pub(crate) folders: Arc<dyn FolderRepository>,
    pub(crate) files: Arc<dyn FileRepository>,
    file_service: FileService,
}

/// What a folder delete removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDeletion {
    pub folders_deleted: u64,
    pub files_deleted: u64,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        files: Arc<dyn FileRepository>,
        file_service: FileService,
    ) -> Self {
        Self {
            folders,
            files,
            file_service,
        }
    }

    /// Lists every folder, newest first.
    pub async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        self.folders.find_all().await
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: Uuid) -> AppResult<Folder> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    async fn ensure_path_free(&self, path: &str) -> AppResult<()> {
        if self.folders.find_by_path(path).await?.is_some() {
            return Err(AppError::conflict(format!(
                "A folder at path '{path}' already exists"
            )));
        }
        Ok(())
    }

    /// Creates a folder at the root level or under `parent_id`.
    pub async fn create_folder(&self, name: &str, parent_id: Option<Uuid>) -> AppResult<Folder> {
        let name = path::validate_name(name)?;

        let parent = match parent_id {
            Some(id) => Some(
                self.folders
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Parent folder not found"))?,
            ),
            None => None,
        };

        let folder_path = path::child_path(parent.as_ref().map(|p| p.path.as_str()), name);
        self.ensure_path_free(&folder_path).await?;

        let folder = self
            .folders
            .create(&CreateFolder {
                name: name.to_string(),
                path: folder_path,
                parent_id,
            })
            .await?;

        info!(folder_id = %folder.id, path = %folder.path, "Folder created");
        Ok(folder)
    }

    /// Renames a folder. Only the last path segment changes; every
    /// descendant path is rewritten in the same repository call.
    pub async fn rename_folder(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        let new_name = path::validate_name(new_name)?;
        let folder = self.get_folder(folder_id).await?;
        if folder.name == new_name {
            return Ok(folder);
        }

        let new_path = path::rename_last_segment(&folder.path, new_name);
        self.ensure_path_free(&new_path).await?;

        let renamed = self
            .folders
            .relocate(&FolderRelocation {
                id: folder.id,
                name: new_name.to_string(),
                parent_id: folder.parent_id,
                old_path: folder.path.clone(),
                new_path,
            })
            .await?;

        info!(
            folder_id = %renamed.id,
            old_path = %folder.path,
            new_path = %renamed.path,
            "Folder renamed"
        );
        Ok(renamed)
    }

    /// Moves a folder under a new parent (or to the root level), carrying
    /// its whole subtree along.
    pub async fn move_folder(&self, folder_id: Uuid, new_parent_id: Option<Uuid>) -> AppResult<Folder> {
        let folder = self.get_folder(folder_id).await?;

        let parent = match new_parent_id {
            Some(id) if id == folder.id => {
                return Err(AppError::validation("Cannot move a folder into itself"));
            }
            Some(id) => {
                let parent = self
                    .folders
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Target folder not found"))?;
                if folder.is_ancestor_of(&parent) {
                    return Err(AppError::validation(
                        "Cannot move a folder into one of its descendants",
                    ));
                }
                Some(parent)
            }
            None => None,
        };

        let new_path = path::child_path(parent.as_ref().map(|p| p.path.as_str()), &folder.name);
        if new_path == folder.path {
            return Ok(folder);
        }
        self.ensure_path_free(&new_path).await?;

        let moved = self
            .folders
            .relocate(&FolderRelocation {
                id: folder.id,
                name: folder.name.clone(),
                parent_id: new_parent_id,
                old_path: folder.path.clone(),
                new_path,
            })
            .await?;

        info!(
            folder_id = %moved.id,
            old_path = %folder.path,
            new_path = %moved.path,
            "Folder moved"
        );
        Ok(moved)
    }

    /// Deletes a folder, every folder below it, and every file in any of
    /// them (payloads included). Files go first, folder records last.
    pub async fn delete_folder(&self, folder_id: Uuid) -> AppResult<FolderDeletion> {
        let folder = self.get_folder(folder_id).await?;

        let subtree = self.folders.find_subtree(&folder.path).await?;
        let folder_ids: Vec<Uuid> = subtree.iter().map(|f| f.id).collect();

        let files = self.files.find_by_folders(&folder_ids).await?;
        let files_deleted = self.file_service.purge(&files).await?;
        let folders_deleted = self.folders.delete_many(&folder_ids).await?;

        info!(
            folder_id = %folder.id,
            path = %folder.path,
            folders_deleted,
            files_deleted,
            "Folder deleted"
        );
        Ok(FolderDeletion {
            folders_deleted,
            files_deleted,
        })
    }
}
