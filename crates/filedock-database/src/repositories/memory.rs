//! In-memory repositories.
//!
//! Records live in insertion order inside a `tokio::sync::RwLock`, so
//! "newest first" is reverse insertion order even when two records share a
//! timestamp. Every mutating call holds the write lock for its whole
//! duration, which makes a subtree rewrite atomic to readers.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_entity::file::model::{CreateFile, File, FileChanges, FolderFilter};
use filedock_entity::folder::model::{CreateFolder, Folder, FolderRelocation};
use filedock_entity::folder::path;

use super::file::FileRepository;
use super::folder::FolderRepository;

/// File repository held in process memory.
#[derive(Debug, Default)]
pub struct MemoryFileRepository {
    files: RwLock<Vec<File>>,
}

impl MemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn find(&self, filter: FolderFilter) -> AppResult<Vec<File>> {
        let files = self.files.read().await;
        Ok(files
            .iter()
            .rev()
            .filter(|f| filter.matches(f.folder_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        let files = self.files.read().await;
        Ok(files.iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<File>> {
        let files = self.files.read().await;
        Ok(files.iter().filter(|f| ids.contains(&f.id)).cloned().collect())
    }

    async fn find_by_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<File>> {
        let files = self.files.read().await;
        Ok(files
            .iter()
            .filter(|f| f.folder_id.is_some_and(|id| folder_ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn count_by_folder(&self) -> AppResult<HashMap<Option<Uuid>, u64>> {
        let files = self.files.read().await;
        let mut counts = HashMap::new();
        for file in files.iter() {
            *counts.entry(file.folder_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            original_name: data.original_name.clone(),
            mime_type: data.mime_type.clone(),
            size: data.size,
            path: data.path.clone(),
            folder_id: data.folder_id,
            created_at: now,
            updated_at: now,
        };
        self.files.write().await.push(file.clone());
        Ok(file)
    }

    async fn update(&self, id: Uuid, changes: &FileChanges) -> AppResult<Option<File>> {
        let mut files = self.files.write().await;
        let Some(file) = files.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        if let Some(folder_id) = changes.folder_id {
            file.folder_id = folder_id;
        }
        if let Some(name) = &changes.original_name {
            file.original_name = name.clone();
        }
        file.updated_at = Utc::now();
        Ok(Some(file.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|f| f.id != id);
        Ok(files.len() < before)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|f| !ids.contains(&f.id));
        Ok((before - files.len()) as u64)
    }
}

/// Folder repository held in process memory. Enforces path uniqueness.
#[derive(Debug, Default)]
pub struct MemoryFolderRepository {
    folders: RwLock<Vec<Folder>>,
}

impl MemoryFolderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn path_taken(folders: &[Folder], path: &str, except: Option<Uuid>) -> bool {
    folders
        .iter()
        .any(|f| f.path == path && Some(f.id) != except)
}

#[async_trait]
impl FolderRepository for MemoryFolderRepository {
    async fn find_all(&self) -> AppResult<Vec<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders.iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        let folders = self.folders.read().await;
        Ok(folders.iter().find(|f| f.path == path).cloned())
    }

    async fn find_subtree(&self, root: &str) -> AppResult<Vec<Folder>> {
        let folders = self.folders.read().await;
        let mut subtree: Vec<Folder> = folders
            .iter()
            .filter(|f| f.path == root || path::is_descendant(&f.path, root))
            .cloned()
            .collect();
        subtree.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(subtree)
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        if path_taken(&folders, &data.path, None) {
            return Err(AppError::conflict(format!(
                "Folder path '{}' already exists",
                data.path
            )));
        }
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            path: data.path.clone(),
            parent_id: data.parent_id,
            created_at: now,
            updated_at: now,
        };
        folders.push(folder.clone());
        Ok(folder)
    }

    async fn relocate(&self, change: &FolderRelocation) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        if !folders.iter().any(|f| f.id == change.id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                change.id
            )));
        }
        if path_taken(&folders, &change.new_path, Some(change.id)) {
            return Err(AppError::conflict(format!(
                "Folder path '{}' already exists",
                change.new_path
            )));
        }

        let now = Utc::now();
        let mut updated = None;
        for folder in folders.iter_mut() {
            if folder.id == change.id {
                folder.name = change.name.clone();
                folder.parent_id = change.parent_id;
                folder.path = change.new_path.clone();
                folder.updated_at = now;
                updated = Some(folder.clone());
            } else if let Some(rebased) =
                path::rebase(&folder.path, &change.old_path, &change.new_path)
            {
                folder.path = rebased;
                folder.updated_at = now;
            }
        }

        updated.ok_or_else(|| AppError::not_found(format!("Folder {} not found", change.id)))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut folders = self.folders.write().await;
        let before = folders.len();
        folders.retain(|f| !ids.contains(&f.id));
        Ok((before - folders.len()) as u64)
    }
}
