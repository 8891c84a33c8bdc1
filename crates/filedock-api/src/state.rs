//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use filedock_core::config::AppConfig;
use filedock_database::DatabasePool;
use filedock_database::repositories::{FileRepository, FolderRepository};
use filedock_service::{FileService, FolderService};
use filedock_storage::BlobStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool; absent when running on the in-memory repositories
    pub database: Option<DatabasePool>,
    /// Bucket-bound object store handle
    pub blobs: BlobStore,
    pub file_service: Arc<FileService>,
    pub folder_service: Arc<FolderService>,
}

impl AppState {
    /// Wire the services over the given repositories and object store.
    pub fn new(
        config: AppConfig,
        files: Arc<dyn FileRepository>,
        folders: Arc<dyn FolderRepository>,
        blobs: BlobStore,
        database: Option<DatabasePool>,
    ) -> Self {
        let file_service = FileService::new(
            files.clone(),
            folders.clone(),
            blobs.clone(),
            config.storage.max_upload_size_bytes,
        );
        let folder_service = FolderService::new(folders, files, file_service.clone());

        Self {
            config: Arc::new(config),
            database,
            blobs,
            file_service: Arc::new(file_service),
            folder_service: Arc::new(folder_service),
        }
    }
}
