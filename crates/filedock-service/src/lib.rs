//! # filedock-service
//!
//! Business logic for FileDock. [`FileService`] owns file records and their
//! payloads; [`FolderService`] owns the folder hierarchy and its cascades,
//! delegating file removal to the file service.
//!
//! Services follow constructor injection: repositories are passed in as
//! `Arc<dyn ...>` trait objects and the object store as a [`BlobStore`]
//! handle.
//!
//! [`BlobStore`]: filedock_storage::BlobStore

pub mod file;
pub mod folder;

pub use file::{CopyFile, FileService, UpdateFile, UploadParams};
pub use folder::{FolderDeletion, FolderService};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use bytes::Bytes;
    use uuid::Uuid;

    use filedock_database::repositories::{MemoryFileRepository, MemoryFolderRepository};
    use filedock_entity::file::File;
    use filedock_storage::BlobStore;
    use filedock_storage::providers::MemoryObjectStore;

    use crate::{FileService, FolderService, UploadParams};

    pub(crate) struct Fixture {
        pub files: FileService,
        pub folders: FolderService,
        pub blobs: BlobStore,
        pub backend: Arc<MemoryObjectStore>,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::with_max_upload(1024 * 1024)
        }

        pub fn with_max_upload(max_upload_size: u64) -> Self {
            let backend = Arc::new(MemoryObjectStore::new());
            let blobs = BlobStore::new(backend.clone(), "files");
            let file_repo = Arc::new(MemoryFileRepository::new());
            let folder_repo = Arc::new(MemoryFolderRepository::new());

            let files = FileService::new(
                file_repo.clone(),
                folder_repo.clone(),
                blobs.clone(),
                max_upload_size,
            );
            let folders = FolderService::new(folder_repo, file_repo, files.clone());

            Self {
                files,
                folders,
                blobs,
                backend,
            }
        }
    }

    pub(crate) async fn upload(fx: &Fixture, name: &str, folder_id: Option<Uuid>) -> File {
        fx.files
            .upload_file(UploadParams {
                data: Bytes::from(format!("contents of {name}")),
                original_name: name.to_string(),
                mime_type: "text/plain".to_string(),
                folder_id,
            })
            .await
            .unwrap()
    }
}
