//! File and folder repositories.

pub mod file;
pub mod folder;
pub mod memory;

pub use file::{FileRepository, PgFileRepository};
pub use folder::{FolderRepository, PgFolderRepository};
pub use memory::{MemoryFileRepository, MemoryFolderRepository};

use filedock_core::error::{AppError, ErrorKind};

/// Unique constraint on `folders.path`.
pub(crate) const FOLDER_PATH_CONSTRAINT: &str = "folders_path_key";

/// Map a sqlx error to a database error, or to a conflict when it is a
/// violation of the folder path constraint.
pub(crate) fn map_folder_write_error(err: sqlx::Error, path: &str, context: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(FOLDER_PATH_CONSTRAINT) => {
            AppError::conflict(format!("Folder path '{path}' already exists"))
        }
        _ => AppError::with_source(ErrorKind::Database, context, err),
    }
}
