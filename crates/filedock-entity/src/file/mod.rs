//! File domain entities.

pub mod folder_ref;
pub mod key;
pub mod model;

pub use key::{sanitize_file_name, storage_key};
pub use model::{CreateFile, File, FileChanges, FolderFilter};
