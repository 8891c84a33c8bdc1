//! File management: listing, upload, move/rename/copy, deletion, download links.

pub mod download;
pub mod service;
pub mod upload;

pub use download::DOWNLOAD_LINK_TTL;
pub use service::{CopyFile, FileService, UpdateFile};
pub use upload::UploadParams;
