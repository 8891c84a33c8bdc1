//! Folder hierarchy management and tree building.

pub mod service;
pub mod tree;

pub use service::{FolderDeletion, FolderService};
