//! # filedock-storage
//!
//! Object store backends for FileDock payloads: S3-compatible services,
//! the local filesystem, and process memory. [`BlobStore`] binds one
//! backend to the configured bucket and makes sure the bucket exists
//! before the first write.

pub mod blob;
pub mod providers;

pub use blob::{BlobStore, connect};
