//! Core traits defined in `filedock-core` and implemented by other crates.

pub mod storage;

pub use storage::{ObjectStore, PresignedUrl};
