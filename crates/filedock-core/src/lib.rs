//! # filedock-core
//!
//! Core crate for FileDock. Contains configuration schemas, the unified
//! error system, and the object store trait implemented by
//! `filedock-storage`.
//!
//! This crate has **no** internal dependencies on other FileDock crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
