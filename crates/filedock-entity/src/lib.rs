//! # filedock-entity
//!
//! Domain entity models for FileDock. [`File`](file::File) and
//! [`Folder`](folder::Folder) are table rows and derive `sqlx::FromRow`;
//! the rest are value objects and the pure path rules that keep
//! materialized folder paths consistent.

pub mod file;
pub mod folder;
