//! # filedock-database
//!
//! PostgreSQL connection management and the file and folder repositories.
//! Each repository is a trait with a PostgreSQL implementation and an
//! in-memory one used by tests and the `memory` storage profile.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{
    FileRepository, FolderRepository, MemoryFileRepository, MemoryFolderRepository,
    PgFileRepository, PgFolderRepository,
};
