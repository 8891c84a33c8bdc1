//! File repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;
use filedock_entity::file::model::{CreateFile, File, FileChanges, FolderFilter};

/// Persistence for file records.
#[async_trait]
pub trait FileRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Files passing `filter`, newest first.
    async fn find(&self, filter: FolderFilter) -> AppResult<Vec<File>>;

    /// Find a file by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Every file whose id is in `ids`.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<File>>;

    /// Every file owned by one of `folder_ids`.
    async fn find_by_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<File>>;

    /// Number of files per owning folder; `None` counts root-level files.
    async fn count_by_folder(&self) -> AppResult<HashMap<Option<Uuid>, u64>>;

    /// Insert a record. The store assigns the id and timestamps.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Apply `changes` and bump `updated_at`. `None` when the file is gone.
    async fn update(&self, id: Uuid, changes: &FileChanges) -> AppResult<Option<File>>;

    /// Delete one record. Returns whether it existed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every record in `ids` in one statement. Returns the count removed.
    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64>;
}

/// PostgreSQL-backed file repository.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find(&self, filter: FolderFilter) -> AppResult<Vec<File>> {
        let query = match filter {
            FolderFilter::All => sqlx::query_as::<_, File>(
                "SELECT * FROM files ORDER BY created_at DESC, id DESC",
            ),
            FolderFilter::Root => sqlx::query_as::<_, File>(
                "SELECT * FROM files WHERE folder_id IS NULL ORDER BY created_at DESC, id DESC",
            ),
            FolderFilter::Folder(folder_id) => sqlx::query_as::<_, File>(
                "SELECT * FROM files WHERE folder_id = $1 ORDER BY created_at DESC, id DESC",
            )
            .bind(folder_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find files", e))
    }

    async fn find_by_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = ANY($1)")
            .bind(folder_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find files in folders", e)
            })
    }

    async fn count_by_folder(&self) -> AppResult<HashMap<Option<Uuid>, u64>> {
        let rows: Vec<(Option<Uuid>, i64)> =
            sqlx::query_as("SELECT folder_id, COUNT(*) FROM files GROUP BY folder_id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count files", e)
                })?;

        Ok(rows
            .into_iter()
            .map(|(folder_id, count)| (folder_id, count as u64))
            .collect())
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (name, original_name, mime_type, size, path, folder_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.original_name)
        .bind(&data.mime_type)
        .bind(data.size)
        .bind(&data.path)
        .bind(data.folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn update(&self, id: Uuid, changes: &FileChanges) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET \
                folder_id = CASE WHEN $2 THEN $3 ELSE folder_id END, \
                original_name = COALESCE($4, original_name), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.folder_id.is_some())
        .bind(changes.folder_id.flatten())
        .bind(changes.original_name.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM files WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete files", e))?;
        Ok(result.rows_affected())
    }
}
