//! Folder repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;
use filedock_entity::folder::model::{CreateFolder, Folder, FolderRelocation};

use super::map_folder_write_error;

/// Persistence for folder records.
#[async_trait]
pub trait FolderRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Every folder, newest first.
    async fn find_all(&self) -> AppResult<Vec<Folder>>;

    /// Find a folder by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Find a folder by its materialized path.
    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>>;

    /// The folder at `path` plus every folder below it.
    async fn find_subtree(&self, path: &str) -> AppResult<Vec<Folder>>;

    /// Insert a folder. Conflict when the path is taken.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename or move a folder and rewrite every descendant path, atomically.
    ///
    /// NotFound when the folder is gone, Conflict when the new path is taken.
    async fn relocate(&self, change: &FolderRelocation) -> AppResult<Folder>;

    /// Delete every folder in `ids` in one statement. Returns the count removed.
    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64>;
}

/// PostgreSQL-backed folder repository.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn find_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE path = $1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
            })
    }

    async fn find_subtree(&self, path: &str) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE path = $1 OR starts_with(path, $1 || '/') \
             ORDER BY path ASC",
        )
        .bind(path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list subtree", e))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, path, parent_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_folder_write_error(e, &data.path, "Failed to create folder"))
    }

    async fn relocate(&self, change: &FolderRelocation) -> AppResult<Folder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let folder = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, parent_id = $3, path = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(change.id)
        .bind(&change.name)
        .bind(change.parent_id)
        .bind(&change.new_path)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_folder_write_error(e, &change.new_path, "Failed to update folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {} not found", change.id)))?;

        let rewritten = sqlx::query(
            "UPDATE folders SET path = $2 || substr(path, char_length($1) + 1), \
             updated_at = NOW() \
             WHERE starts_with(path, $1 || '/')",
        )
        .bind(&change.old_path)
        .bind(&change.new_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_folder_write_error(e, &change.new_path, "Failed to rewrite descendant paths")
        })?
        .rows_affected();

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder update", e)
        })?;

        tracing::debug!(
            folder_id = %change.id,
            old_path = %change.old_path,
            new_path = %change.new_path,
            descendants = rewritten,
            "Folder subtree rewritten"
        );
        Ok(folder)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folders", e)
            })?;
        Ok(result.rows_affected())
    }
}
