//! Embedded schema migrations for the `files` and `folders` tables.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration the database has not seen yet.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!(known = MIGRATOR.iter().count(), "Applying record store migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Schema migration failed: {e}"), e)
    })?;

    info!("Record store schema is current");
    Ok(())
}
