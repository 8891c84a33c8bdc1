//! The PostgreSQL pool holding file and folder records.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use filedock_core::config::DatabaseConfig;
use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;

/// Shared handle on the record store. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool and wait for its first connection.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let target = redact_url(&config.url);
        info!(
            url = %target,
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Opening record store pool"
        );

        let pool = pool_options(config)
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Record store unreachable at {target}"),
                    e,
                )
            })?;

        info!(url = %target, connections = pool.size(), "Record store pool ready");
        Ok(Self { pool })
    }

    /// The sqlx pool the repositories run on.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> AppResult<()> {
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Record store ping failed", e))?;
        if one != 1 {
            warn!(value = one, "Record store answered SELECT 1 oddly");
            return Err(AppError::database("Record store ping returned an unexpected value"));
        }
        Ok(())
    }

    /// Wait for checked-out connections to come back, then close them all.
    pub async fn close(&self) {
        let open = self.pool.size();
        self.pool.close().await;
        info!(connections = open, "Record store pool closed");
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

/// Hide the password in a connection URL before it reaches the logs.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let Some((userinfo, host)) = authority.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}{tail}"),
        None => url.to_string(),
    }
}
