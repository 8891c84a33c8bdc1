//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
///
/// Always answers 200; a failing store shows up as `degraded`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_check = async {
        match &state.database {
            None => "in_memory",
            Some(pool) => match pool.ping().await {
                Ok(()) => "connected",
                Err(e) => {
                    warn!(error = %e, "Database health check failed");
                    "unavailable"
                }
            },
        }
    };
    let storage_check = async {
        match state.blobs.health_check().await {
            Ok(true) => "available",
            Ok(false) => "unavailable",
            Err(e) => {
                warn!(error = %e, "Object store health check failed");
                "unavailable"
            }
        }
    };
    let (database, storage) = tokio::join!(database_check, storage_check);

    let healthy = database != "unavailable" && storage == "available";
    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        storage: storage.to_string(),
        provider: state.blobs.provider_type().to_string(),
    })
}
