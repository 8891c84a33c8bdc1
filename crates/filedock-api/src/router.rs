//! Route definitions for the FileDock HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart boundaries and the `folderId` field on top of the
/// largest allowed payload.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let api_routes = Router::new()
        .merge(file_routes())
        .merge(folder_routes())
        .merge(blob_routes())
        .merge(health_routes());

    let cors = middleware::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// File endpoints: list, upload, get, update, delete, download link, copy
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            get(handlers::file::list_files).post(handlers::file::upload_file),
        )
        .route(
            "/files/{id}",
            get(handlers::file::get_file)
                .put(handlers::file::update_file)
                .delete(handlers::file::delete_file),
        )
        .route("/files/{id}/download", get(handlers::file::download_link))
        .route("/files/{id}/copy", post(handlers::file::copy_file))
}

/// Folder endpoints: list, create, tree, get, rename, move, delete
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/tree", get(handlers::folder::folder_tree))
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder)
                .put(handlers::folder::rename_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
}

/// Local-provider download links
fn blob_routes() -> Router<AppState> {
    Router::new().route("/blobs/{token}", get(handlers::blob::download_blob))
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
