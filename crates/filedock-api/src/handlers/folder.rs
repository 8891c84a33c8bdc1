//! Folder CRUD, move and tree handlers.

use axum::Json;
use axum::extract::{Path, State};

use filedock_entity::folder::{Folder, FolderTree};

use crate::dto::request::{CreateFolderRequest, MoveFolderRequest, RenameFolderRequest};
use crate::dto::response::DeleteFolderResponse;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, parse_id};
use crate::state::AppState;

const FOLDER_NOT_FOUND: &str = "Folder not found";

/// GET /api/folders
pub async fn list_folders(State(state): State<AppState>) -> Result<Json<Vec<Folder>>, ApiError> {
    let folders = state.folder_service.list_folders().await?;
    Ok(Json(folders))
}

/// GET /api/folders/tree
pub async fn folder_tree(State(state): State<AppState>) -> Result<Json<FolderTree>, ApiError> {
    let tree = state.folder_service.folder_tree().await?;
    Ok(Json(tree))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    let folder = state
        .folder_service
        .create_folder(&req.name, req.parent_id)
        .await?;
    Ok(Json(folder))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Folder>, ApiError> {
    let id = parse_id(&id, FOLDER_NOT_FOUND)?;
    let folder = state.folder_service.get_folder(id).await?;
    Ok(Json(folder))
}

/// PUT /api/folders/{id}
pub async fn rename_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RenameFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    let id = parse_id(&id, FOLDER_NOT_FOUND)?;
    let folder = state.folder_service.rename_folder(id, &req.name).await?;
    Ok(Json(folder))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<MoveFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    let id = parse_id(&id, FOLDER_NOT_FOUND)?;
    let folder = state.folder_service.move_folder(id, req.parent_id).await?;
    Ok(Json(folder))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteFolderResponse>, ApiError> {
    let id = parse_id(&id, FOLDER_NOT_FOUND)?;
    let deleted = state.folder_service.delete_folder(id).await?;
    Ok(Json(DeleteFolderResponse {
        message: "Folder deleted successfully".to_string(),
        deleted,
    }))
}
