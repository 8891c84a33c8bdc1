//! File listing, upload, update, copy, download-link and delete handlers.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;

use filedock_core::error::AppError;
use filedock_core::traits::storage::PresignedUrl;
use filedock_entity::file::{File, FolderFilter, folder_ref};
use filedock_service::UploadParams;
use filedock_service::file::upload::DEFAULT_MIME_TYPE;

use crate::dto::request::{CopyFileRequest, ListFilesQuery, UpdateFileRequest};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, parse_id};
use crate::state::AppState;

const FILE_NOT_FOUND: &str = "File not found";

/// GET /api/files?folderId=...
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<File>>, ApiError> {
    let filter = match query.folder_id.as_deref().filter(|v| !v.is_empty()) {
        None => FolderFilter::All,
        Some(raw) => match folder_ref::parse(raw) {
            Ok(folder_id) => FolderFilter::from(folder_id),
            // No folder has a malformed id, so nothing is in it.
            Err(_) => return Ok(Json(Vec::new())),
        },
    };

    let files = state.file_service.list_files(filter).await?;
    Ok(Json(files))
}

/// POST /api/files (multipart: `file`, optional `folderId`)
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<File>, ApiError> {
    let mut multipart =
        multipart.map_err(|rejection| AppError::validation(rejection.body_text()))?;
    let max_upload = state.config.storage.max_upload_size_bytes;

    let mut payload: Option<(Bytes, String, String)> = None;
    let mut folder_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or(DEFAULT_MIME_TYPE).to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_upload))?;
                payload = Some((data, original_name, mime_type));
            }
            Some("folderId") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_upload))?;
                folder_id = folder_ref::parse(&raw)
                    .map_err(|_| AppError::not_found("Folder not found"))?;
            }
            _ => {}
        }
    }

    let (data, original_name, mime_type) =
        payload.ok_or_else(|| AppError::validation("No file uploaded"))?;

    let file = state
        .file_service
        .upload_file(UploadParams {
            data,
            original_name,
            mime_type,
            folder_id,
        })
        .await?;
    Ok(Json(file))
}

fn multipart_error(err: MultipartError, max_upload: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation(format!(
            "File exceeds maximum upload size of {max_upload} bytes"
        ))
    } else {
        AppError::validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<File>, ApiError> {
    let id = parse_id(&id, FILE_NOT_FOUND)?;
    let file = state.file_service.get_file(id).await?;
    Ok(Json(file))
}

/// PUT /api/files/{id} (body: `folderId`, `name`)
pub async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFileRequest>,
) -> Result<Json<File>, ApiError> {
    let id = parse_id(&id, FILE_NOT_FOUND)?;
    let file = state.file_service.update_file(id, req.into()).await?;
    Ok(Json(file))
}

/// POST /api/files/{id}/copy
pub async fn copy_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CopyFileRequest>,
) -> Result<Json<File>, ApiError> {
    let id = parse_id(&id, FILE_NOT_FOUND)?;
    let file = state.file_service.copy_file(id, req.into()).await?;
    Ok(Json(file))
}

/// GET /api/files/{id}/download
pub async fn download_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PresignedUrl>, ApiError> {
    let id = parse_id(&id, FILE_NOT_FOUND)?;
    let link = state.file_service.get_download_link(id).await?;
    Ok(Json(link))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, FILE_NOT_FOUND)?;
    state.file_service.delete_file(id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
