//! Serves payloads behind download links issued by the local provider.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use filedock_core::error::AppError;
use filedock_service::file::upload::DEFAULT_MIME_TYPE;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/blobs/{token}
pub async fn download_blob(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let object = state.file_service.open_download(&token).await?;

    let content_type = object
        .content_type
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", object.key),
        )
        .header(header::CONTENT_LENGTH, object.data.len())
        .body(Body::from(object.data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
