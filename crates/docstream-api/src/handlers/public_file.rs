//! Public file route: serves a stored blob by its storage key (no auth).
//! This is what signed URLs from the local backend resolve to, so the
//! ingestion worker can fetch document payloads without credentials.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentsState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use docstream_core::AppError;
use futures::StreamExt;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/media/{key}",
    tag = "documents",
    params(
        ("key" = String, Path, description = "Storage key, e.g. documents/{documentId}")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_public_file"))]
pub async fn get_public_file(
    State(state): State<DocumentsState>,
    Path(key): Path<String>,
) -> Result<Response, HttpAppError> {
    // Keys are always documents/{id}; anything else has no backing row.
    let document_id = key
        .strip_prefix("documents/")
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| AppError::NotFound(format!("File not found: {}", key)))?;

    let document = state.service.get(document_id).await?;

    let stream = state.storage.download_stream(&key).await.map_err(|e| {
        tracing::error!(error = %e, storage_key = %key, "Failed to retrieve file from storage");
        HttpAppError::from(e)
    })?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.mime_type.as_str())
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
