use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentsState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Signed URL for fetching a document blob without credentials.
#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadUrlResponse {
    pub url: String,
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/download/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Signed download URL, valid for one hour", body = DownloadUrlResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, document_id = %id, operation = "get_download_url")
)]
pub async fn get_download_url(
    State(state): State<DocumentsState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url = state.service.download_url(id).await?;

    Ok(Json(DownloadUrlResponse { url }))
}
