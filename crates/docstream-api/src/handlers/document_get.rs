use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentsState;
use axum::{extract::State, response::IntoResponse, Json};
use docstream_core::models::DocumentResponse;

#[utoipa::path(
    get,
    path = "/api/v0/documents",
    tag = "documents",
    responses(
        (status = 200, description = "List of documents, newest first", body = Vec<DocumentResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, operation = "list_documents")
)]
pub async fn list_documents(
    State(state): State<DocumentsState>,
    auth: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let documents = state.service.list().await?;

    let response: Vec<DocumentResponse> = documents
        .into_iter()
        .map(DocumentResponse::from)
        .collect();

    Ok(Json(response))
}
