use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::MessageResponse;
use crate::state::DocumentsState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted successfully", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, document_id = %id, operation = "delete_document")
)]
pub async fn delete_document(
    State(state): State<DocumentsState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    auth.require_editor()?;

    state.service.delete(id).await?;

    Ok(Json(MessageResponse::new("Document deleted successfully")))
}
