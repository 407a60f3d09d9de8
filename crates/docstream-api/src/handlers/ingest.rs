//! Ingestion routes: trigger, worker webhook, and the SSE status stream.

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::MessageResponse;
use crate::state::IngestState;
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use docstream_core::models::{DocumentStatus, StatusEventPayload};
use docstream_core::AppError;
use futures::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Status callback posted by the ingestion worker.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub document_id: Uuid,
    /// Snake_case status name, e.g. "ingesting" or "ingested".
    #[validate(length(min = 1, max = 32))]
    pub status: String,
}

#[utoipa::path(
    post,
    path = "/api/v0/documents/ingest/{id}",
    tag = "ingest",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Ingestion triggered successfully", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Document is not in a triggerable status", body = ErrorResponse),
        (status = 502, description = "Ingestion worker rejected the dispatch", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, document_id = %id, operation = "trigger_ingestion")
)]
pub async fn trigger_ingestion(
    State(state): State<IngestState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    auth.require_editor()?;

    state.service.trigger(id).await?;

    Ok(Json(MessageResponse::new("Ingestion triggered successfully")))
}

#[utoipa::path(
    post,
    path = "/api/v0/documents/ingest/webhook",
    tag = "ingest",
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "Status broadcast, and persisted when terminal", body = MessageResponse),
        (status = 400, description = "Invalid status value", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 409, description = "Illegal status transition", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(user_id = %auth.user_id, operation = "ingest_webhook")
)]
pub async fn ingest_webhook(
    State(state): State<IngestState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<WebhookRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    auth.require_editor()?;

    request
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {}", e)))?;

    let status = DocumentStatus::from_str(&request.status)
        .map_err(|_| AppError::BadRequest("Invalid status value".to_string()))?;

    let outcome = state
        .service
        .handle_webhook(request.document_id, status)
        .await?;

    let message = if outcome.terminal {
        format!("Document status has been updated to {}", outcome.status)
    } else {
        format!("Document current status is {}", outcome.status)
    };

    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/ingest/status/{id}/stream",
    tag = "ingest",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Live status event stream", body = StatusEventPayload, content_type = "text/event-stream"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, document_id = %id, operation = "stream_ingest_status")
)]
pub async fn stream_ingest_status(
    State(state): State<IngestState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before handing the stream to the client so no event emitted
    // from this point on is missed.
    let mut subscription = state.broadcaster.subscribe(id);
    tracing::debug!(document_id = %id, "Status stream subscriber connected");

    let stream = async_stream::stream! {
        while let Some(event) = subscription.recv().await {
            let payload = StatusEventPayload::from(&event);
            match Event::default().json_data(&payload) {
                Ok(sse_event) => yield Ok(sse_event),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize status event");
                }
            }
        }
        // recv() returned None: the channel completed on a terminal status,
        // which ends this stream and lets the client disconnect cleanly.
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
