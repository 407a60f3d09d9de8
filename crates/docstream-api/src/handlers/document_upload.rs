use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentsState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use docstream_core::models::DocumentResponse;
use docstream_core::AppError;
use std::io;
use std::pin::Pin;
use tokio::io::AsyncRead;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::io::StreamReader;

/// Bounded handoff between the multipart reader and the storage writer.
/// Keeps memory flat for large payloads instead of buffering the whole file.
const CHUNK_CHANNEL_CAPACITY: usize = 8;

#[utoipa::path(
    post,
    path = "/api/v0/documents/upload",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded successfully", body = DocumentResponse),
        (status = 400, description = "No file uploaded or malformed body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %auth.user_id, operation = "upload_document")
)]
pub async fn upload_document(
    State(state): State<DocumentsState>,
    auth: AuthContext,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    auth.require_editor()?;

    // First part carrying a filename wins; bare form fields are skipped.
    let mut field = loop {
        let next = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?;
        match next {
            Some(field) if field.file_name().is_some() => break field,
            Some(_) => continue,
            None => {
                return Err(HttpAppError(AppError::BadRequest(
                    "No file uploaded".to_string(),
                )))
            }
        }
    };

    let file_name = field
        .file_name()
        .unwrap_or("document")
        .to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    // The multipart body is pumped chunk by chunk into a channel-backed
    // reader that the storage upload consumes concurrently.
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Bytes, io::Error>>(CHUNK_CHANNEL_CAPACITY);
    let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> =
        Box::pin(StreamReader::new(ReceiverStream::new(rx)));

    let pump = async move {
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if tx.send(Ok(chunk)).await.is_err() {
                        // Upload side stopped reading; its own error surfaces below.
                        break Ok(());
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => {
                    let message = format!("Failed to read multipart chunk: {}", e);
                    // Poison the reader so the storage upload aborts instead
                    // of finalizing a truncated blob.
                    let _ = tx.send(Err(io::Error::other(message.clone()))).await;
                    break Err(AppError::InvalidInput(message));
                }
            }
        }
    };

    let upload = state
        .service
        .upload(&file_name, &mime_type, auth.user_id, reader);

    let (pump_result, upload_result) = tokio::join!(pump, upload);

    // A client-side read failure explains any storage failure; report it first.
    pump_result?;
    let document = upload_result?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from(document)),
    ))
}
