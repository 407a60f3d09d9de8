//! OpenAPI documentation.
//! All endpoints are versioned under /api/v0; handler path annotations carry
//! the literal prefix, matching `crate::constants::API_PREFIX`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use docstream_core::models;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docstream API",
        version = "0.1.0",
        description = "Document ingestion API (v0) with S3-compatible storage, an external ingestion worker, and live status streaming over SSE. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Documents
        handlers::document_upload::upload_document,
        handlers::document_get::list_documents,
        handlers::document_download::get_download_url,
        handlers::document_delete::delete_document,
        handlers::public_file::get_public_file,
        // Ingestion
        handlers::ingest::trigger_ingestion,
        handlers::ingest::ingest_webhook,
        handlers::ingest::stream_ingest_status,
    ),
    components(
        schemas(
            // Core models
            models::DocumentResponse,
            models::DocumentStatus,
            models::StatusEventPayload,
            // Request and response bodies
            handlers::document_download::DownloadUrlResponse,
            handlers::ingest::WebhookRequest,
            handlers::MessageResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "documents", description = "Document upload, listing, download, and deletion"),
        (name = "ingest", description = "Ingestion triggering, worker callbacks, and live status streaming")
    )
)]
pub struct ApiDoc;
