//! Domain route groups (documents and ingestion).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

pub fn document_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/documents/upload", API_PREFIX),
            post(handlers::document_upload::upload_document),
        )
        .route(
            &format!("{}/documents", API_PREFIX),
            get(handlers::document_get::list_documents),
        )
        .route(
            &format!("{}/documents/download/{{id}}", API_PREFIX),
            get(handlers::document_download::get_download_url),
        )
        .route(
            &format!("{}/documents/{{id}}", API_PREFIX),
            delete(handlers::document_delete::delete_document),
        )
}

pub fn ingest_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/documents/ingest/webhook", API_PREFIX),
            post(handlers::ingest::ingest_webhook),
        )
        .route(
            &format!("{}/documents/ingest/status/{{id}}/stream", API_PREFIX),
            get(handlers::ingest::stream_ingest_status),
        )
        .route(
            &format!("{}/documents/ingest/{{id}}", API_PREFIX),
            post(handlers::ingest::trigger_ingestion),
        )
}
