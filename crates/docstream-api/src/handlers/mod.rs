//! HTTP request handlers
//!
//! One module per document operation, plus the ingestion group and the
//! public file route used by the local storage backend.

pub mod document_delete;
pub mod document_download;
pub mod document_get;
pub mod document_upload;
pub mod ingest;
pub mod public_file;

use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement body for mutations that do not return a resource.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
