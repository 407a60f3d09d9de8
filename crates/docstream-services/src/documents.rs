//! Document lifecycle: blobs and metadata rows kept consistent.
//!
//! Ordering rules here are what keep the two stores honest. Uploads write the
//! blob before the row, so a half-finished upload leaves nothing behind that
//! a client could see. Deletes remove the blob before the row, so a failed
//! blob delete leaves the row in place and the operation can be retried.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncRead;
use uuid::Uuid;

use docstream_core::constants::SIGNED_URL_TTL_SECS;
use docstream_core::models::{Document, DocumentStatus};
use docstream_core::AppError;
use docstream_db::DocumentRepository;
use docstream_storage::{document_key, Storage};

#[derive(Clone)]
pub struct DocumentService {
    repository: DocumentRepository,
    storage: Arc<dyn Storage>,
    initial_status: DocumentStatus,
}

impl DocumentService {
    pub fn new(
        repository: DocumentRepository,
        storage: Arc<dyn Storage>,
        initial_status: DocumentStatus,
    ) -> Self {
        Self {
            repository,
            storage,
            initial_status,
        }
    }

    /// Streams a new document into storage and records its metadata row.
    ///
    /// The blob is written first. If the metadata insert fails afterwards,
    /// the orphaned blob is deleted off the request path on a best-effort
    /// basis; the upload itself still reports the insert failure.
    #[tracing::instrument(skip(self, reader), fields(file_name = %file_name, owner_id = %owner_id))]
    pub async fn upload(
        &self,
        file_name: &str,
        mime_type: &str,
        owner_id: Uuid,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> Result<Document, AppError> {
        let id = Uuid::new_v4();
        let key = document_key(id);

        let size_bytes = self.storage.put_stream(&key, mime_type, reader).await?;

        match self
            .repository
            .insert(id, file_name, mime_type, self.initial_status, owner_id)
            .await
        {
            Ok(document) => {
                tracing::info!(document_id = %id, size_bytes, "Document uploaded");
                Ok(document)
            }
            Err(e) => {
                let storage = Arc::clone(&self.storage);
                tokio::spawn(async move {
                    if let Err(cleanup_err) = storage.delete(&key).await {
                        tracing::warn!(
                            key = %key,
                            error = %cleanup_err,
                            "Failed to remove blob after metadata insert failure"
                        );
                    }
                });
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Document, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Document>, AppError> {
        self.repository.list().await
    }

    /// Signed GET URL for the document blob, valid for one hour.
    #[tracing::instrument(skip(self), fields(document_id = %id))]
    pub async fn download_url(&self, id: Uuid) -> Result<String, AppError> {
        self.get(id).await?;

        let url = self
            .storage
            .presigned_get_url(&document_key(id), Duration::from_secs(SIGNED_URL_TTL_SECS))
            .await?;
        Ok(url)
    }

    /// Moves the document to `status`, enforcing the transition rules at the
    /// database layer so concurrent writers serialize on the row.
    pub async fn set_status(&self, id: Uuid, status: DocumentStatus) -> Result<Document, AppError> {
        self.repository.update_status(id, status).await
    }

    /// Removes the blob and then the metadata row.
    #[tracing::instrument(skip(self), fields(document_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.get(id).await?;

        self.storage.delete(&document_key(id)).await?;
        self.repository.hard_delete(id).await?;

        tracing::info!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// Tombstones the row without touching the blob, hiding the document
    /// from reads while keeping it recoverable.
    #[tracing::instrument(skip(self), fields(document_id = %id))]
    pub async fn soft_delete(&self, id: Uuid) -> Result<Document, AppError> {
        self.repository.soft_delete(id).await
    }
}
