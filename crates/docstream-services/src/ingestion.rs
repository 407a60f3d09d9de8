//! Ingestion orchestration.
//!
//! Triggering hands a document to the external ingestion worker: mint a
//! signed download URL, POST it to the worker, and only then mark the row
//! INGESTING. The worker reports back through the webhook, which fans the
//! status out to SSE subscribers before anything is persisted so watchers
//! see every callback, terminal or not.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use docstream_core::models::DocumentStatus;
use docstream_core::AppError;

use crate::broadcast::StatusBroadcaster;
use crate::documents::DocumentService;

/// Payload posted to the ingestion worker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DispatchPayload<'a> {
    document_id: Uuid,
    download_url: &'a str,
}

/// HTTP client for the external ingestion worker.
#[derive(Clone)]
pub struct IngestWorkerClient {
    http_client: Client,
    worker_url: String,
}

impl IngestWorkerClient {
    pub fn new(worker_url: String, timeout_seconds: u64) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client for the ingestion worker")?;

        Ok(Self {
            http_client,
            worker_url,
        })
    }

    /// POSTs the document id and signed download URL to the worker. Any
    /// non-2xx response counts as a dispatch failure.
    #[tracing::instrument(skip(self, download_url), fields(document_id = %document_id))]
    pub async fn dispatch(&self, document_id: Uuid, download_url: &str) -> Result<(), AppError> {
        let payload = DispatchPayload {
            document_id,
            download_url,
        };

        let response = self
            .http_client
            .post(&self.worker_url)
            .header("User-Agent", "Docstream-Ingest/1.0")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamFailure(format!("Failed to reach ingestion worker: {}", e))
            })?;

        let status_code = response.status().as_u16();
        if (200..300).contains(&status_code) {
            tracing::info!(status_code, "Ingestion dispatched to worker");
            Ok(())
        } else {
            let response_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Failed to read response body"));
            Err(AppError::UpstreamFailure(format!(
                "Ingestion worker returned non-2xx status: {} - {}",
                status_code, response_body
            )))
        }
    }
}

/// What a webhook callback did, for the handler to shape its response.
#[derive(Debug, Clone, Copy)]
pub struct WebhookOutcome {
    pub status: DocumentStatus,
    pub terminal: bool,
}

#[derive(Clone)]
pub struct IngestionService {
    documents: DocumentService,
    broadcaster: Arc<StatusBroadcaster>,
    worker: Option<IngestWorkerClient>,
}

impl IngestionService {
    pub fn new(
        documents: DocumentService,
        broadcaster: Arc<StatusBroadcaster>,
        worker: Option<IngestWorkerClient>,
    ) -> Self {
        Self {
            documents,
            broadcaster,
            worker,
        }
    }

    /// Dispatches `id` to the ingestion worker and marks it INGESTING.
    ///
    /// Only UN_INGESTED and FAILED documents can be triggered. Without a
    /// configured worker the call succeeds without side effects, so
    /// deployments that ingest out-of-band keep a working API. The status
    /// moves only after the worker accepts the dispatch; a rejected dispatch
    /// leaves the document re-triggerable.
    #[tracing::instrument(skip(self), fields(document_id = %id))]
    pub async fn trigger(&self, id: Uuid) -> Result<(), AppError> {
        let document = self.documents.get(id).await?;

        if !document.status.can_trigger_ingestion() {
            return Err(AppError::InvalidTransition {
                from: document.status,
                to: DocumentStatus::Ingesting,
            });
        }

        let Some(worker) = &self.worker else {
            tracing::info!("No ingestion worker configured, trigger is a no-op");
            return Ok(());
        };

        let download_url = self.documents.download_url(id).await?;
        worker.dispatch(id, &download_url).await?;

        self.documents
            .set_status(id, DocumentStatus::Ingesting)
            .await?;
        Ok(())
    }

    /// Applies a status callback from the worker.
    ///
    /// The event is broadcast to subscribers first, unconditionally. A
    /// terminal status then completes the channel and persists the row, in
    /// that order, so streams end before the database reflects the final
    /// state. Non-terminal callbacks are broadcast-only.
    #[tracing::instrument(skip(self), fields(document_id = %document_id, status = %status))]
    pub async fn handle_webhook(
        &self,
        document_id: Uuid,
        status: DocumentStatus,
    ) -> Result<WebhookOutcome, AppError> {
        self.broadcaster.emit(document_id, status);

        if status.is_terminal() {
            self.broadcaster.complete(document_id);
            self.documents.set_status(document_id, status).await?;
            return Ok(WebhookOutcome {
                status,
                terminal: true,
            });
        }

        Ok(WebhookOutcome {
            status,
            terminal: false,
        })
    }
}
