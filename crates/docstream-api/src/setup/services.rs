//! Service and repository initialization
//!
//! Builds the repository, service, and state graph shared by the HTTP layer.

use anyhow::Result;
use docstream_core::Config;
use docstream_db::DocumentRepository;
use docstream_services::{
    DocumentService, IngestWorkerClient, IngestionService, StatusBroadcaster,
};
use docstream_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::AuthState;
use crate::state::{AppState, DbState, DocumentsState, IngestState};

/// Initialize all services and assemble the application state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let is_production = config.is_production();

    tracing::info!(
        environment = %config.environment(),
        is_production = is_production,
        "Environment configuration loaded"
    );

    let document_repository = DocumentRepository::new(pool.clone());
    let broadcaster = Arc::new(StatusBroadcaster::new());

    let document_service = DocumentService::new(
        document_repository,
        storage.clone(),
        config.document_initial_status(),
    );

    let worker = match config.ingest_worker_url() {
        Some(url) => {
            tracing::info!(worker_url = %url, "Ingestion worker dispatch enabled");
            Some(IngestWorkerClient::new(
                url.to_string(),
                config.ingest_worker_timeout_seconds(),
            )?)
        }
        None => {
            tracing::warn!(
                "INGEST_WORKER_URL not set - ingestion triggers will be accepted as no-ops"
            );
            None
        }
    };

    let ingestion_service =
        IngestionService::new(document_service.clone(), broadcaster.clone(), worker);

    let auth = AuthState::new(config.jwt_secret());

    let state = Arc::new(AppState {
        db: DbState { pool },
        documents: DocumentsState {
            service: document_service,
            storage,
        },
        ingest: IngestState {
            service: ingestion_service,
            broadcaster,
        },
        auth,
        config: config.clone(),
        is_production,
    });

    tracing::info!("Services initialized");

    Ok(state)
}
