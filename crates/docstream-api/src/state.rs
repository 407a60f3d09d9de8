//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers can extract only what they need
//! via Axum's `FromRef`, and to avoid a single god object with duplicate service handles.

use crate::auth::AuthState;
use docstream_core::Config;
use docstream_services::{DocumentService, IngestionService, StatusBroadcaster};
use docstream_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

// ----- Sub-state types -----

/// Database pool shared by readiness checks and migrations.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
}

/// Document CRUD service plus the storage handle used for health checks and
/// direct blob serving.
#[derive(Clone)]
pub struct DocumentsState {
    pub service: DocumentService,
    pub storage: Arc<dyn Storage>,
}

/// Ingestion orchestration and the per-document status channel registry.
#[derive(Clone)]
pub struct IngestState {
    pub service: IngestionService,
    pub broadcaster: Arc<StatusBroadcaster>,
}

// ----- AppState -----

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub documents: DocumentsState,
    pub ingest: IngestState,
    pub auth: AuthState,
    pub config: Config,
    pub is_production: bool,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for DocumentsState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.documents.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for IngestState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.ingest.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for AuthState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
