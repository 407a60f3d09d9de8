//! Service layer sitting between the HTTP handlers and the storage/database
//! crates.
//!
//! Three pieces live here: the in-process status broadcaster backing the SSE
//! endpoints, the document lifecycle service that keeps blobs and metadata
//! rows consistent, and the ingestion service that dispatches work to the
//! external ingestion worker and applies its callbacks.

pub mod broadcast;
pub mod documents;
pub mod ingestion;

pub use broadcast::{StatusBroadcaster, Subscription};
pub use documents::DocumentService;
pub use ingestion::{IngestWorkerClient, IngestionService, WebhookOutcome};
