//! Docstream Core Library
//!
//! This crate provides the core domain models, error types, and configuration
//! that are shared across all docstream components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, DocstreamConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Document, DocumentResponse, DocumentStatus, StatusEvent, StatusEventPayload,
};
pub use storage_types::StorageBackend;
