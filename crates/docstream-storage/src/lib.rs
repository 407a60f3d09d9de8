//! Docstream Storage Library
//!
//! This crate provides the blob storage abstraction and implementations for
//! docstream. It includes the Storage trait plus S3-compatible and local
//! filesystem backends.
//!
//! # Storage key format
//!
//! Every document blob lives at `documents/{document_id}`. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the `keys`
//! module so all backends and callers stay consistent.

pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

mod factory;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::document_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;

pub use docstream_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
