use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use tokio::io::AsyncRead;

use docstream_core::StorageBackend;

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to upload object: {0}")]
    UploadFailed(String),

    #[error("Failed to download object: {0}")]
    DownloadFailed(String),

    #[error("Failed to delete object: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for docstream_core::AppError {
    fn from(err: StorageError) -> Self {
        use docstream_core::AppError;
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Blob storage abstraction over S3-compatible and local filesystem backends.
///
/// Implementations must be safe to share across tasks; the application holds a
/// single `Arc<dyn Storage>`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Streams a payload to `key` without buffering the whole body in memory.
    /// A failed upload must not leave a partial object behind. Returns the
    /// number of bytes written.
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// Credential-free signed GET URL for `key`, valid for `expires_in`.
    /// Produced against the externally reachable endpoint.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Removes the object at `key`. Idempotent: deleting a missing key
    /// succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Streams the object at `key` back to the caller.
    async fn download_stream(
        &self,
        key: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>>;

    /// Backend tag for logs.
    fn backend_type(&self) -> StorageBackend;
}
