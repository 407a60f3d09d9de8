//! Shared constants.

/// Base path under which document blobs are stored in the bucket.
/// Keys are always `documents/{document_id}`; see `docstream-storage::keys`.
pub const DOCUMENTS_BASE_PATH: &str = "documents";

/// Lifetime of signed download URLs handed to clients and the ingestion worker.
pub const SIGNED_URL_TTL_SECS: u64 = 3600;

/// Part size for streaming multipart uploads (S3 minimum part size).
pub const UPLOAD_PART_SIZE: usize = 5 * 1024 * 1024;

/// Upper bound on parts uploaded in parallel per streaming upload.
pub const UPLOAD_MAX_CONCURRENCY: usize = 4;

/// Buffered events per status channel. A subscriber that falls further behind
/// than this lags and loses the oldest events; the emitter is never blocked.
pub const STATUS_CHANNEL_CAPACITY: usize = 64;
