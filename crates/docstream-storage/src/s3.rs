use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt, Result as ObjectResult};
use tokio::io::{AsyncRead, AsyncWriteExt};

use docstream_core::constants::{UPLOAD_MAX_CONCURRENCY, UPLOAD_PART_SIZE};
use docstream_core::StorageBackend;

use crate::traits::{Storage, StorageError, StorageResult};

/// S3-compatible storage over two endpoints of the same bucket.
///
/// `store` talks to the internal endpoint for all data-plane operations;
/// `signer` produces presigned URLs against the externally reachable endpoint
/// so the links resolve from outside the deployment network. With no external
/// endpoint configured both roles use the internal one.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    signer: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_internal` - Optional endpoint for data-plane traffic
    ///   (e.g., "http://minio:9000" inside a compose network)
    /// * `endpoint_external` - Optional endpoint baked into signed URLs
    ///   (e.g., "http://localhost:9000" as browsers reach it)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_internal: Option<String>,
        endpoint_external: Option<String>,
    ) -> StorageResult<Self> {
        let store = Self::build_store(&bucket, &region, endpoint_internal.as_deref())?;

        let signing_endpoint = endpoint_external
            .as_deref()
            .or(endpoint_internal.as_deref());
        let signer = Self::build_store(&bucket, &region, signing_endpoint)?;

        Ok(S3Storage {
            store,
            signer,
            bucket,
        })
    }

    /// Build an AmazonS3 object store from environment and explicit settings.
    /// Credentials come from the usual AWS environment variables.
    fn build_store(
        bucket: &str,
        region: &str,
        endpoint: Option<&str>,
    ) -> StorageResult<AmazonS3> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.to_string())
            .with_bucket_name(bucket.to_string());

        if let Some(endpoint) = endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.to_string())
                .with_allow_http(allow_http);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let location = Path::from(key.to_string());
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // Fixed part size with bounded part concurrency; payloads smaller than
        // one part go up in a single put.
        let target: Arc<dyn ObjectStore> = Arc::new(self.store.clone());
        let mut writer = BufWriter::with_capacity(target, location, UPLOAD_PART_SIZE)
            .with_max_concurrency(UPLOAD_MAX_CONCURRENCY)
            .with_attributes(attributes);

        let copied = match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(n) => n,
            Err(e) => {
                // Abort releases any parts already uploaded; no partial object stays.
                let _ = writer.abort().await;
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        };

        // Shutdown completes the multipart upload (or issues the single put).
        if let Err(e) = writer.shutdown().await {
            let _ = writer.abort().await;
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = copied,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 stream upload failed"
            );
            return Err(StorageError::UploadFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(copied)
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key.to_string());
        let url_result: ObjectResult<_> = self
            .signer
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .to_string();

        Ok(url)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete successful"
                );
                Ok(())
            }
            // Deleting a missing key is success, not an error.
            Err(ObjectStoreError::NotFound { .. }) => Ok(()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Path::from(key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn download_stream(
        &self,
        key: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>> {
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bucket = self.bucket.clone();
        let key = key.to_string();

        let stream = result.into_stream().map(move |res| match res {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    "S3 stream download error"
                );
                Err(StorageError::DownloadFailed(e.to_string()))
            }
        });

        Ok(Box::pin(stream))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
