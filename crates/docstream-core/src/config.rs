//! Configuration module
//!
//! All configuration is read from the environment (with `.env` support via
//! dotenvy). Required variables fail startup with a descriptive error;
//! optional ones fall back to the defaults below.

use std::env;
use std::str::FromStr;

use crate::models::DocumentStatus;
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_S3_REGION: &str = "us-east-1";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DATABASE_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_INGEST_WORKER_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_DOCUMENT_SIZE_MB: usize = 100;

/// Service configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct DocstreamConfig {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,

    pub database_url: String,
    pub database_max_connections: u32,
    pub database_timeout_seconds: u64,

    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_endpoint_internal: Option<String>,
    pub s3_endpoint_external: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,

    pub ingest_worker_url: Option<String>,
    pub ingest_worker_timeout_seconds: u64,

    pub max_document_size_mb: usize,
    pub document_initial_status: DocumentStatus,
}

impl DocstreamConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
        let is_production = environment == "production";

        let server_port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid PORT value '{}': {}", port, e))?,
            Err(_) => DEFAULT_PORT,
        };

        let cors_origins = parse_cors_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );
        ensure_cors_allowed(&cors_origins, is_production)?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let database_max_connections = parse_env_or(
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?;
        let database_timeout_seconds = parse_env_or(
            "DATABASE_TIMEOUT_SECONDS",
            DEFAULT_DATABASE_TIMEOUT_SECONDS,
        )?;

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => StorageBackend::from_str(&raw)?,
            Err(_) => StorageBackend::S3,
        };

        let ingest_worker_timeout_seconds = parse_env_or(
            "INGEST_WORKER_TIMEOUT_SECONDS",
            DEFAULT_INGEST_WORKER_TIMEOUT_SECONDS,
        )?;
        let max_document_size_mb =
            parse_env_or("MAX_DOCUMENT_SIZE_MB", DEFAULT_MAX_DOCUMENT_SIZE_MB)?;

        let document_initial_status = match env::var("DOCUMENT_INITIAL_STATUS") {
            Ok(raw) => {
                let status = DocumentStatus::from_str(&raw)?;
                if !matches!(status, DocumentStatus::Pending | DocumentStatus::UnIngested) {
                    return Err(anyhow::anyhow!(
                        "DOCUMENT_INITIAL_STATUS must be 'pending' or 'un_ingested', got '{}'",
                        raw
                    ));
                }
                status
            }
            Err(_) => DocumentStatus::UnIngested,
        };

        Ok(DocstreamConfig {
            environment,
            server_port,
            cors_origins,
            jwt_secret,
            database_url,
            database_max_connections,
            database_timeout_seconds,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
            s3_endpoint_internal: env::var("S3_ENDPOINT_INTERNAL").ok(),
            s3_endpoint_external: env::var("S3_ENDPOINT_EXTERNAL").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            ingest_worker_url: env::var("INGEST_WORKER_URL").ok(),
            ingest_worker_timeout_seconds,
            max_document_size_mb,
            document_initial_status,
        })
    }
}

fn parse_env_or<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {} value '{}': {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn ensure_cors_allowed(origins: &[String], is_production: bool) -> Result<(), anyhow::Error> {
    if is_production && origins.iter().any(|origin| origin == "*") {
        return Err(anyhow::anyhow!(
            "CORS_ORIGINS must list explicit origins in production, '*' is not allowed"
        ));
    }
    Ok(())
}

/// Boxed to keep the frequently-cloned handle small.
#[derive(Debug, Clone)]
pub struct Config(pub Box<DocstreamConfig>);

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config(Box::new(DocstreamConfig::from_env()?)))
    }

    pub fn environment(&self) -> &str {
        &self.0.environment
    }

    pub fn is_production(&self) -> bool {
        self.0.environment == "production"
    }

    pub fn server_port(&self) -> u16 {
        self.0.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.0.jwt_secret
    }

    pub fn database_url(&self) -> &str {
        &self.0.database_url
    }

    pub fn database_max_connections(&self) -> u32 {
        self.0.database_max_connections
    }

    pub fn database_timeout_seconds(&self) -> u64 {
        self.0.database_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.0.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.0.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> &str {
        &self.0.s3_region
    }

    pub fn s3_endpoint_internal(&self) -> Option<&str> {
        self.0.s3_endpoint_internal.as_deref()
    }

    pub fn s3_endpoint_external(&self) -> Option<&str> {
        self.0.s3_endpoint_external.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.0.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.0.local_storage_base_url.as_deref()
    }

    pub fn ingest_worker_url(&self) -> Option<&str> {
        self.0.ingest_worker_url.as_deref()
    }

    pub fn ingest_worker_timeout_seconds(&self) -> u64 {
        self.0.ingest_worker_timeout_seconds
    }

    pub fn max_document_size_bytes(&self) -> usize {
        self.0.max_document_size_mb * 1024 * 1024
    }

    pub fn document_initial_status(&self) -> DocumentStatus {
        self.0.document_initial_status
    }
}
