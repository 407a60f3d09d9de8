//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use docstream_core::Config;

/// Validate critical configuration values
///
/// This function checks that critical configuration is set correctly and will
/// fail fast if there are issues that could cause security problems or runtime errors.
pub fn validate_config(config: &Config) -> Result<()> {
    // Validate production mode detection
    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();

    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    // Validate database connection settings
    if config.database_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.database_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    // Validate file size limits
    if config.max_document_size_bytes() == 0 {
        return Err(anyhow::anyhow!("Max document size cannot be 0"));
    }

    // An empty worker URL would build a client that can never dispatch;
    // unset means ingestion triggers are accepted as no-ops instead.
    if let Some(url) = config.ingest_worker_url() {
        if url.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "INGEST_WORKER_URL is set but empty - unset it to disable dispatch"
            ));
        }
        if config.ingest_worker_timeout_seconds() == 0 {
            return Err(anyhow::anyhow!("Ingest worker timeout cannot be 0"));
        }
    }

    // Warn about weak JWT secrets in production
    if is_production && config.jwt_secret().len() < 32 {
        tracing::warn!(
            "JWT secret is shorter than 32 characters - consider using a longer, more secure secret"
        );
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
