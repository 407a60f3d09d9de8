//! API constants
//!
//! Routes and the OpenAPI spec share the same versioned prefix. Bumping the
//! API version means changing `API_PREFIX` and the handler path annotations
//! together.

/// API base path prefix (version-independent)
#[allow(dead_code)]
pub const API_BASE: &str = "/api";

/// Versioned API prefix applied to all document routes.
pub const API_PREFIX: &str = "/api/v0";
