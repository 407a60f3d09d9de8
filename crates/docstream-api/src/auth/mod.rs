//! JWT authentication and role-based authorization
//!
//! Every document and ingestion route sits behind [`auth_middleware`], which
//! validates the bearer token and stores an [`AuthContext`] in the request
//! extensions. Handlers pull the context back out with the `FromRequestParts`
//! extractor on `AuthContext` and gate mutating operations through
//! [`AuthContext::require_editor`].

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::{AuthContext, JwtClaims, UserRole};
