//! JWT minting for tests.
//!
//! Tokens are issued by an external identity provider in production; tests
//! sign their own with the shared test secret.

use docstream_api::auth::models::JwtClaims;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

/// Test JWT secret (must match create_test_config).
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

/// Signs a one-hour token for a fresh user with the given role
/// ("admin", "editor", or "viewer").
pub fn mint_token(role: &str) -> String {
    mint_token_for(Uuid::new_v4(), role)
}

pub fn mint_token_for(user_id: Uuid, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
        nbf: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
