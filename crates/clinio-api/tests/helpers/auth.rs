//! Auth helpers for integration tests.

#![allow(dead_code)]

use chrono::Utc;
use clinio_api::auth::models::JwtClaims;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

/// Test JWT secret (must satisfy the 32-character minimum).
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

/// Test service API key (must match setup_test_app).
pub const TEST_SERVICE_API_KEY: &str = "test-service-api-key-at-least-32-chars-long";

/// Authorization header value for service-to-service requests.
pub fn service_bearer() -> String {
    format!("Bearer {}", TEST_SERVICE_API_KEY)
}

/// Authorization header value carrying a clinic-scoped JWT, signed the way
/// the platform's auth service signs them.
pub fn clinic_bearer(clinic_id: Uuid, user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        clinic_id,
        exp: now + 3600,
        iat: now,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token");
    format!("Bearer {}", token)
}
