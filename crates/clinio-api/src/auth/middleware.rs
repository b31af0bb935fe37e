use crate::auth::models::{ClinicContext, JwtClaims};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use clinio_core::constants::{DEFAULT_CLINIC_ID, DEFAULT_USER_ID};
use clinio_core::AppError;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Credentials the bearer middleware validates against.
#[derive(Clone)]
pub struct AuthState {
    /// Optional service-to-service key; compared in constant time.
    pub service_api_key: Option<String>,
    pub jwt_secret: String,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Bearer authentication for all protected routes.
///
/// Accepts either the configured service API key or a clinic-scoped JWT;
/// either way a [`ClinicContext`] lands in the request extensions for
/// handlers to extract.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    if !auth_header.starts_with("Bearer ") {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    }

    let token = &auth_header[7..]; // Remove "Bearer " prefix

    if let Some(ref service_key) = auth_state.service_api_key {
        if secure_compare(token, service_key) {
            request.extensions_mut().insert(ClinicContext {
                clinic_id: DEFAULT_CLINIC_ID,
                user_id: DEFAULT_USER_ID,
            });
            return next.run(request).await;
        }
    }

    match decode_clinic_token(token, &auth_state.jwt_secret) {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}

fn decode_clinic_token(token: &str, secret: &str) -> Result<ClinicContext, AppError> {
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    Ok(ClinicContext {
        clinic_id: data.claims.clinic_id,
        user_id: data.claims.sub,
    })
}
