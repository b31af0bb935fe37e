use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    pub clinic_id: Uuid,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Clinic context extracted from the service key or JWT and stored in request extensions
#[derive(Debug, Clone, Copy)]
pub struct ClinicContext {
    pub clinic_id: Uuid,
    pub user_id: Uuid,
}

// Implement FromRequestParts for ClinicContext to work with Multipart
// Extension cannot be used with Multipart, so we extract directly from request parts
impl<S> FromRequestParts<S> for ClinicContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClinicContext>()
            .copied()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        message: "Missing clinic context".to_string(),
                        details: None,
                        error_type: None,
                        code: "MISSING_CLINIC_CONTEXT".to_string(),
                        recoverable: false,
                        suggested_action: Some(
                            "Check authentication token or service key".to_string(),
                        ),
                    }),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_claim_field_names() {
        let claims = JwtClaims {
            sub: Uuid::nil(),
            clinic_id: Uuid::nil(),
            exp: 1,
            iat: 0,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("sub").is_some());
        assert!(json.get("clinic_id").is_some());
        assert!(json.get("exp").is_some());
        assert!(json.get("iat").is_some());
    }
}
