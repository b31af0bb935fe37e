//! Liveness and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::ImportConfig;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Liveness probe. Answers as long as the process is up.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::with_status("ok"))
}

/// Readiness probe. Verifies the uploads root accepts writes, since every
/// import spools through it.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service can accept imports", body = HealthResponse),
        (status = 503, description = "Uploads root is not writable", body = HealthResponse)
    )
)]
pub async fn readiness_check(State(imports): State<ImportConfig>) -> impl IntoResponse {
    let probe = imports
        .uploads_root
        .join(format!(".readiness-{}", uuid::Uuid::new_v4()));

    match tokio::fs::write(&probe, b"ok").await {
        Ok(()) => {
            if let Err(err) = tokio::fs::remove_file(&probe).await {
                tracing::warn!(
                    error = %err,
                    path = %probe.display(),
                    "Failed to remove readiness probe file"
                );
            }
            (StatusCode::OK, Json(HealthResponse::with_status("ready")))
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                uploads_root = %imports.uploads_root.display(),
                "Uploads root rejected readiness write probe"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::with_status("unavailable")),
            )
        }
    }
}
