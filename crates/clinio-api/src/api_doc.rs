//! OpenAPI documentation.
//! API version is in `crate::constants::API_VERSION`.
//! Paths in handler annotations use placeholder /api/v0; they are transformed at runtime to the actual version.

use utoipa::OpenApi;

use crate::constants::API_VERSION;
use crate::error;
use crate::handlers;
use clinio_core::models;

/// Placeholder version used in handler path annotations (utoipa requires compile-time literals).
/// Replaced at runtime in the served OpenAPI spec with API_VERSION.
const OPENAPI_PATH_PLACEHOLDER: &str = "/api/v0";

/// Transforms path keys in the OpenAPI spec from placeholder to actual API version.
fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, version: &str) {
    let replacement = format!("/api/{}", version);
    if OPENAPI_PATH_PLACEHOLDER == replacement {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, &replacement, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// Returns the OpenAPI spec with path placeholders replaced by the current API version.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, API_VERSION);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clinio Import API",
        version = "0.1.0",
        description = "ChiroTouch export import service (v0). Streams uploaded export archives into a scratch tree, classifies their structure, and returns bounded previews for clinic onboarding. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Import/export
        handlers::import_upload::upload_import,
        handlers::import_commit::commit_import,
        // Health
        handlers::health::health_check,
        handlers::health::readiness_check
    ),
    components(
        schemas(
            // Core models
            models::ImportPreview,
            models::TabularPreview,
            models::Taxonomy,
            models::TaxonomyBuckets,
            models::MaterializedFile,
            models::ExportBucket,
            models::PreviewReport,
            models::PreviewSection,
            models::DocumentInventorySection,
            models::DocumentFile,
            models::ImportSummary,
            models::ImportCommitResult,
            // Request/response bodies
            handlers::import_commit::CommitImportRequest,
            handlers::import_commit::CommitImportResponse,
            handlers::health::HealthResponse,
            // Errors
            error::ErrorResponse
        )
    ),
    tags(
        (name = "import-export", description = "ChiroTouch export upload, preview, and commit operations"),
        (name = "health", description = "Service health and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_contains_import_paths() {
        let spec = get_openapi_spec();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.ends_with("/import-export/upload")));
        assert!(paths.iter().any(|p| p.ends_with("/import-export/commit")));
        assert!(paths.iter().any(|p| *p == "/health"));
    }
}
