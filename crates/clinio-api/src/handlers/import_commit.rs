//! Import commit endpoint.
//!
//! Consumes a scratch tree kept alive by a successful ZIP preview: the tree
//! is re-classified from disk, handed to the platform's commit collaborator,
//! and removed afterward whatever the committer recorded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use clinio_core::models::ImportCommitResult;
use clinio_core::AppError;
use clinio_ingest::{classify_extracted, ImportError};

use crate::auth::models::ClinicContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitImportRequest {
    pub upload_id: String,
    /// Extraction root returned by the upload preview.
    pub extract_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitImportResponse {
    pub success: bool,
    pub upload_id: String,
    pub result: ImportCommitResult,
}

/// Commit a previously previewed ChiroTouch export.
#[utoipa::path(
    post,
    path = "/api/v0/import-export/commit",
    tag = "import-export",
    request_body = CommitImportRequest,
    responses(
        (status = 200, description = "Export handed to the commit collaborator and scratch tree removed", body = CommitImportResponse),
        (status = 400, description = "Invalid extract path or unrecognized export structure", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 500, description = "Commit collaborator failure", body = ErrorResponse)
    )
)]
pub async fn commit_import(
    State(state): State<Arc<AppState>>,
    clinic_ctx: ClinicContext,
    ValidatedJson(request): ValidatedJson<CommitImportRequest>,
) -> Result<Json<CommitImportResponse>, HttpAppError> {
    let extract_root = resolve_extract_path(&state.imports.uploads_root, &request.extract_path)?;

    let worker_root = extract_root.clone();
    let taxonomy = tokio::task::spawn_blocking(move || classify_extracted(&worker_root))
        .await
        .map_err(|join_err| {
            HttpAppError(AppError::Internal(format!(
                "Import worker failed: {join_err}"
            )))
        })??;

    if !taxonomy.is_recognized_export {
        // The tree no longer looks like an export; do not hand it on.
        remove_extract_tree(&extract_root).await;
        return Err(ImportError::UnrecognizedStructure.into());
    }

    let result = state
        .committer
        .commit(
            clinic_ctx.clinic_id,
            clinic_ctx.user_id,
            &extract_root,
            &taxonomy,
        )
        .await?;

    remove_extract_tree(&extract_root).await;

    tracing::info!(
        clinic_id = %clinic_ctx.clinic_id,
        upload_id = %request.upload_id,
        patients_created = result.patients_created,
        appointments_created = result.appointments_created,
        ledger_rows_created = result.ledger_rows_created,
        "Import committed"
    );

    Ok(Json(CommitImportResponse {
        success: true,
        upload_id: request.upload_id,
        result,
    }))
}

/// Resolve a caller-supplied extract path and refuse anything that is not an
/// extraction directory under the uploads root.
fn resolve_extract_path(uploads_root: &Path, extract_path: &str) -> Result<PathBuf, AppError> {
    let canonical_root = uploads_root
        .canonicalize()
        .map_err(|err| AppError::Internal(format!("Uploads root unavailable: {err}")))?;
    let canonical = Path::new(extract_path)
        .canonicalize()
        .map_err(|_| AppError::InvalidInput("Extract path does not exist".to_string()))?;

    if !canonical.starts_with(&canonical_root) {
        return Err(AppError::PathTraversal(extract_path.to_string()));
    }
    let is_extract_dir = canonical
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("extract-"));
    if !is_extract_dir {
        return Err(AppError::InvalidInput(
            "Extract path is not an extraction directory".to_string(),
        ));
    }

    Ok(canonical)
}

/// Remove a consumed scratch tree, logging rather than failing the request
/// when the delete itself goes wrong.
async fn remove_extract_tree(extract_root: &Path) {
    if let Err(err) = tokio::fs::remove_dir_all(extract_root).await {
        tracing::warn!(
            error = %err,
            path = %extract_root.display(),
            "Failed to remove committed extract tree"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_extract_path_accepts_extract_dir() {
        let root = tempdir().unwrap();
        let extract = root.path().join("extract-abc123");
        std::fs::create_dir(&extract).unwrap();

        let resolved =
            resolve_extract_path(root.path(), extract.to_str().unwrap()).unwrap();
        assert!(resolved.ends_with("extract-abc123"));
    }

    #[test]
    fn test_resolve_extract_path_rejects_escape() {
        let root = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let decoy = outside.path().join("extract-decoy");
        std::fs::create_dir(&decoy).unwrap();

        let err =
            resolve_extract_path(root.path(), decoy.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::PathTraversal(_)));
    }

    #[test]
    fn test_resolve_extract_path_rejects_uploads_root_itself() {
        let root = tempdir().unwrap();

        let err =
            resolve_extract_path(root.path(), root.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_resolve_extract_path_rejects_missing_dir() {
        let root = tempdir().unwrap();
        let missing = root.path().join("extract-gone");

        let err =
            resolve_extract_path(root.path(), missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
