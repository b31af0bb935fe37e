//! Import upload orchestrator.
//!
//! Accepts one multipart file per request and dispatches on its extension:
//! ZIP uploads stream through the export preview pipeline and keep their
//! extracted scratch tree alive for the commit step, while CSV/Excel uploads
//! are parsed whole and returned as a tabular preview. Every upload is
//! spooled under the uploads root while it is being processed; only a
//! successful ZIP preview leaves anything behind.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Extension, Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use clinio_core::models::{ImportPreview, TabularPreview, TABULAR_PREVIEW_CAP};
use clinio_core::AppError;
use clinio_ingest::{
    new_upload_id, parse_csv, parse_excel, preview_export, ArchivePreview, ImportError, ScratchDir,
};

use crate::auth::models::ClinicContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::middleware::request_id::RequestId;
use crate::state::AppState;
use crate::utils::upload::{extract_import_file, validate_file_extension, validate_file_size};

/// Upload a ChiroTouch export archive or a single tabular file.
#[utoipa::path(
    post,
    path = "/api/v0/import-export/upload",
    tag = "import-export",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "ZIP: export structure preview with extract path. CSV/Excel: tabular preview.", body = ImportPreview),
        (status = 400, description = "Unrecognized export structure or invalid file", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 413, description = "File exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Import pipeline failure", body = ErrorResponse)
    )
)]
pub async fn upload_import(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    clinic_ctx: ClinicContext,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let (data, file_name) = extract_import_file(multipart).await?;

    validate_file_size(data.len(), state.imports.max_import_size_bytes)?;
    let extension = validate_file_extension(&file_name, &state.imports.allowed_extensions)?;

    let upload_id = new_upload_id();
    tracing::info!(
        request_id = %request_id.0,
        clinic_id = %clinic_ctx.clinic_id,
        user_id = %clinic_ctx.user_id,
        file_name = %file_name,
        size_bytes = data.len(),
        kind = %extension,
        upload_id = %upload_id,
        "Import upload received"
    );

    match extension.as_str() {
        "zip" => Ok(preview_zip(&state, data, upload_id).await?.into_response()),
        "csv" | "xlsx" | "xls" => Ok(preview_tabular(&state, data, &extension, upload_id)
            .await?
            .into_response()),
        // The allow-list is configurable, but the pipeline only parses these.
        other => Err(HttpAppError(AppError::InvalidInput(format!(
            "Unsupported import file type: {other}"
        )))),
    }
}

/// Spool the archive to disk, extract and classify it on a blocking worker,
/// and hand the scratch tree to the caller on success.
///
/// The spooled archive itself never outlives the request. The scratch tree is
/// removed by [`ScratchDir`]'s drop guard on every failure path, including a
/// worker panic; only a recognized export survives, via `keep`.
async fn preview_zip(
    state: &AppState,
    data: Vec<u8>,
    upload_id: String,
) -> Result<Json<ImportPreview>, HttpAppError> {
    let uploads_root = state.imports.uploads_root.clone();
    let archive_path = uploads_root.join(format!("upload-{upload_id}.zip"));

    tokio::fs::write(&archive_path, &data)
        .await
        .map_err(|err| {
            HttpAppError(AppError::Internal(format!(
                "Failed to spool uploaded archive: {err}"
            )))
        })?;
    drop(data);

    let worker_archive = archive_path.clone();
    let worker_id = upload_id.clone();
    let result = tokio::task::spawn_blocking(
        move || -> Result<(ScratchDir, ArchivePreview), ImportError> {
            let scratch = ScratchDir::create(&uploads_root, &worker_id)?;
            let preview = preview_export(&worker_archive, scratch.path())?;
            Ok((scratch, preview))
        },
    )
    .await;

    remove_spool(&archive_path).await;

    let (scratch, preview) = match result {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(import_err)) => return Err(import_err.into()),
        Err(join_err) => {
            return Err(HttpAppError(AppError::Internal(format!(
                "Import worker failed: {join_err}"
            ))))
        }
    };

    let extract_path = scratch.keep();

    Ok(Json(ImportPreview {
        success: true,
        is_chirotouch: true,
        structure: preview.taxonomy,
        preview: preview.report,
        upload_id,
        extract_path: extract_path.display().to_string(),
    }))
}

/// Parse a single CSV or Excel file and return its full contents plus a
/// bounded preview. The spooled copy is removed before responding.
async fn preview_tabular(
    state: &AppState,
    data: Vec<u8>,
    extension: &str,
    upload_id: String,
) -> Result<Json<TabularPreview>, HttpAppError> {
    let spool_path = state
        .imports
        .uploads_root
        .join(format!("upload-{upload_id}.{extension}"));

    tokio::fs::write(&spool_path, &data).await.map_err(|err| {
        HttpAppError(AppError::Internal(format!(
            "Failed to spool uploaded file: {err}"
        )))
    })?;
    drop(data);

    let parse_path = spool_path.clone();
    let is_csv = extension == "csv";
    let result = tokio::task::spawn_blocking(move || {
        if is_csv {
            parse_csv(&parse_path)
        } else {
            parse_excel(&parse_path)
        }
    })
    .await;

    remove_spool(&spool_path).await;

    let table = match result {
        Ok(parsed) => parsed?,
        Err(join_err) => {
            return Err(HttpAppError(AppError::Internal(format!(
                "Import worker failed: {join_err}"
            ))))
        }
    };

    let total_rows = table.rows.len() as u64;
    let preview = table
        .rows
        .iter()
        .take(TABULAR_PREVIEW_CAP)
        .cloned()
        .collect();

    Ok(Json(TabularPreview {
        success: true,
        total_rows,
        preview,
        columns: table.columns,
        upload_id,
        data: table.rows,
    }))
}

/// Remove a spooled upload, tolerating it already being gone.
async fn remove_spool(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "Failed to remove spooled upload"
            );
        }
    }
}
