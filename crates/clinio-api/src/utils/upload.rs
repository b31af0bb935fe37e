//! Common utilities for the import upload handler

use axum::extract::Multipart;
use clinio_core::AppError;

/// Extract the uploaded file's bytes and filename from the multipart form.
///
/// Exactly one `importFile` field is accepted. A `type` field may accompany
/// it as a caller-supplied hint; it is drained and ignored because dispatch
/// goes by file extension.
pub async fn extract_import_file(mut multipart: Multipart) -> Result<(Vec<u8>, String), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "importFile" => {
                if file_data.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'importFile'"
                            .to_string(),
                    ));
                }
                filename = field.file_name().map(|s: &str| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
            }
            "type" => {
                let hint = field.text().await.unwrap_or_default();
                tracing::debug!(hint = %hint, "Ignoring caller-supplied import type field");
            }
            _ => {}
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    let filename = filename.unwrap_or_else(|| "unknown".to_string());

    Ok((file_data, filename))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Validate file extension; returns the lowercased extension on success.
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    if !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}
