//! Multipart helpers for the upload handlers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use folio_core::constants::MAX_FILE_SIZE_BYTES;
use folio_core::AppError;

use crate::services::upload::PhotoFile;

const FILE_FIELD: &str = "file";

/// Bodies cut off by the request body limit surface as 413, anything else as 400.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("max: {} bytes", MAX_FILE_SIZE_BYTES))
    } else {
        AppError::InvalidInput(format!("{}: {}", context, e))
    }
}

/// Extract the single `file` field of a multipart form.
///
/// A second `file` field is rejected. Missing filename and content type fall
/// back to values that fail photo validation later.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<PhotoFile, AppError> {
    let mut file: Option<PhotoFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        file = Some(PhotoFile::new(data.to_vec(), filename, content_type));
    }

    file.ok_or_else(|| AppError::InvalidInput("No file provided in field 'file'".to_string()))
}
