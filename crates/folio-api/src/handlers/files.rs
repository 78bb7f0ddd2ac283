use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use chrono::Utc;
use folio_core::PortfolioPhotoType;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentIdentity;
use crate::error::HttpAppError;
use crate::services::upload::{StorageInfo, UploadOutcome};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file_url: String,
    pub filename: String,
    pub size: usize,
    pub storage_type: &'static str,
    pub photo_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl UploadResponse {
    fn from_outcome(outcome: UploadOutcome, message: String) -> Self {
        Self {
            success: true,
            message,
            file_url: outcome.file_url,
            filename: outcome.original_filename,
            size: outcome.size,
            storage_type: outcome.storage_type.display_name(),
            photo_type: outcome.photo_type,
            path: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    pub message: &'static str,
    pub storage_type: String,
    pub s3_available: bool,
    pub local_storage_available: bool,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfoResponse {
    pub success: bool,
    #[serde(flatten)]
    pub info: StorageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileQuery {
    pub file_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileResponse {
    pub success: bool,
    pub message: &'static str,
    pub file_url: String,
}

pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let info = state.uploads.storage_info();
    Json(PingResponse {
        message: "File upload service is running",
        storage_type: info.current_storage_type,
        s3_available: info.s3_available,
        local_storage_available: info.local_storage_available,
        timestamp: Utc::now().timestamp_millis(),
    })
}

pub async fn storage_info(State(state): State<Arc<AppState>>) -> Json<StorageInfoResponse> {
    Json(StorageInfoResponse {
        success: true,
        info: state.uploads.storage_info(),
    })
}

#[tracing::instrument(skip(state, identity, multipart), fields(owner = %identity.0.subject()))]
pub async fn upload_profile_photo(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    identity.0.require_subject()?;
    let file = extract_multipart_file(multipart).await?;
    let outcome = state.uploads.upload_profile_photo(&identity.0, file).await?;

    Ok(Json(UploadResponse::from_outcome(
        outcome,
        "Profile photo uploaded successfully".to_string(),
    )))
}

/// Portfolio section uploads; one route per [`PortfolioPhotoType`].
#[tracing::instrument(
    skip(state, identity, multipart),
    fields(owner = %identity.0.subject(), photo_type = %kind)
)]
pub async fn upload_portfolio_photo(
    kind: PortfolioPhotoType,
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    identity.0.require_subject()?;
    let file = extract_multipart_file(multipart).await?;
    let outcome = state
        .uploads
        .upload_portfolio_photo(&identity.0, kind, file)
        .await?;

    Ok(Json(UploadResponse::from_outcome(
        outcome,
        format!("{} photo uploaded successfully", kind),
    )))
}

#[tracing::instrument(skip(state, identity, multipart), fields(owner = %identity.0.subject()))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    identity: CurrentIdentity,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    identity.0.require_subject()?;
    let file = extract_multipart_file(multipart).await?;
    let outcome = state.uploads.upload_file(&identity.0, &path, file).await?;

    let mut response =
        UploadResponse::from_outcome(outcome, "File uploaded successfully".to_string());
    response.path = Some(path);
    Ok(Json(response))
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
    Query(query): Query<DeleteFileQuery>,
) -> Result<Json<DeleteFileResponse>, HttpAppError> {
    state
        .uploads
        .delete_file(&identity.0, &query.file_url)
        .await?;

    Ok(Json(DeleteFileResponse {
        success: true,
        message: "File deleted successfully",
        file_url: query.file_url,
    }))
}
