use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use folio_core::{AppError, Profile, TemplateUpdateRequest};
use serde::Serialize;
use validator::Validate;

use crate::auth::CurrentIdentity;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileSavedResponse {
    pub message: &'static str,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileExistsResponse {
    pub username: String,
    pub has_profile: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUpdatedResponse {
    pub message: &'static str,
    pub selected_template: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn profile_not_found(username: &str) -> HttpAppError {
    AppError::NotFound(format!("Profile not found for user: {}", username)).into()
}

pub async fn get_current_profile(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
) -> Result<Json<Profile>, HttpAppError> {
    let owner = identity.0.require_subject()?;
    state
        .profiles
        .find_by_owner(owner)
        .await?
        .map(Json)
        .ok_or_else(|| profile_not_found(owner))
}

/// Create or replace the caller's profile document.
///
/// The stored username, user id and profile photo are kept; a photo sent in
/// the body is ignored since only the upload endpoint sets it.
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
    ValidatedJson(mut profile): ValidatedJson<Profile>,
) -> Result<(StatusCode, Json<ProfileSavedResponse>), HttpAppError> {
    let owner = identity.0.require_subject()?;

    match state.profiles.find_by_owner(owner).await? {
        Some(existing) => profile.inherit_from(&existing),
        None => {
            profile.username = owner.to_string();
            profile.profile_photo = None;
            if profile.user_id.is_none() {
                profile.user_id = state
                    .users
                    .find_by_username(owner)
                    .await?
                    .map(|user| user.id.to_string());
            }
        }
    }

    let profile = state.profiles.save(profile).await?;
    tracing::info!(owner = %owner, "Profile saved");

    Ok((
        StatusCode::CREATED,
        Json(ProfileSavedResponse {
            message: "Profile saved successfully",
            profile,
        }),
    ))
}

/// Partial update of an existing profile.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
    ValidatedJson(updates): ValidatedJson<Profile>,
) -> Result<Json<ProfileSavedResponse>, HttpAppError> {
    let owner = identity.0.require_subject()?;

    let mut profile = state
        .profiles
        .find_by_owner(owner)
        .await?
        .ok_or_else(|| profile_not_found(owner))?;
    profile.apply_update(updates);

    let profile = state.profiles.save(profile).await?;
    tracing::info!(owner = %owner, "Profile updated");

    Ok(Json(ProfileSavedResponse {
        message: "Profile updated successfully",
        profile,
    }))
}

/// Delete the caller's profile together with its profile photo.
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let owner = identity.0.require_subject()?;

    let photo = state
        .profiles
        .find_by_owner(owner)
        .await?
        .and_then(|profile| profile.current_photo().map(String::from));

    if !state.profiles.delete_by_owner(owner).await? {
        return Err(profile_not_found(owner));
    }

    if let Some(photo) = photo {
        // Cleanup only; the profile is already gone.
        if let Err(e) = state.uploads.delete_file(&identity.0, &photo).await {
            tracing::warn!(error = %e, owner = %owner, "Profile photo cleanup skipped");
        }
    }

    tracing::info!(owner = %owner, "Profile deleted");
    Ok(Json(MessageResponse {
        message: "Profile deleted successfully",
    }))
}

pub async fn profile_exists(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
) -> Result<Json<ProfileExistsResponse>, HttpAppError> {
    let owner = identity.0.require_subject()?;
    let has_profile = state.profiles.exists_by_owner(owner).await?;

    Ok(Json(ProfileExistsResponse {
        username: owner.to_string(),
        has_profile,
    }))
}

pub async fn update_template(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
    ValidatedJson(request): ValidatedJson<TemplateUpdateRequest>,
) -> Result<Json<TemplateUpdatedResponse>, HttpAppError> {
    let owner = identity.0.require_subject()?;
    request.validate().map_err(AppError::from)?;

    let mut profile = state
        .profiles
        .find_by_owner(owner)
        .await?
        .ok_or_else(|| profile_not_found(owner))?;
    profile.selected_template = Some(request.selected_template.clone());
    state.profiles.save(profile).await?;

    Ok(Json(TemplateUpdatedResponse {
        message: "Template updated successfully",
        selected_template: request.selected_template,
    }))
}

/// Public view of any user's profile.
pub async fn get_profile_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Profile>, HttpAppError> {
    state
        .profiles
        .find_by_owner(&username)
        .await?
        .map(Json)
        .ok_or_else(|| profile_not_found(&username))
}
