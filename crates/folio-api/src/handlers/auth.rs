use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use folio_core::{
    AppError, LoginRequest, LoginResponse, Profile, RegisterRequest, UserRecord,
};
use serde::Serialize;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Authentication failed: Invalid username or password.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub username: String,
    pub email: String,
    pub profile_created: bool,
}

/// Create an account and an empty profile owned by it.
#[tracing::instrument(skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), HttpAppError> {
    request.validate().map_err(AppError::from)?;

    if state.users.exists_by_username(&request.username).await? {
        return Err(AppError::BadRequest("Username is already taken".to_string()).into());
    }
    if state.users.exists_by_email(&request.email).await? {
        return Err(AppError::BadRequest("Email is already in use".to_string()).into());
    }

    let password_hash = hash_password(&request.password)?;
    let user = state
        .users
        .create(UserRecord::new(
            request.username,
            request.email,
            password_hash,
        ))
        .await?;

    // The account exists at this point; a failed profile insert is reported
    // in the body rather than failing the registration.
    let profile_created = match state
        .profiles
        .save(Profile::new(user.username.clone(), user.id.to_string()))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, username = %user.username, "Failed to create empty profile");
            false
        }
    };

    tracing::info!(username = %user.username, profile_created, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: if profile_created {
                "User registered successfully with profile"
            } else {
                "User registered successfully, but profile creation failed"
            },
            username: user.username,
            email: user.email,
            profile_created,
        }),
    ))
}

/// Exchange username and password for a bearer token.
#[tracing::instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpAppError> {
    request
        .validate()
        .map_err(|_| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let user = state.users.find_by_username(&request.username).await?;
    let Some(user) = user.filter(|u| verify_password(&request.password, &u.password_hash)) else {
        tracing::info!("Login rejected");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()).into());
    };

    let access_token = state.codec.issue(&user.username)?;
    let profile = state.profiles.find_by_owner(&user.username).await?;

    tracing::info!("User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.codec.ttl().num_seconds(),
        username: user.username,
        has_profile: profile.is_some(),
        profile,
    }))
}
