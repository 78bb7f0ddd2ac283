use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Profile;
use crate::constants::ANONYMOUS_SUBJECT;

/// Request DTO for creating an account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username must be between 3 and 50 characters"
        ),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    pub password: String,
}

/// Request DTO for exchanging credentials for an access token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUpdateRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "selectedTemplate is required"
    ))]
    pub selected_template: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub username: String,
    pub profile: Option<Profile>,
    pub has_profile: bool,
}

/// Usernames become storage key segments and token subjects: plain ASCII
/// letters, digits, `-`, `_` and `.`, and never the anonymous sentinel.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.eq_ignore_ascii_case(ANONYMOUS_SUBJECT) {
        return Err(ValidationError::new("reserved_username")
            .with_message("This username is reserved".into()));
    }
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid_chars || username.starts_with('.') {
        return Err(ValidationError::new("invalid_username").with_message(
            "Username may only contain letters, digits, '-', '_' and '.'".into(),
        ));
    }
    Ok(())
}
