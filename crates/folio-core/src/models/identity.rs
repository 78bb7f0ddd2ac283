use crate::constants::ANONYMOUS_SUBJECT;
use crate::error::AppError;

/// Who is making the current call.
///
/// Built once per request by the authentication layer and handed to every
/// operation that needs it. There is no process-wide holder: each request owns
/// its own value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject: String,
    authenticated: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            subject: ANONYMOUS_SUBJECT.to_string(),
            authenticated: false,
        }
    }

    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            authenticated: true,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Subject of an authenticated caller, or `Unauthorized` for anonymous ones.
    pub fn require_subject(&self) -> Result<&str, AppError> {
        if self.authenticated {
            Ok(&self.subject)
        } else {
            Err(AppError::Unauthorized("Authentication required".to_string()))
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::anonymous()
    }
}
