//! Authentication gate
//!
//! Runs once per request, before any handler. It only *attempts*
//! authentication: a missing header, a bad token or an unknown user all leave
//! the request anonymous and it continues either way. Endpoints that need a
//! caller reject anonymous identities themselves.

use crate::auth::token::TokenCodec;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use folio_core::Identity;
use folio_db::UserRepository;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub users: Arc<dyn UserRepository>,
}

/// Token carried in `Authorization: Bearer <token>`, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller from request headers. Never fails.
pub async fn authenticate(
    headers: &HeaderMap,
    codec: &TokenCodec,
    users: &dyn UserRepository,
) -> Identity {
    let Some(token) = bearer_token(headers) else {
        return Identity::anonymous();
    };

    let identity = match codec.verify(token) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token, continuing as anonymous");
            return Identity::anonymous();
        }
    };

    match users.find_by_username(identity.subject()).await {
        Ok(Some(_)) => identity,
        Ok(None) => {
            tracing::debug!(
                subject = %identity.subject(),
                "Token subject has no user record, continuing as anonymous"
            );
            Identity::anonymous()
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                subject = %identity.subject(),
                "User lookup failed during authentication, continuing as anonymous"
            );
            Identity::anonymous()
        }
    }
}

/// Attach the caller's [`Identity`] to the request extensions.
///
/// A request that already carries an identity is passed through untouched.
pub async fn auth_middleware(
    State(state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<Identity>().is_none() {
        let identity = authenticate(request.headers(), &state.codec, state.users.as_ref()).await;
        if identity.is_authenticated() {
            tracing::debug!(subject = %identity.subject(), "Request authenticated");
        }
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};
    use folio_core::{AppError, UserRecord};
    use crate::auth::CurrentIdentity;
    use axum::{middleware::from_fn, middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use folio_db::InMemoryUserRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingUsers;

    #[async_trait]
    impl UserRepository for FailingUsers {
        async fn find_by_username(&self, _username: &str) -> Result<Option<UserRecord>, AppError> {
            Err(AppError::Internal("store offline".to_string()))
        }

        async fn exists_by_username(&self, _username: &str) -> Result<bool, AppError> {
            Err(AppError::Internal("store offline".to_string()))
        }

        async fn exists_by_email(&self, _email: &str) -> Result<bool, AppError> {
            Err(AppError::Internal("store offline".to_string()))
        }

        async fn create(&self, _user: UserRecord) -> Result<UserRecord, AppError> {
            Err(AppError::Internal("store offline".to_string()))
        }
    }

    /// Counts username lookups made against the wrapped repository.
    #[derive(Clone)]
    struct CountingUsers {
        inner: InMemoryUserRepository,
        lookups: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl UserRepository for CountingUsers {
        async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_username(username).await
        }

        async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
            self.inner.exists_by_username(username).await
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
            self.inner.exists_by_email(email).await
        }

        async fn create(&self, user: UserRecord) -> Result<UserRecord, AppError> {
            self.inner.create(user).await
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&[3u8; 64], Duration::hours(1)).unwrap()
    }

    async fn users_with(username: &str) -> InMemoryUserRepository {
        let users = InMemoryUserRepository::new();
        users
            .create(UserRecord::new(
                username.to_string(),
                format!("{}@example.com", username),
                "hash".to_string(),
            ))
            .await
            .unwrap();
        users
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_valid_token_for_known_user() {
        let codec = codec();
        let users = users_with("alice").await;
        let token = codec.issue("alice").unwrap();

        let identity =
            authenticate(&headers_with(&format!("Bearer {}", token)), &codec, &users).await;
        assert_eq!(identity, Identity::authenticated("alice"));
    }

    #[tokio::test]
    async fn test_no_header_is_anonymous() {
        let users = users_with("alice").await;
        let identity = authenticate(&HeaderMap::new(), &codec(), &users).await;
        assert_eq!(identity, Identity::anonymous());
    }

    #[tokio::test]
    async fn test_expired_token_is_anonymous() {
        let codec = codec();
        let users = users_with("alice").await;
        let token = codec
            .issue_at("alice", Utc::now() - Duration::hours(2))
            .unwrap();

        let identity =
            authenticate(&headers_with(&format!("Bearer {}", token)), &codec, &users).await;
        assert!(!identity.is_authenticated());
    }

    #[tokio::test]
    async fn test_unknown_user_is_anonymous() {
        let codec = codec();
        let users = users_with("alice").await;
        let token = codec.issue("ghost").unwrap();

        let identity =
            authenticate(&headers_with(&format!("Bearer {}", token)), &codec, &users).await;
        assert_eq!(identity, Identity::anonymous());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_anonymous() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();

        let identity = authenticate(
            &headers_with(&format!("Bearer {}", token)),
            &codec,
            &FailingUsers,
        )
        .await;
        assert_eq!(identity, Identity::anonymous());
    }

    async fn whoami(CurrentIdentity(identity): CurrentIdentity) -> String {
        identity.subject().to_string()
    }

    async fn preset_identity(mut request: Request, next: Next) -> Response {
        request
            .extensions_mut()
            .insert(Identity::authenticated("preset"));
        next.run(request).await
    }

    async fn counting_state() -> (Arc<AuthState>, Arc<AtomicUsize>, String) {
        let codec = codec();
        let token = codec.issue("alice").unwrap();
        let lookups = Arc::new(AtomicUsize::new(0));
        let users = CountingUsers {
            inner: users_with("alice").await,
            lookups: lookups.clone(),
        };
        let state = Arc::new(AuthState {
            codec: Arc::new(codec),
            users: Arc::new(users),
        });
        (state, lookups, token)
    }

    #[tokio::test]
    async fn test_existing_identity_is_left_alone() {
        let (state, lookups, token) = counting_state().await;
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(state, auth_middleware))
            .layer(from_fn(preset_identity));
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;

        response.assert_status_ok();
        response.assert_text("preset");
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stacked_gate_authenticates_once() {
        let (state, lookups, token) = counting_state().await;
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .layer(from_fn_with_state(state, auth_middleware));
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {}", token))
            .await;

        response.assert_status_ok();
        response.assert_text("alice");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }
}
