use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::Identity;
use std::convert::Infallible;

/// Identity of the caller as resolved by [`auth_middleware`](super::middleware::auth_middleware).
///
/// Never rejects: a request the gate did not see, or could not authenticate,
/// yields the anonymous identity and endpoint logic decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .unwrap_or_default();
        Ok(CurrentIdentity(identity))
    }
}
