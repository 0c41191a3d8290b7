//! Claims attached to an authenticated request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::Deref;

use super::{AuthClaims, AuthProvider};
use crate::handler::SessionErrorResponse;

/// Claims of the caller, resolved from the session store by the request
/// authenticator middleware.
///
/// Extraction never touches the session store: it reads the claims the
/// authenticator placed in the request extensions and rejects with
/// `401 {"error": true, "message": "unauthenticated"}` when there are none.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl AuthState {
    /// Returns the inner claims.
    #[inline]
    pub fn into_claims(self) -> AuthClaims {
        self.0
    }
}

impl AuthProvider for AuthState {
    #[inline]
    fn claims(&self) -> &AuthClaims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync,
{
    type Rejection = SessionErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(SessionErrorResponse::UNAUTHENTICATED)
    }
}

impl aide::OperationInput for AuthState {}
