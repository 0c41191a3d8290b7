//! Request authenticator and access gate.
//!
//! [`authenticate`] wraps the whole router and only ever attaches claims.
//! [`require_authentication`] wraps the protected routes and rejects
//! requests that arrive without them.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::extract::{AuthHeader, AuthState};
use crate::handler::Error;
use crate::service::SessionStore;

/// Resolves the bearer token, if any, and attaches the caller's claims.
///
/// A missing, unknown or expired token lets the request through without
/// claims. A session store that cannot be reached fails the request with
/// `500` instead of degrading to anonymous access.
pub async fn authenticate(
    State(session_store): State<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = AuthHeader::from_headers(request.headers()) else {
        return next.run(request).await;
    };

    match session_store.resolve(token.as_str()).await {
        Ok(Some(claims)) => {
            tracing::trace!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = claims.user_id,
                "request authenticated"
            );
            request.extensions_mut().insert(AuthState(claims));
        }
        Ok(None) => {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                "bearer token did not resolve to a session"
            );
        }
        Err(err) => return Error::from(err).into_response(),
    }

    next.run(request).await
}

/// Rejects requests without claims with
/// `401 {"error": true, "message": "unauthenticated"}`.
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::middleware::{from_fn, from_fn_with_state};
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;
    use crate::service::FailingBackend;

    fn server(session_store: SessionStore) -> anyhow::Result<TestServer> {
        let app = Router::new()
            .route("/private", get(|| async { "private" }))
            .route_layer(from_fn(require_authentication))
            .route("/public", get(|| async { "public" }))
            .layer(from_fn_with_state(session_store, authenticate));
        Ok(TestServer::new(app)?)
    }

    #[tokio::test]
    async fn unreachable_store_fails_closed() -> anyhow::Result<()> {
        let store = SessionStore::new(FailingBackend, Duration::from_secs(60), Duration::from_secs(1));
        let server = server(store)?;

        let response = server
            .get("/public")
            .authorization_bearer("0b3c1f2a-0000-4000-8000-000000000000")
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }

    #[tokio::test]
    async fn non_uuid_token_never_reaches_the_store() -> anyhow::Result<()> {
        let store = SessionStore::new(FailingBackend, Duration::from_secs(60), Duration::from_secs(1));
        let server = server(store)?;

        server
            .get("/public")
            .authorization_bearer("not-a-token")
            .await
            .assert_status_ok();

        let response = server.get("/private").authorization_bearer("not-a-token").await;
        response.assert_status_unauthorized();
        response.assert_json(&serde_json::json!({ "error": true, "message": "unauthenticated" }));
        Ok(())
    }
}
