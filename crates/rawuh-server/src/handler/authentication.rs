//! Login, session introspection and logout.
//!
//! A successful login stores the caller's claims in the session store under
//! a fresh random token. Unknown users and wrong passwords get the same
//! response, and both paths run a decrypt so they take comparable time.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use rawuh_postgres::query::{AuthRepository, UserRepository};
use serde_json::Value;

use crate::extract::{
    AuthClaims, AuthHeader, AuthState, BearerToken, Credentials, Database, Json, UserType,
};
use crate::handler::response::{ApiResponse, ErrorResponse, LoginResponse, SessionErrorResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{PasswordCipher, ServiceState, SessionStore, constant_time_eq};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "rawuh_server::handler::authentication";

/// Well-formed ciphertext that never authenticates, decrypted when the
/// username is unknown.
const DUMMY_SECRET: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA==";

fn invalid_credentials() -> Error<'static> {
    ErrorKind::Unauthorized.with_message("invalid credentials")
}

/// Exchanges credentials for a session token.
#[tracing::instrument(skip_all, fields(username = %credentials.username))]
async fn login(
    State(password_cipher): State<PasswordCipher>,
    State(session_store): State<SessionStore>,
    database: Database,
    credentials: Credentials,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    if credentials.is_incomplete() {
        return Err(ErrorKind::BadRequest.with_message("username or password empty"));
    }

    let mut conn = database.connection().await?;
    let auth = database
        .call(conn.find_auth_by_username(&credentials.username))
        .await?;

    let Some(auth) = auth else {
        let _ = password_cipher.decrypt(DUMMY_SECRET);
        tracing::warn!(target: TRACING_TARGET, "Login failed: unknown username");
        return Err(invalid_credentials());
    };

    let stored = password_cipher.decrypt(&auth.password).map_err(|err| {
        ErrorKind::InternalServerError
            .with_message("stored password could not be decrypted")
            .with_context(err.to_string())
    })?;

    if !constant_time_eq(&stored, credentials.password.as_bytes()) {
        tracing::warn!(
            target: TRACING_TARGET,
            user_id = auth.user_id,
            "Login failed: wrong password"
        );
        return Err(invalid_credentials());
    }

    let Some(user) = database.call(conn.find_user(auth.user_id)).await? else {
        tracing::warn!(
            target: TRACING_TARGET,
            user_id = auth.user_id,
            "Login failed: credentials without a user profile"
        );
        return Err(invalid_credentials());
    };

    let claims = AuthClaims {
        username: auth.username,
        name: user.name,
        user_id: auth.user_id,
        project_id: auth.project_id,
        event_id: user.event_id,
        user_type: UserType::from(user.user_type),
    };
    let token = session_store.issue(&claims).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = claims.user_id,
        user_type = %claims.user_type,
        "Login succeeded"
    );

    Ok((StatusCode::OK, Json(LoginResponse::new(token))))
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Log in")
        .description(
            "Accepts HTTP Basic credentials or a JSON body and returns an opaque bearer token \
             valid for the configured session lifetime.",
        )
        .response::<200, Json<LoginResponse>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns the claims stored for the presented bearer token.
#[tracing::instrument(skip_all)]
async fn current_session(
    State(session_store): State<SessionStore>,
    BearerToken(token): BearerToken,
) -> Result<(StatusCode, Json<Value>), SessionErrorResponse> {
    let claims = session_store.lookup(token.as_str()).await.map_err(|err| {
        tracing::error!(target: TRACING_TARGET, error = %err, "Session lookup failed");
        SessionErrorResponse::STORE_UNAVAILABLE
    })?;

    let Some(claims) = claims else {
        tracing::debug!(target: TRACING_TARGET, "Session not found");
        return Err(SessionErrorResponse::TOKEN_NOT_FOUND);
    };

    Ok((StatusCode::OK, Json(claims)))
}

fn current_session_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Current session")
        .description("Returns the claims of the session the `Bearer` token belongs to.")
        .response::<200, Json<AuthClaims>>()
        .response::<401, Json<SessionErrorResponse>>()
        .response::<404, Json<SessionErrorResponse>>()
}

/// Revokes the caller's own token.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn logout(
    State(session_store): State<SessionStore>,
    auth_state: AuthState,
    token: AuthHeader,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    session_store.revoke(token.as_str()).await?;

    tracing::info!(target: TRACING_TARGET, user_id = auth_state.user_id, "Logged out");

    Ok((StatusCode::OK, Json(ApiResponse::empty())))
}

fn logout_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Log out")
        .description("Deletes the session of the presented token. Other sessions stay valid.")
        .response::<200, Json<ApiResponse<()>>>()
        .response::<401, Json<SessionErrorResponse>>()
}

/// Routes that need an authenticated caller.
pub fn private_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/auth/logout", post_with(logout, logout_docs))
        .with_path_items(|item| item.tag("Authentication"))
}

/// Routes open to anonymous callers.
pub fn public_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/login", post_with(login, login_docs))
        .api_route("/auth/me", get_with(current_session, current_session_docs))
        .with_path_items(|item| item.tag("Authentication"))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use axum::http::header::AUTHORIZATION;
    use serde_json::json;

    use crate::handler::test::{TestContext, create_test_server};

    #[tokio::test]
    async fn login_rejects_empty_fields() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server
            .post("/login")
            .json(&json!({ "username": "ann", "password": "" }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "Error": true,
            "Code": 400,
            "Message": "username or password empty",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn me_requires_bearer_prefix() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/auth/me").await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": true, "message": "missing bearer token" }));

        let response = server
            .get("/auth/me")
            .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer   "))
            .await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": true, "message": "invalid token" }));
        Ok(())
    }

    #[tokio::test]
    async fn me_returns_raw_claims() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server
            .get("/auth/me")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "username": "ann",
            "name": "Ann",
            "user_id": 11,
            "project_id": 7,
            "event_id": 3,
            "usertype": "PROJECT_USER",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn expired_session_is_not_found() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        context.clock.advance(context.session_ttl + std::time::Duration::from_secs(1));

        let response = server
            .get("/auth/me")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?)
            .await;
        response.assert_status_not_found();
        response.assert_json(&json!({ "error": true, "message": "token not found" }));
        Ok(())
    }

    #[tokio::test]
    async fn logout_revokes_only_own_token() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let first = context.sign_in(TestContext::project_user(7, 3)).await?;
        let second = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server
            .post("/auth/logout")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {first}"))?)
            .await;
        response.assert_status_ok();

        let revoked = server
            .get("/auth/me")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {first}"))?)
            .await;
        revoked.assert_status_not_found();

        let kept = server
            .get("/auth/me")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {second}"))?)
            .await;
        kept.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn logout_requires_session() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.post("/auth/logout").await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": true, "message": "unauthenticated" }));
        Ok(())
    }
}
