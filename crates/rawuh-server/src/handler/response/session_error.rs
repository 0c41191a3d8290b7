use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

/// Error body of the session surface: the access gate, `/auth/me` and
/// bearer header parsing.
///
/// Serializes as `{"error": true, "message": <message>}`. Resource handlers
/// use [`ErrorResponse`](super::ErrorResponse) instead.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SessionErrorResponse {
    /// Always `true`.
    pub error: bool,
    /// Message safe for client display.
    pub message: Cow<'static, str>,

    /// HTTP status code (not serialized).
    #[serde(skip)]
    pub status: StatusCode,
}

impl SessionErrorResponse {
    pub const UNAUTHENTICATED: Self = Self::new("unauthenticated", StatusCode::UNAUTHORIZED);
    pub const MISSING_BEARER_TOKEN: Self =
        Self::new("missing bearer token", StatusCode::UNAUTHORIZED);
    pub const INVALID_TOKEN: Self = Self::new("invalid token", StatusCode::UNAUTHORIZED);
    pub const TOKEN_NOT_FOUND: Self = Self::new("token not found", StatusCode::NOT_FOUND);
    pub const STORE_UNAVAILABLE: Self = Self::new(
        "session store unavailable",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new session error body.
    #[inline]
    pub const fn new(message: &'static str, status: StatusCode) -> Self {
        Self {
            error: true,
            message: Cow::Borrowed(message),
            status,
        }
    }
}

impl IntoResponse for SessionErrorResponse {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl aide::OperationOutput for SessionErrorResponse {
    type Inner = Self;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unauthenticated_body_is_exact() {
        let body = serde_json::to_value(SessionErrorResponse::UNAUTHENTICATED).unwrap();
        assert_eq!(body, json!({ "error": true, "message": "unauthenticated" }));
    }

    #[test]
    fn token_not_found_is_404() {
        let response = SessionErrorResponse::TOKEN_NOT_FOUND.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
