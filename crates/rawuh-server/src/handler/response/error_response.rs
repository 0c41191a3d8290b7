use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::{Serialize, Serializer};

/// Error body returned by every failing handler.
///
/// Serializes as `{"Error": true, "Code": <status>, "Message": <message>}`
/// and is always sent with the HTTP status equal to `Code`.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ErrorResponse {
    /// Always `true`.
    #[serde(rename = "Error")]
    pub error: bool,
    /// HTTP status code of the response.
    #[serde(rename = "Code", serialize_with = "serialize_status")]
    #[schemars(with = "u16")]
    pub status: StatusCode,
    /// Message safe for client display.
    #[serde(rename = "Message")]
    pub message: Cow<'static, str>,

    /// Error name used in logs.
    #[serde(skip)]
    pub name: &'static str,
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

impl ErrorResponse {
    pub const BAD_REQUEST: Self =
        Self::new("invalid_argument", "Invalid Argument", StatusCode::BAD_REQUEST);
    pub const CONFLICT: Self = Self::new("already_exists", "Already Exists", StatusCode::CONFLICT);
    pub const FORBIDDEN: Self =
        Self::new("permission_denied", "Permission Denied", StatusCode::FORBIDDEN);
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal",
        "Internal Server Error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self = Self::new("not_found", "Not Found", StatusCode::NOT_FOUND);
    pub const UNAUTHORIZED: Self =
        Self::new("unauthenticated", "Unauthenticated", StatusCode::UNAUTHORIZED);

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'static str, message: &'static str, status: StatusCode) -> Self {
        Self {
            error: true,
            status,
            message: Cow::Borrowed(message),
            name,
        }
    }

    /// Replaces the default message.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Default for ErrorResponse {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_mirrors_status() {
        let responses = [
            ErrorResponse::BAD_REQUEST,
            ErrorResponse::UNAUTHORIZED,
            ErrorResponse::FORBIDDEN,
            ErrorResponse::NOT_FOUND,
            ErrorResponse::CONFLICT,
            ErrorResponse::INTERNAL_SERVER_ERROR,
        ];

        for response in responses {
            let body = serde_json::to_value(&response).unwrap();
            assert_eq!(body["Code"], response.status.as_u16());
        }
    }

    #[test]
    fn serialized_shape() {
        let body = serde_json::to_value(ErrorResponse::FORBIDDEN).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "Error": true, "Code": 403, "Message": "Permission Denied" })
        );
    }

    #[test]
    fn custom_message_replaces_default() {
        let response = ErrorResponse::NOT_FOUND.with_message("event not found");
        assert_eq!(response.message, "event not found");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
