//! Authentication response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response returned after a successful login.
///
/// Serializes as `{"error": false, "code": 200, "access_token": <uuid>, "message": "success"}`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoginResponse {
    pub error: bool,
    pub code: u16,
    /// Opaque bearer token for the `Authorization` header.
    pub access_token: String,
    pub message: String,
}

impl LoginResponse {
    /// Creates a new [`LoginResponse`] for an issued token.
    pub fn new(access_token: Uuid) -> Self {
        Self {
            error: false,
            code: 200,
            access_token: access_token.to_string(),
            message: "success".to_owned(),
        }
    }
}
