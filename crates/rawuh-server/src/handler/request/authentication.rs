//! Authentication request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// JSON login body, used when no Basic credentials are sent.
#[derive(Default, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoginRequest {
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
