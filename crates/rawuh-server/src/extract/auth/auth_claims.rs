//! Identity claims carried by a session.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
///
/// Unknown values survive a round trip through the session store as
/// [`UserType::Unrecognized`] so they can be denied explicitly instead of
/// failing to decode or falling back to a default role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    /// Cross-tenant administrator.
    SystemAdmin,
    /// User confined to one project (and, for guests, one event).
    ProjectUser,
    /// Any other stored value.
    Unrecognized(String),
}

impl UserType {
    /// Wire value of [`UserType::SystemAdmin`].
    pub const SYSTEM_ADMIN: &'static str = "SYSTEM_ADMIN";
    /// Wire value of [`UserType::ProjectUser`].
    pub const PROJECT_USER: &'static str = "PROJECT_USER";

    /// Returns the wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SystemAdmin => Self::SYSTEM_ADMIN,
            Self::ProjectUser => Self::PROJECT_USER,
            Self::Unrecognized(value) => value,
        }
    }

    /// Returns whether `value` names a known role.
    pub fn is_known(value: &str) -> bool {
        matches!(value, Self::SYSTEM_ADMIN | Self::PROJECT_USER)
    }
}

impl Default for UserType {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<String> for UserType {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::SYSTEM_ADMIN => Self::SystemAdmin,
            Self::PROJECT_USER => Self::ProjectUser,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for UserType {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<UserType> for String {
    fn from(value: UserType) -> Self {
        match value {
            UserType::Unrecognized(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and tenant scope of an authenticated caller.
///
/// Assembled at login from the `auth` and `users` rows, stored in the
/// session store, and decoded again on every authenticated request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AuthClaims {
    /// Login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// User identifier.
    pub user_id: i64,
    /// Project the user belongs to.
    pub project_id: i64,
    /// Event the user belongs to.
    pub event_id: i64,
    /// Role of the user.
    #[serde(rename = "usertype")]
    #[schemars(with = "String")]
    pub user_type: UserType,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn claims_wire_names() {
        let claims = AuthClaims {
            username: "ann".into(),
            name: "Ann".into(),
            user_id: 11,
            project_id: 7,
            event_id: 3,
            user_type: UserType::ProjectUser,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            json!({
                "username": "ann",
                "name": "Ann",
                "user_id": 11,
                "project_id": 7,
                "event_id": 3,
                "usertype": "PROJECT_USER",
            })
        );

        let decoded: AuthClaims = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn unknown_user_type_is_kept() {
        let claims: AuthClaims = serde_json::from_value(json!({ "usertype": "GUEST" })).unwrap();
        assert_eq!(claims.user_type, UserType::Unrecognized("GUEST".into()));
        assert_eq!(claims.user_type.as_str(), "GUEST");
    }

    #[test]
    fn missing_user_type_is_unrecognized() {
        let claims: AuthClaims = serde_json::from_value(json!({ "username": "x" })).unwrap();
        assert_eq!(claims.user_type, UserType::Unrecognized(String::new()));
    }

    #[test]
    fn known_user_types() {
        assert!(UserType::is_known("SYSTEM_ADMIN"));
        assert!(UserType::is_known("PROJECT_USER"));
        assert!(!UserType::is_known("system_admin"));
        assert_eq!(UserType::from("SYSTEM_ADMIN"), UserType::SystemAdmin);
    }
}
