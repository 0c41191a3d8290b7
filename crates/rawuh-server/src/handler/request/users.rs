//! User request types.

use rawuh_postgres::model::{NewUser, UpdateUser as UpdateUserModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::{name_format, user_type_name, username_format};
use crate::extract::AuthClaims;
use crate::handler::Result;
use crate::service::ServiceLimits;

/// Request payload for creating a user and its login.
#[must_use]
#[derive(Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CreateUser {
    /// Display name.
    #[validate(custom(function = "name_format"))]
    pub name: String,
    /// Unique login name.
    #[validate(length(max = 64))]
    #[validate(custom(function = "username_format"))]
    pub username: String,
    /// Plaintext password, encrypted before storage.
    #[validate(length(min = 8, max = 256))]
    pub password: String,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
    /// `SYSTEM_ADMIN` or `PROJECT_USER`.
    #[validate(custom(function = "user_type_name"))]
    pub user_type: String,
    /// Project the user is scoped to, `0` for none.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub project_id: i64,
    /// Event the user is scoped to, `0` for none.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub event_id: i64,
    /// Numeric account status.
    pub status: Option<i64>,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("username", &self.username)
            .field("user_type", &self.user_type)
            .field("project_id", &self.project_id)
            .field("event_id", &self.event_id)
            .finish_non_exhaustive()
    }
}

impl CreateUser {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        limits.check_name("name", &self.name)
    }

    /// Splits this request into the user model and the plaintext password.
    pub fn into_model(self, creator: &AuthClaims) -> (NewUser, String) {
        let user = NewUser {
            name: self.name.trim().to_owned(),
            username: self.username,
            email: self.email,
            user_type: self.user_type,
            project_id: self.project_id,
            event_id: self.event_id,
            status: self.status,
            created_by_id: Some(creator.user_id),
            created_by_name: Some(creator.name.clone()),
        };
        (user, self.password)
    }
}

/// Request payload to update a user.
///
/// The login name and the password cannot be changed here.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct UpdateUser {
    #[validate(custom(function = "name_format"))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "user_type_name"))]
    pub user_type: Option<String>,
    #[validate(range(min = 0))]
    pub project_id: Option<i64>,
    #[validate(range(min = 0))]
    pub event_id: Option<i64>,
    pub status: Option<i64>,
}

impl UpdateUser {
    /// Checks the configurable length limits.
    pub fn check_limits(&self, limits: &ServiceLimits) -> Result<()> {
        match &self.name {
            Some(name) => limits.check_name("name", name),
            None => Ok(()),
        }
    }

    pub fn into_model(self, editor: &AuthClaims) -> UpdateUserModel {
        UpdateUserModel {
            name: self.name.map(|name| name.trim().to_owned()),
            email: self.email,
            user_type: self.user_type,
            project_id: self.project_id,
            event_id: self.event_id,
            status: self.status,
            updated_by_id: Some(editor.user_id),
            updated_by_name: Some(editor.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user() -> CreateUser {
        CreateUser {
            name: "Dewi Sartika".into(),
            username: "dewi".into(),
            password: "correct horse".into(),
            email: Some("dewi@example.com".into()),
            user_type: "PROJECT_USER".into(),
            project_id: 7,
            event_id: 3,
            status: None,
        }
    }

    #[test]
    fn valid_request() {
        assert!(create_user().validate().is_ok());
    }

    #[test]
    fn unknown_user_type_is_rejected() {
        let request = CreateUser {
            user_type: "OWNER".into(),
            ..create_user()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_checks_user_type() {
        let valid = UpdateUser {
            user_type: Some("SYSTEM_ADMIN".into()),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let invalid = UpdateUser {
            user_type: Some("OWNER".into()),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        assert!(UpdateUser::default().validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let request = CreateUser {
            password: "pw".into(),
            ..create_user()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn debug_hides_password() {
        let debug = format!("{:?}", create_user());
        assert!(!debug.contains("correct horse"));
    }

    #[test]
    fn model_keeps_password_apart() {
        let creator = AuthClaims {
            user_id: 1,
            name: "Root".into(),
            ..Default::default()
        };
        let (user, password) = create_user().into_model(&creator);

        assert_eq!(user.username, "dewi");
        assert_eq!(user.created_by_id, Some(1));
        assert_eq!(password, "correct horse");
    }
}
