//! User response types.

use jiff::Timestamp;
use rawuh_postgres::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// User response. Credentials are never part of it.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct User {
    /// ID of the user.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// `SYSTEM_ADMIN` or `PROJECT_USER`.
    pub user_type: String,
    /// Project the user is scoped to.
    pub project_id: i64,
    /// Event the user is scoped to.
    pub event_id: i64,
    /// Numeric account status.
    pub status: i64,
    pub created_by_id: Option<i64>,
    pub created_by_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub updated_by_id: Option<i64>,
    pub updated_by_name: Option<String>,
}

impl User {
    /// Creates a new instance of [`User`] from the database model.
    pub fn from_model(user: model::User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            username: user.username,
            email: user.email,
            user_type: user.user_type,
            project_id: user.project_id,
            event_id: user.event_id,
            status: user.status,
            created_by_id: user.created_by_id,
            created_by_name: user.created_by_name,
            created_at: user.created_at.into(),
            updated_at: user.updated_at.into(),
            updated_by_id: user.updated_by_id,
            updated_by_name: user.updated_by_name,
        }
    }
}

impl From<model::User> for User {
    #[inline]
    fn from(user: model::User) -> Self {
        Self::from_model(user)
    }
}
