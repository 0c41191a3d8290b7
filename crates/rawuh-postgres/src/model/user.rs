//! User profile model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::users;

/// User profile. Credentials live in [`Auth`](super::Auth).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Login name, mirrored from the auth record.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// `SYSTEM_ADMIN` or `PROJECT_USER`.
    pub user_type: String,
    /// Project the user is scoped to, `0` for administrators.
    pub project_id: i64,
    /// Event the user is scoped to, `0` when unscoped.
    pub event_id: i64,
    /// Numeric account status.
    pub status: i64,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// User that created this user.
    pub created_by_id: Option<i64>,
    /// Display name of the creator.
    pub created_by_name: Option<String>,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
    /// User that last updated this user.
    pub updated_by_id: Option<i64>,
    /// Display name of the last editor.
    pub updated_by_name: Option<String>,
}

/// Data for creating a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    pub user_type: String,
    pub project_id: i64,
    pub event_id: i64,
    pub status: Option<i64>,
    pub created_by_id: Option<i64>,
    pub created_by_name: Option<String>,
}

/// Data for updating a user.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<String>,
    pub project_id: Option<i64>,
    pub event_id: Option<i64>,
    pub status: Option<i64>,
    pub updated_by_id: Option<i64>,
    pub updated_by_name: Option<String>,
}
