//! Login credential model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::auth;

/// Credential record of a user.
///
/// `password` holds ciphertext; decrypting and comparing it is the caller's
/// job.
#[derive(Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = auth)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Auth {
    /// Owning user.
    pub user_id: i64,
    /// Unique login name.
    pub username: String,
    /// Encrypted password.
    pub password: String,
    /// Project the user is scoped to.
    pub project_id: i64,
    /// Timestamp when the record was created.
    pub created_at: Timestamp,
    /// Timestamp when the record was last updated.
    pub updated_at: Timestamp,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

/// Data for creating a credential record.
#[derive(Clone, Insertable)]
#[diesel(table_name = auth)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAuth {
    pub user_id: i64,
    pub username: String,
    pub password: String,
    pub project_id: i64,
}
