//! Credential repository used by the login flow.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::Auth;
use crate::schema::auth::{self, dsl};
use crate::{PgConnection, PgError, PgResult};

/// Repository for credential lookups.
pub trait AuthRepository {
    /// Finds the credential record for a username.
    fn find_auth_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<Auth>>> + Send;
}

impl AuthRepository for PgConnection {
    async fn find_auth_by_username(&mut self, username: &str) -> PgResult<Option<Auth>> {
        let auth = auth::table
            .filter(dsl::username.eq(username))
            .select(Auth::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(auth)
    }
}
