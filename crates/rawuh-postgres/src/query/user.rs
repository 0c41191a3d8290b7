//! User repository.

use std::future::Future;

use diesel::dsl::{exists, now};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use super::{Predicate, mismatched_term, ordered_predicate, text_predicate};
use crate::model::{NewAuth, NewUser, UpdateUser, User};
use crate::schema::{auth, users};
use crate::types::{
    FilterTerm, FilterValue, Page, Pagination, SortOrder, UserFilter, UserFilterColumn, UserSortBy,
    UserSortField,
};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for user profiles and their credentials.
pub trait UserRepository {
    /// Returns whether a credential record with this username exists.
    fn username_exists(&mut self, username: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Creates a user profile and its credential record in one transaction.
    ///
    /// `password` must already be encrypted.
    fn create_user_with_auth(
        &mut self,
        user: NewUser,
        password: String,
    ) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by ID.
    fn find_user(&mut self, user_id: i64) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Updates a user, returning `None` when no row matched.
    ///
    /// A changed `project_id` is mirrored onto the credential record.
    fn update_user(
        &mut self,
        user_id: i64,
        changes: UpdateUser,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Deletes a user and its credential record. Returns whether a row was
    /// deleted.
    fn delete_user(&mut self, user_id: i64) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists all users.
    fn list_users(
        &mut self,
        filter: UserFilter,
        sort_by: Option<UserSortBy>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Page<User>>> + Send;
}

fn user_predicate(term: &FilterTerm<UserFilterColumn>) -> PgResult<Predicate<users::table>> {
    use UserFilterColumn as C;
    use users::dsl;

    let predicate = match (term.column, term.value.clone()) {
        (C::Name, FilterValue::Text(v)) => text_predicate!(users::table, dsl::name, term.op, v),
        (C::Username, FilterValue::Text(v)) => {
            text_predicate!(users::table, dsl::username, term.op, v)
        }
        (C::Email, FilterValue::Text(v)) => text_predicate!(users::table, dsl::email, term.op, v),
        (C::UserType, FilterValue::Text(v)) => {
            text_predicate!(users::table, dsl::user_type, term.op, v)
        }
        (C::ProjectId, FilterValue::Integer(v)) => {
            ordered_predicate!(users::table, dsl::project_id, term.op, v)
        }
        (C::EventId, FilterValue::Integer(v)) => {
            ordered_predicate!(users::table, dsl::event_id, term.op, v)
        }
        (C::Status, FilterValue::Integer(v)) => {
            ordered_predicate!(users::table, dsl::status, term.op, v)
        }
        (C::CreatedAt, FilterValue::Timestamp(v)) => ordered_predicate!(
            users::table,
            dsl::created_at,
            term.op,
            jiff_diesel::Timestamp::from(v)
        ),
        _ => None,
    };

    predicate.ok_or_else(|| mismatched_term(term))
}

fn filtered_users(filter: &UserFilter) -> PgResult<users::BoxedQuery<'static, Pg>> {
    let mut query = users::table.into_boxed();

    for term in filter.terms() {
        query = query.filter(user_predicate(term)?);
    }

    Ok(query)
}

/// Orders by the requested column, or the primary key, then applies paging.
fn sorted_users(
    query: users::BoxedQuery<'static, Pg>,
    sort_by: Option<UserSortBy>,
    pagination: Pagination,
) -> users::BoxedQuery<'static, Pg> {
    use users::dsl;

    let mut query = match sort_by.map(|s| (s.field, s.order)) {
        None => query.order(dsl::user_id.asc()),
        Some((UserSortField::CreatedAt, SortOrder::Asc)) => query.order(dsl::created_at.asc()),
        Some((UserSortField::CreatedAt, SortOrder::Desc)) => {
            query.order(dsl::created_at.desc())
        }
        Some((UserSortField::Name, SortOrder::Asc)) => query.order(dsl::name.asc()),
        Some((UserSortField::Name, SortOrder::Desc)) => query.order(dsl::name.desc()),
        Some((UserSortField::Username, SortOrder::Asc)) => query.order(dsl::username.asc()),
        Some((UserSortField::Username, SortOrder::Desc)) => query.order(dsl::username.desc()),
        Some((UserSortField::UserType, SortOrder::Asc)) => query.order(dsl::user_type.asc()),
        Some((UserSortField::UserType, SortOrder::Desc)) => {
            query.order(dsl::user_type.desc())
        }
        Some((UserSortField::Email, SortOrder::Asc)) => query.order(dsl::email.asc()),
        Some((UserSortField::Email, SortOrder::Desc)) => query.order(dsl::email.desc()),
    };

    if !pagination.is_unbounded() {
        query = query.limit(pagination.limit).offset(pagination.offset());
    }

    query
}

impl UserRepository for PgConnection {
    async fn username_exists(&mut self, username: &str) -> PgResult<bool> {
        let found = diesel::select(exists(
            auth::table.filter(auth::username.eq(username)),
        ))
        .get_result(self)
        .await
        .map_err(PgError::from)?;

        Ok(found)
    }

    async fn create_user_with_auth(&mut self, user: NewUser, password: String) -> PgResult<User> {
        self.build_transaction()
            .run(|conn| {
                async move {
                    let user = diesel::insert_into(users::table)
                        .values(&user)
                        .returning(User::as_returning())
                        .get_result(conn)
                        .await?;

                    let credentials = NewAuth {
                        user_id: user.user_id,
                        username: user.username.clone(),
                        password,
                        project_id: user.project_id,
                    };

                    diesel::insert_into(auth::table)
                        .values(&credentials)
                        .execute(conn)
                        .await?;

                    Ok::<User, PgError>(user)
                }
                .scope_boxed()
            })
            .await
    }

    async fn find_user(&mut self, user_id: i64) -> PgResult<Option<User>> {
        let user = users::table
            .filter(users::user_id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(user)
    }

    async fn update_user(&mut self, user_id: i64, changes: UpdateUser) -> PgResult<Option<User>> {
        self.build_transaction()
            .run(|conn| {
                async move {
                    let user = diesel::update(users::table)
                        .filter(users::user_id.eq(user_id))
                        .set((&changes, users::updated_at.eq(now)))
                        .returning(User::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;

                    if let Some(user) = user.as_ref().filter(|_| changes.project_id.is_some()) {
                        diesel::update(auth::table)
                            .filter(auth::user_id.eq(user.user_id))
                            .set((
                                auth::project_id.eq(user.project_id),
                                auth::updated_at.eq(now),
                            ))
                            .execute(conn)
                            .await?;
                    }

                    Ok::<Option<User>, PgError>(user)
                }
                .scope_boxed()
            })
            .await
    }

    async fn delete_user(&mut self, user_id: i64) -> PgResult<bool> {
        let deleted = diesel::delete(users::table)
            .filter(users::user_id.eq(user_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn list_users(
        &mut self,
        filter: UserFilter,
        sort_by: Option<UserSortBy>,
        pagination: Pagination,
    ) -> PgResult<Page<User>> {
        let total_rows = filtered_users(&filter)?
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        let query = filtered_users(&filter)?;
        let items = sorted_users(query, sort_by, pagination)
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            total_rows,
            returned = items.len(),
            "listed users"
        );

        Ok(Page::new(items, total_rows, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::render;

    #[test]
    fn filter_terms_become_bound_predicates() {
        let filter = UserFilter::parse("project_id = 7 AND username LIKE 'adm%'").unwrap();
        let query = filtered_users(&filter).unwrap();
        let sort_by = Some(UserSortBy::desc(UserSortField::UserType));
        let (sql, binds) = render(&sorted_users(query, sort_by, Pagination::UNBOUNDED));

        assert!(sql.contains(r#""users"."project_id" = $1"#));
        assert!(sql.contains(r#""users"."username" LIKE $2"#));
        assert!(sql.contains(r#"ORDER BY "users"."user_type" DESC"#));
        assert!(!sql.contains("adm%"));
        assert!(!sql.contains("LIMIT"));
        assert_eq!(binds, r#"[7, "adm%"]"#);
    }
}
