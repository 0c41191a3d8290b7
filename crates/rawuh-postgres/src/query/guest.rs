//! Guest repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::{Predicate, mismatched_term, ordered_predicate, text_predicate};
use crate::model::{Guest, NewGuest, UpdateGuest};
use crate::schema::guests::{self, dsl};
use crate::types::{
    FilterTerm, FilterValue, GuestFilter, GuestFilterColumn, GuestSortBy, GuestSortField, Page,
    Pagination, SortOrder,
};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for guest database operations.
///
/// Guests are always addressed through their project and event.
pub trait GuestRepository {
    /// Creates a new guest.
    fn create_guest(&mut self, guest: NewGuest) -> impl Future<Output = PgResult<Guest>> + Send;

    /// Finds a guest of an event.
    fn find_guest(
        &mut self,
        project_id: i64,
        event_id: i64,
        guest_id: i64,
    ) -> impl Future<Output = PgResult<Option<Guest>>> + Send;

    /// Updates a guest, returning `None` when no row matched.
    fn update_guest(
        &mut self,
        project_id: i64,
        event_id: i64,
        guest_id: i64,
        changes: UpdateGuest,
    ) -> impl Future<Output = PgResult<Option<Guest>>> + Send;

    /// Deletes a guest. Returns whether a row was deleted.
    fn delete_guest(
        &mut self,
        project_id: i64,
        event_id: i64,
        guest_id: i64,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists the guests of an event.
    fn list_guests(
        &mut self,
        project_id: i64,
        event_id: i64,
        filter: GuestFilter,
        sort_by: Option<GuestSortBy>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Page<Guest>>> + Send;
}

fn guest_predicate(term: &FilterTerm<GuestFilterColumn>) -> PgResult<Predicate<guests::table>> {
    use GuestFilterColumn as C;

    let predicate = match (term.column, term.value.clone()) {
        (C::Name, FilterValue::Text(v)) => text_predicate!(guests::table, dsl::name, term.op, v),
        (C::Address, FilterValue::Text(v)) => {
            text_predicate!(guests::table, dsl::address, term.op, v)
        }
        (C::Phone, FilterValue::Text(v)) => text_predicate!(guests::table, dsl::phone, term.op, v),
        (C::Email, FilterValue::Text(v)) => text_predicate!(guests::table, dsl::email, term.op, v),
        (C::CreatedAt, FilterValue::Timestamp(v)) => ordered_predicate!(
            guests::table,
            dsl::created_at,
            term.op,
            jiff_diesel::Timestamp::from(v)
        ),
        _ => None,
    };

    predicate.ok_or_else(|| mismatched_term(term))
}

fn filtered_guests(
    project_id: i64,
    event_id: i64,
    filter: &GuestFilter,
) -> PgResult<guests::BoxedQuery<'static, Pg>> {
    let mut query = guests::table
        .filter(dsl::project_id.eq(project_id))
        .filter(dsl::event_id.eq(event_id))
        .into_boxed();

    for term in filter.terms() {
        query = query.filter(guest_predicate(term)?);
    }

    Ok(query)
}

/// Orders by the requested column, or the primary key, then applies paging.
fn sorted_guests(
    query: guests::BoxedQuery<'static, Pg>,
    sort_by: Option<GuestSortBy>,
    pagination: Pagination,
) -> guests::BoxedQuery<'static, Pg> {
    let mut query = match sort_by.map(|s| (s.field, s.order)) {
        None => query.order(dsl::guest_id.asc()),
        Some((GuestSortField::CreatedAt, SortOrder::Asc)) => query.order(dsl::created_at.asc()),
        Some((GuestSortField::CreatedAt, SortOrder::Desc)) => {
            query.order(dsl::created_at.desc())
        }
        Some((GuestSortField::Name, SortOrder::Asc)) => query.order(dsl::name.asc()),
        Some((GuestSortField::Name, SortOrder::Desc)) => query.order(dsl::name.desc()),
        Some((GuestSortField::Address, SortOrder::Asc)) => query.order(dsl::address.asc()),
        Some((GuestSortField::Address, SortOrder::Desc)) => query.order(dsl::address.desc()),
        Some((GuestSortField::Phone, SortOrder::Asc)) => query.order(dsl::phone.asc()),
        Some((GuestSortField::Phone, SortOrder::Desc)) => query.order(dsl::phone.desc()),
        Some((GuestSortField::Email, SortOrder::Asc)) => query.order(dsl::email.asc()),
        Some((GuestSortField::Email, SortOrder::Desc)) => query.order(dsl::email.desc()),
    };

    if !pagination.is_unbounded() {
        query = query.limit(pagination.limit).offset(pagination.offset());
    }

    query
}

impl GuestRepository for PgConnection {
    async fn create_guest(&mut self, guest: NewGuest) -> PgResult<Guest> {
        let guest = diesel::insert_into(guests::table)
            .values(&guest)
            .returning(Guest::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(guest)
    }

    async fn find_guest(
        &mut self,
        project_id: i64,
        event_id: i64,
        guest_id: i64,
    ) -> PgResult<Option<Guest>> {
        let guest = guests::table
            .filter(dsl::project_id.eq(project_id))
            .filter(dsl::event_id.eq(event_id))
            .filter(dsl::guest_id.eq(guest_id))
            .select(Guest::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(guest)
    }

    async fn update_guest(
        &mut self,
        project_id: i64,
        event_id: i64,
        guest_id: i64,
        changes: UpdateGuest,
    ) -> PgResult<Option<Guest>> {
        let guest = diesel::update(guests::table)
            .filter(dsl::project_id.eq(project_id))
            .filter(dsl::event_id.eq(event_id))
            .filter(dsl::guest_id.eq(guest_id))
            .set((&changes, dsl::updated_at.eq(now)))
            .returning(Guest::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(guest)
    }

    async fn delete_guest(&mut self, project_id: i64, event_id: i64, guest_id: i64) -> PgResult<bool> {
        let deleted = diesel::delete(guests::table)
            .filter(dsl::project_id.eq(project_id))
            .filter(dsl::event_id.eq(event_id))
            .filter(dsl::guest_id.eq(guest_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn list_guests(
        &mut self,
        project_id: i64,
        event_id: i64,
        filter: GuestFilter,
        sort_by: Option<GuestSortBy>,
        pagination: Pagination,
    ) -> PgResult<Page<Guest>> {
        let total_rows = filtered_guests(project_id, event_id, &filter)?
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        let query = filtered_guests(project_id, event_id, &filter)?;
        let items = sorted_guests(query, sort_by, pagination)
            .select(Guest::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            project_id,
            event_id,
            total_rows,
            returned = items.len(),
            "listed guests"
        );

        Ok(Page::new(items, total_rows, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::render;

    #[test]
    fn list_is_scoped_to_project_and_event() {
        let query = filtered_guests(7, 9, &GuestFilter::default()).unwrap();
        let (sql, binds) = render(&sorted_guests(query, None, Pagination::UNBOUNDED));

        assert!(sql.contains(r#""guests"."project_id" = $1"#));
        assert!(sql.contains(r#""guests"."event_id" = $2"#));
        assert!(sql.contains(r#"ORDER BY "guests"."guest_id" ASC"#));
        assert_eq!(binds, "[7, 9]");
    }

    #[test]
    fn unbounded_list_has_no_limit() {
        let query = filtered_guests(7, 9, &GuestFilter::default()).unwrap();
        let (sql, _) = render(&sorted_guests(query, None, Pagination::UNBOUNDED));

        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
    }

    #[test]
    fn bounded_list_is_paged() {
        let query = filtered_guests(7, 9, &GuestFilter::default()).unwrap();
        let pagination = Pagination::normalize(3, 20);
        let (sql, binds) = render(&sorted_guests(query, None, pagination));

        assert!(sql.contains("LIMIT $3"));
        assert!(sql.contains("OFFSET $4"));
        assert_eq!(binds, "[7, 9, 20, 40]");
    }

    #[test]
    fn filter_text_is_bound_not_inlined() {
        let filter = GuestFilter::parse("name = 'x'' OR 1=1 --' AND email ILIKE '%@x.io'").unwrap();
        let query = filtered_guests(7, 9, &filter).unwrap();
        let sort_by = Some(GuestSortBy::desc(GuestSortField::Email));
        let (sql, binds) = render(&sorted_guests(query, sort_by, Pagination::UNBOUNDED));

        assert!(sql.contains(r#""guests"."name" = $3"#));
        assert!(sql.contains(r#""guests"."email" ILIKE $4"#));
        assert!(sql.contains(r#"ORDER BY "guests"."email" DESC"#));
        assert!(!sql.contains("OR 1=1"));
        assert!(!sql.contains("@x.io"));
        assert!(binds.contains("x' OR 1=1 --"));
        assert!(binds.contains("%@x.io"));
    }
}
