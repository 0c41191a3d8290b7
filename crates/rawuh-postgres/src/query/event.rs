//! Event repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::Timestamp;

use super::{Predicate, mismatched_term, ordered_predicate, text_predicate};
use crate::model::{Event, NewEvent, UpdateEvent};
use crate::schema::events::{self, dsl};
use crate::types::{
    EventFilter, EventFilterColumn, EventSortBy, EventSortField, FilterTerm, FilterValue, Page,
    Pagination, SortOrder,
};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for event database operations.
///
/// Every lookup is keyed by both the project and the event, so an event is
/// never reachable through a project it does not belong to.
pub trait EventRepository {
    /// Creates a new event.
    fn create_event(&mut self, event: NewEvent) -> impl Future<Output = PgResult<Event>> + Send;

    /// Finds an event of a project.
    fn find_event(
        &mut self,
        project_id: i64,
        event_id: i64,
    ) -> impl Future<Output = PgResult<Option<Event>>> + Send;

    /// Updates an event, returning `None` when no row matched.
    fn update_event(
        &mut self,
        project_id: i64,
        event_id: i64,
        changes: UpdateEvent,
    ) -> impl Future<Output = PgResult<Option<Event>>> + Send;

    /// Deletes an event and its guests. Returns whether a row was deleted.
    fn delete_event(
        &mut self,
        project_id: i64,
        event_id: i64,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists the events of a project.
    fn list_events(
        &mut self,
        project_id: i64,
        filter: EventFilter,
        sort_by: Option<EventSortBy>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Page<Event>>> + Send;
}

fn event_predicate(term: &FilterTerm<EventFilterColumn>) -> PgResult<Predicate<events::table>> {
    use EventFilterColumn as C;

    let predicate = match (term.column, term.value.clone()) {
        (C::EventName, FilterValue::Text(v)) => {
            text_predicate!(events::table, dsl::event_name, term.op, v)
        }
        (C::Description, FilterValue::Text(v)) => {
            text_predicate!(events::table, dsl::description, term.op, v)
        }
        (C::StartDate, FilterValue::Timestamp(v)) => ordered_predicate!(
            events::table,
            dsl::start_date.assume_not_null(),
            term.op,
            Timestamp::from(v)
        ),
        (C::EndDate, FilterValue::Timestamp(v)) => ordered_predicate!(
            events::table,
            dsl::end_date.assume_not_null(),
            term.op,
            Timestamp::from(v)
        ),
        (C::CreatedAt, FilterValue::Timestamp(v)) => ordered_predicate!(
            events::table,
            dsl::created_at,
            term.op,
            Timestamp::from(v)
        ),
        (C::UpdatedAt, FilterValue::Timestamp(v)) => ordered_predicate!(
            events::table,
            dsl::updated_at,
            term.op,
            Timestamp::from(v)
        ),
        _ => None,
    };

    predicate.ok_or_else(|| mismatched_term(term))
}

fn filtered_events(
    project_id: i64,
    filter: &EventFilter,
) -> PgResult<events::BoxedQuery<'static, Pg>> {
    let mut query = events::table
        .filter(dsl::project_id.eq(project_id))
        .into_boxed();

    for term in filter.terms() {
        query = query.filter(event_predicate(term)?);
    }

    Ok(query)
}

/// Orders by the requested column, or the primary key, then applies paging.
fn sorted_events(
    query: events::BoxedQuery<'static, Pg>,
    sort_by: Option<EventSortBy>,
    pagination: Pagination,
) -> events::BoxedQuery<'static, Pg> {
    let mut query = match sort_by.map(|s| (s.field, s.order)) {
        None => query.order(dsl::event_id.asc()),
        Some((EventSortField::EventName, SortOrder::Asc)) => query.order(dsl::event_name.asc()),
        Some((EventSortField::EventName, SortOrder::Desc)) => {
            query.order(dsl::event_name.desc())
        }
        Some((EventSortField::EventId, SortOrder::Asc)) => query.order(dsl::event_id.asc()),
        Some((EventSortField::EventId, SortOrder::Desc)) => query.order(dsl::event_id.desc()),
        Some((EventSortField::CreatedAt, SortOrder::Asc)) => query.order(dsl::created_at.asc()),
        Some((EventSortField::CreatedAt, SortOrder::Desc)) => {
            query.order(dsl::created_at.desc())
        }
        Some((EventSortField::UpdatedAt, SortOrder::Asc)) => query.order(dsl::updated_at.asc()),
        Some((EventSortField::UpdatedAt, SortOrder::Desc)) => {
            query.order(dsl::updated_at.desc())
        }
        Some((EventSortField::StartDate, SortOrder::Asc)) => query.order(dsl::start_date.asc()),
        Some((EventSortField::StartDate, SortOrder::Desc)) => {
            query.order(dsl::start_date.desc())
        }
        Some((EventSortField::EndDate, SortOrder::Asc)) => query.order(dsl::end_date.asc()),
        Some((EventSortField::EndDate, SortOrder::Desc)) => query.order(dsl::end_date.desc()),
    };

    if !pagination.is_unbounded() {
        query = query.limit(pagination.limit).offset(pagination.offset());
    }

    query
}

impl EventRepository for PgConnection {
    async fn create_event(&mut self, event: NewEvent) -> PgResult<Event> {
        let event = diesel::insert_into(events::table)
            .values(&event)
            .returning(Event::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(event)
    }

    async fn find_event(&mut self, project_id: i64, event_id: i64) -> PgResult<Option<Event>> {
        let event = events::table
            .filter(dsl::project_id.eq(project_id))
            .filter(dsl::event_id.eq(event_id))
            .select(Event::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(event)
    }

    async fn update_event(
        &mut self,
        project_id: i64,
        event_id: i64,
        changes: UpdateEvent,
    ) -> PgResult<Option<Event>> {
        let event = diesel::update(events::table)
            .filter(dsl::project_id.eq(project_id))
            .filter(dsl::event_id.eq(event_id))
            .set((&changes, dsl::updated_at.eq(now)))
            .returning(Event::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(event)
    }

    async fn delete_event(&mut self, project_id: i64, event_id: i64) -> PgResult<bool> {
        let deleted = diesel::delete(events::table)
            .filter(dsl::project_id.eq(project_id))
            .filter(dsl::event_id.eq(event_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn list_events(
        &mut self,
        project_id: i64,
        filter: EventFilter,
        sort_by: Option<EventSortBy>,
        pagination: Pagination,
    ) -> PgResult<Page<Event>> {
        let total_rows = filtered_events(project_id, &filter)?
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        let query = filtered_events(project_id, &filter)?;
        let items = sorted_events(query, sort_by, pagination)
            .select(Event::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            project_id,
            total_rows,
            returned = items.len(),
            "listed events"
        );

        Ok(Page::new(items, total_rows, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::render;

    #[test]
    fn list_is_scoped_to_project() {
        let query = filtered_events(4, &EventFilter::default()).unwrap();
        let (sql, binds) = render(&sorted_events(query, None, Pagination::UNBOUNDED));

        assert!(sql.contains(r#""events"."project_id" = $1"#));
        assert!(sql.contains(r#"ORDER BY "events"."event_id" ASC"#));
        assert!(!sql.contains("LIMIT"));
        assert_eq!(binds, "[4]");
    }

    #[test]
    fn filtered_sorted_page() {
        let filter = EventFilter::parse("event_name ILIKE '%gala%'").unwrap();
        let query = filtered_events(4, &filter).unwrap();
        let sort_by = Some(EventSortBy::desc(EventSortField::StartDate));
        let (sql, binds) = render(&sorted_events(query, sort_by, Pagination::normalize(1, 5)));

        assert!(sql.contains(r#""events"."event_name" ILIKE $2"#));
        assert!(sql.contains(r#"ORDER BY "events"."start_date" DESC"#));
        assert!(sql.contains("LIMIT $3"));
        assert!(!sql.contains("gala"));
        assert_eq!(binds, r#"[4, "%gala%", 5, 0]"#);
    }
}
