//! List query parameters: filter, sort and pagination.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rawuh_postgres::types::{Filter, FilterColumn, Pagination, SortBy};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::extract::Query;
use crate::handler::{Error, ErrorKind};

/// Tracing target for rejected list queries.
const TRACING_TARGET: &str = "rawuh_server::extract::list_query";

/// Raw list parameters as they arrive in the query string.
#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
pub struct ListParams {
    /// One-based page number. `page=0&limit=0` disables paging.
    #[serde(default)]
    pub page: i64,
    /// Page size, clamped to `1..=100`.
    #[serde(default)]
    pub limit: i64,
    /// Column to sort by.
    #[serde(default)]
    pub sort: String,
    /// Sort direction, `asc` or `desc`.
    #[serde(default)]
    pub dir: String,
    /// Base64 encoded filter, e.g. `name = 'Ann' AND email ILIKE '%@x.io'`.
    #[serde(default)]
    pub query: String,
}

/// Validated list query for columns `C` and sort fields `F`.
///
/// Built in a fixed order, stopping at the first failure: the filter is
/// decoded, then the sort pair is checked against the allow-list, then
/// pagination is normalized. Any failure is `400 Invalid Argument` and no
/// storage call happens.
#[derive(Debug, Clone)]
pub struct ListQuery<C, F> {
    /// Client filter terms.
    pub filter: Filter<C>,
    /// Requested ordering, if any.
    pub sort: Option<SortBy<F>>,
    /// Normalized paging.
    pub pagination: Pagination,
}

impl<C, F> ListQuery<C, F>
where
    C: FilterColumn,
    F: std::str::FromStr,
{
    /// Validates raw parameters.
    pub fn from_params(params: &ListParams) -> Result<Self, Error<'static>> {
        let filter = Filter::decode(&params.query).map_err(|err| {
            tracing::debug!(target: TRACING_TARGET, error = %err, "Rejected filter");
            ErrorKind::BadRequest
                .with_message(format!("invalid query: {err}"))
                .with_resource("query")
        })?;

        let sort = SortBy::parse(&params.sort, &params.dir).map_err(|err| {
            tracing::debug!(target: TRACING_TARGET, error = %err, "Rejected sort");
            ErrorKind::BadRequest
                .with_message(format!("invalid sort: {err}"))
                .with_resource("sort")
        })?;

        Ok(Self {
            filter,
            sort,
            pagination: Pagination::normalize(params.page, params.limit),
        })
    }
}

impl<C, F, S> FromRequestParts<S> for ListQuery<C, F>
where
    C: FilterColumn + Send,
    F: std::str::FromStr + Send,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListParams>::from_request_parts(parts, state).await?;
        Self::from_params(&params)
    }
}

impl<C, F> aide::OperationInput for ListQuery<C, F> {
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Query::<ListParams>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use rawuh_postgres::types::{
        EventFilterColumn, EventSortField, GuestFilterColumn, GuestSortField, SortOrder,
    };

    use super::*;

    type EventQuery = ListQuery<EventFilterColumn, EventSortField>;
    type GuestQuery = ListQuery<GuestFilterColumn, GuestSortField>;

    fn params(sort: &str, dir: &str) -> ListParams {
        ListParams {
            page: 1,
            limit: 10,
            sort: sort.into(),
            dir: dir.into(),
            query: String::new(),
        }
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let error = EventQuery::from_params(&params("drop_table", "asc")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("sort"));
    }

    #[test]
    fn both_sort_parts_are_checked() {
        assert!(EventQuery::from_params(&params("event_name", "sideways")).is_err());
        assert!(EventQuery::from_params(&params("", "asc")).is_err());
        assert!(EventQuery::from_params(&params("event_name", "")).is_err());
    }

    #[test]
    fn blank_sort_is_rejected() {
        let error = EventQuery::from_params(&params(" ", "")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("sort"));
    }

    #[test]
    fn sort_is_case_insensitive() {
        let query = EventQuery::from_params(&params("Event_Name", "DESC")).unwrap();
        let sort = query.sort.unwrap();
        assert_eq!(sort.field, EventSortField::EventName);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn no_sort_is_accepted() {
        let query = EventQuery::from_params(&params("", "")).unwrap();
        assert!(query.sort.is_none());
    }

    #[test]
    fn zero_page_and_limit_disable_paging() {
        let query = GuestQuery::from_params(&ListParams::default()).unwrap();
        assert_eq!(query.pagination, Pagination::UNBOUNDED);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn filter_is_decoded() {
        let mut params = params("", "");
        params.query = STANDARD.encode("name = 'Ann' AND email ILIKE '%@x.io'");

        let query = GuestQuery::from_params(&params).unwrap();
        assert_eq!(query.filter.terms().len(), 2);
    }

    #[test]
    fn bad_filter_is_rejected() {
        let mut bad_base64 = params("", "");
        bad_base64.query = "%%%".into();
        let error = GuestQuery::from_params(&bad_base64).unwrap_err();
        assert_eq!(error.resource(), Some("query"));

        let mut unknown_column = params("", "");
        unknown_column.query = STANDARD.encode("password = 'x'");
        assert!(GuestQuery::from_params(&unknown_column).is_err());
    }
}
