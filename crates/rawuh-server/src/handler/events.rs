//! Event management handlers.
//!
//! Events belong to a project. Every route checks the caller against the
//! project in the path, and every query is additionally bound to that
//! project so an event id from another project never matches.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use rawuh_postgres::query::EventRepository;
use rawuh_postgres::types::{EventFilterColumn, EventSortField};

use crate::extract::{AuthState, Database, Json, ListQuery, Path, ValidateJson, authorize};
use crate::handler::request::{CreateEvent, EventPathParams, ProjectPathParams, UpdateEvent};
use crate::handler::response::{ApiResponse, ErrorResponse, Event, ListResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{ServiceLimits, ServiceState};

/// Tracing target for event operations.
const TRACING_TARGET: &str = "rawuh_server::handler::events";

type EventListQuery = ListQuery<EventFilterColumn, EventSortField>;

fn event_not_found(event_id: i64) -> Error<'static> {
    ErrorKind::NotFound
        .with_message("event not found")
        .with_context(format!("event_id: {event_id}"))
        .with_resource("event")
}

/// Creates an event in a project.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
    )
)]
async fn create_event(
    database: Database,
    State(limits): State<ServiceLimits>,
    auth_state: AuthState,
    Path(path_params): Path<ProjectPathParams>,
    ValidateJson(request): ValidateJson<CreateEvent>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    request.check_limits(&limits)?;
    let project_id = path_params.project_id()?;

    let mut conn = database.connection().await?;
    let event = database
        .call(conn.create_event(request.into_model(project_id, &auth_state)))
        .await?;

    tracing::info!(target: TRACING_TARGET, event_id = event.event_id, "Event created");

    Ok((StatusCode::OK, Json(ApiResponse::ok(event.into()))))
}

fn create_event_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create event")
        .description("Creates a new event in the project.")
        .response::<200, Json<ApiResponse<Event>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Lists the events of a project.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
    )
)]
async fn list_events(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<ProjectPathParams>,
    list_query: EventListQuery,
) -> Result<(StatusCode, Json<ListResponse<Event>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    let project_id = path_params.project_id()?;

    let mut conn = database.connection().await?;
    let page = database
        .call(conn.list_events(
            project_id,
            list_query.filter,
            list_query.sort,
            list_query.pagination,
        ))
        .await?;

    tracing::info!(target: TRACING_TARGET, total_rows = page.total_rows, "Events listed");

    Ok((StatusCode::OK, Json(ListResponse::from_page(page, Event::from_model))))
}

fn list_events_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List events")
        .description("Lists the events of a project with filtering, sorting and paging.")
        .response::<200, Json<ListResponse<Event>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns a single event of a project.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
        event_id = %path_params.event_id,
    )
)]
async fn read_event(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    let (project_id, event_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    let Some(event) = database.call(conn.find_event(project_id, event_id)).await? else {
        return Err(event_not_found(event_id));
    };

    tracing::info!(target: TRACING_TARGET, "Event read");

    Ok((StatusCode::OK, Json(ApiResponse::ok(event.into()))))
}

fn read_event_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get event")
        .description("Returns a single event of the project.")
        .response::<200, Json<ApiResponse<Event>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates an event of a project.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
        event_id = %path_params.event_id,
    )
)]
async fn update_event(
    database: Database,
    State(limits): State<ServiceLimits>,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
    ValidateJson(request): ValidateJson<UpdateEvent>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    request.check_limits(&limits)?;
    let (project_id, event_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    let changes = request.into_model(&auth_state);
    let Some(event) = database
        .call(conn.update_event(project_id, event_id, changes))
        .await?
    else {
        return Err(event_not_found(event_id));
    };

    tracing::info!(target: TRACING_TARGET, "Event updated");

    Ok((StatusCode::OK, Json(ApiResponse::ok(event.into()))))
}

fn update_event_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update event")
        .description("Updates an event. Only provided fields are changed.")
        .response::<200, Json<ApiResponse<Event>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes an event and its guests.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
        event_id = %path_params.event_id,
    )
)]
async fn delete_event(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    let (project_id, event_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    if !database.call(conn.delete_event(project_id, event_id)).await? {
        return Err(event_not_found(event_id));
    }

    tracing::info!(target: TRACING_TARGET, "Event deleted");

    Ok((StatusCode::OK, Json(ApiResponse::empty())))
}

fn delete_event_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete event")
        .description("Deletes an event together with its guests.")
        .response::<200, Json<ApiResponse<()>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an [`ApiRouter`] with all event routes.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/{project_id}/events", post_with(create_event, create_event_docs))
        .api_route("/{project_id}/events/list", get_with(list_events, list_events_docs))
        .api_route(
            "/{project_id}/events/{event_id}",
            get_with(read_event, read_event_docs)
                .put_with(update_event, update_event_docs)
                .delete_with(delete_event, delete_event_docs),
        )
        .with_path_items(|item| item.tag("Events"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::handler::test::{TestContext, create_test_server};

    #[tokio::test]
    async fn event_detail_across_projects_is_forbidden() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server.get("/8/events/1").authorization_bearer(token).await;

        response.assert_status_forbidden();
        response.assert_json(&json!({
            "Error": true,
            "Code": 403,
            "Message": "permission denied",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_sort_column_is_rejected() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server
            .get("/7/events/list")
            .add_query_param("sort", "drop_table")
            .add_query_param("dir", "asc")
            .authorization_bearer(token)
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn malformed_filter_is_rejected() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server
            .get("/7/events/list")
            .add_query_param("query", "not base64!")
            .authorization_bearer(token)
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn malformed_id_after_authorization_is_internal() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::admin()).await?;

        let response = server.get("/7/events/abc").authorization_bearer(token).await;

        response.assert_status_internal_server_error();
        Ok(())
    }

    #[tokio::test]
    async fn backwards_schedule_is_rejected() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server
            .post("/7/events")
            .authorization_bearer(token)
            .json(&json!({
                "event_name": "Gala",
                "start_date": "2025-06-02T10:00:00Z",
                "end_date": "2025-06-01T10:00:00Z",
            }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }
}
