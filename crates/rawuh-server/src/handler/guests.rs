//! Guest management handlers.
//!
//! Guests are scoped by both project and event, and project users must
//! match both.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use rawuh_postgres::query::GuestRepository;
use rawuh_postgres::types::{GuestFilterColumn, GuestSortField};

use crate::extract::{AuthState, Database, Json, ListQuery, Path, ValidateJson, authorize};
use crate::handler::request::{CreateGuest, EventPathParams, GuestPathParams, UpdateGuest};
use crate::handler::response::{ApiResponse, ErrorResponse, Guest, ListResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{ServiceLimits, ServiceState};

/// Tracing target for guest operations.
const TRACING_TARGET: &str = "rawuh_server::handler::guests";

type GuestListQuery = ListQuery<GuestFilterColumn, GuestSortField>;

fn guest_not_found(guest_id: i64) -> Error<'static> {
    ErrorKind::NotFound
        .with_message("guest not found")
        .with_context(format!("guest_id: {guest_id}"))
        .with_resource("guest")
}

#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
        event_id = %path_params.event_id,
    )
)]
async fn create_guest(
    database: Database,
    State(limits): State<ServiceLimits>,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
    ValidateJson(request): ValidateJson<CreateGuest>,
) -> Result<(StatusCode, Json<ApiResponse<Guest>>)> {
    authorize!(event: auth_state, &path_params.project_id, &path_params.event_id);
    request.check_limits(&limits)?;
    let (project_id, event_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    let guest = database
        .call(conn.create_guest(request.into_model(project_id, event_id)))
        .await?;

    tracing::info!(target: TRACING_TARGET, guest_id = guest.guest_id, "Guest created");

    Ok((StatusCode::OK, Json(ApiResponse::ok(guest.into()))))
}

fn create_guest_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create guest")
        .description("Adds a guest to the event.")
        .response::<200, Json<ApiResponse<Guest>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Lists the guests of an event.
///
/// `page=0&limit=0` returns every matching guest in one page.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
        event_id = %path_params.event_id,
    )
)]
async fn list_guests(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<EventPathParams>,
    list_query: GuestListQuery,
) -> Result<(StatusCode, Json<ListResponse<Guest>>)> {
    authorize!(event: auth_state, &path_params.project_id, &path_params.event_id);
    let (project_id, event_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    let page = database
        .call(conn.list_guests(
            project_id,
            event_id,
            list_query.filter,
            list_query.sort,
            list_query.pagination,
        ))
        .await?;

    tracing::info!(target: TRACING_TARGET, total_rows = page.total_rows, "Guests listed");

    Ok((StatusCode::OK, Json(ListResponse::from_page(page, Guest::from_model))))
}

fn list_guests_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List guests")
        .description(
            "Lists the guests of an event with filtering, sorting and paging. \
             `page=0&limit=0` disables paging.",
        )
        .response::<200, Json<ListResponse<Guest>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        guest_id = %path_params.guest_id,
    )
)]
async fn read_guest(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<GuestPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<Guest>>)> {
    authorize!(event: auth_state, &path_params.project_id, &path_params.event_id);
    let (project_id, event_id, guest_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    let Some(guest) = database
        .call(conn.find_guest(project_id, event_id, guest_id))
        .await?
    else {
        return Err(guest_not_found(guest_id));
    };

    tracing::info!(target: TRACING_TARGET, "Guest read");

    Ok((StatusCode::OK, Json(ApiResponse::ok(guest.into()))))
}

fn read_guest_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get guest")
        .description("Returns a single guest of the event.")
        .response::<200, Json<ApiResponse<Guest>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        guest_id = %path_params.guest_id,
    )
)]
async fn update_guest(
    database: Database,
    State(limits): State<ServiceLimits>,
    auth_state: AuthState,
    Path(path_params): Path<GuestPathParams>,
    ValidateJson(request): ValidateJson<UpdateGuest>,
) -> Result<(StatusCode, Json<ApiResponse<Guest>>)> {
    authorize!(event: auth_state, &path_params.project_id, &path_params.event_id);
    request.check_limits(&limits)?;
    let (project_id, event_id, guest_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    let Some(guest) = database
        .call(conn.update_guest(project_id, event_id, guest_id, request.into_model()))
        .await?
    else {
        return Err(guest_not_found(guest_id));
    };

    tracing::info!(target: TRACING_TARGET, "Guest updated");

    Ok((StatusCode::OK, Json(ApiResponse::ok(guest.into()))))
}

fn update_guest_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update guest")
        .description("Updates a guest. Only provided fields are changed.")
        .response::<200, Json<ApiResponse<Guest>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        guest_id = %path_params.guest_id,
    )
)]
async fn delete_guest(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<GuestPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    authorize!(event: auth_state, &path_params.project_id, &path_params.event_id);
    let (project_id, event_id, guest_id) = path_params.ids()?;

    let mut conn = database.connection().await?;
    if !database
        .call(conn.delete_guest(project_id, event_id, guest_id))
        .await?
    {
        return Err(guest_not_found(guest_id));
    }

    tracing::info!(target: TRACING_TARGET, "Guest deleted");

    Ok((StatusCode::OK, Json(ApiResponse::empty())))
}

fn delete_guest_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete guest")
        .description("Removes a guest from the event.")
        .response::<200, Json<ApiResponse<()>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an [`ApiRouter`] with all guest routes.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/{project_id}/events/{event_id}/guests",
            post_with(create_guest, create_guest_docs),
        )
        .api_route(
            "/{project_id}/events/{event_id}/guests/list",
            get_with(list_guests, list_guests_docs),
        )
        .api_route(
            "/{project_id}/events/{event_id}/guests/{guest_id}",
            get_with(read_guest, read_guest_docs)
                .put_with(update_guest, update_guest_docs)
                .delete_with(delete_guest, delete_guest_docs),
        )
        .with_path_items(|item| item.tag("Guests"))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::{TestContext, create_test_server};

    #[tokio::test]
    async fn project_user_must_match_event() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let other_event = server.get("/7/events/4/guests/list").authorization_bearer(token).await;
        other_event.assert_status_forbidden();

        let other_project = server.get("/8/events/3/guests/1").authorization_bearer(token).await;
        other_project.assert_status_forbidden();
        Ok(())
    }

    #[tokio::test]
    async fn guests_require_session() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/7/events/3/guests/list").await;
        response.assert_status_unauthorized();
        Ok(())
    }
}
