//! Project management handlers.
//!
//! Creating projects is reserved for system administrators. Project users
//! can read and modify only the project their claims name, and their
//! listing is scoped to it.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use rawuh_postgres::query::ProjectRepository;
use rawuh_postgres::types::{ProjectFilterColumn, ProjectSortField};

use crate::extract::{
    AuthProvider, AuthState, Database, Json, ListQuery, Path, ValidateJson, authorize,
};
use crate::handler::request::{CreateProject, ProjectPathParams, UpdateProject};
use crate::handler::response::{ApiResponse, ErrorResponse, ListResponse, Project};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{ServiceLimits, ServiceState};

/// Tracing target for project operations.
const TRACING_TARGET: &str = "rawuh_server::handler::projects";

type ProjectListQuery = ListQuery<ProjectFilterColumn, ProjectSortField>;

fn project_not_found(project_id: i64) -> Error<'static> {
    ErrorKind::NotFound
        .with_message("project not found")
        .with_context(format!("project_id: {project_id}"))
        .with_resource("project")
}

/// Creates a new project.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn create_project(
    database: Database,
    State(limits): State<ServiceLimits>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<CreateProject>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>)> {
    authorize!(admin: auth_state);
    request.check_limits(&limits)?;

    let mut conn = database.connection().await?;
    let project = database
        .call(conn.create_project(request.into_model(auth_state.user_id)))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        project_id = project.project_id,
        "Project created"
    );

    Ok((StatusCode::OK, Json(ApiResponse::ok(project.into()))))
}

fn create_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create project")
        .description("Creates a new project. Requires a system administrator.")
        .response::<200, Json<ApiResponse<Project>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Lists projects visible to the caller.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn list_projects(
    database: Database,
    auth_state: AuthState,
    list_query: ProjectListQuery,
) -> Result<(StatusCode, Json<ListResponse<Project>>)> {
    let scope = auth_state.project_scope()?;

    let ListQuery {
        filter,
        sort,
        pagination,
    } = list_query;

    let mut conn = database.connection().await?;
    let page = database
        .call(conn.list_projects(scope, filter, sort, pagination))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        total_rows = page.total_rows,
        scoped = scope.is_some(),
        "Projects listed"
    );

    Ok((StatusCode::OK, Json(ListResponse::from_page(page, Project::from_model))))
}

fn list_projects_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List projects")
        .description(
            "Lists projects with filtering, sorting and paging. Project users only see \
             their own project.",
        )
        .response::<200, Json<ListResponse<Project>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns a single project.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
    )
)]
async fn read_project(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    let project_id = path_params.project_id()?;

    let mut conn = database.connection().await?;
    let Some(project) = database.call(conn.find_project(project_id)).await? else {
        return Err(project_not_found(project_id));
    };

    tracing::info!(target: TRACING_TARGET, "Project read");

    Ok((StatusCode::OK, Json(ApiResponse::ok(project.into()))))
}

fn read_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get project")
        .description("Returns a single project.")
        .response::<200, Json<ApiResponse<Project>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates a project. Only provided fields change.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
    )
)]
async fn update_project(
    database: Database,
    State(limits): State<ServiceLimits>,
    auth_state: AuthState,
    Path(path_params): Path<ProjectPathParams>,
    ValidateJson(request): ValidateJson<UpdateProject>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    request.check_limits(&limits)?;
    let project_id = path_params.project_id()?;

    let mut conn = database.connection().await?;
    let changes = request.into_model(auth_state.user_id);
    let Some(project) = database
        .call(conn.update_project(project_id, changes))
        .await?
    else {
        return Err(project_not_found(project_id));
    };

    tracing::info!(target: TRACING_TARGET, "Project updated");

    Ok((StatusCode::OK, Json(ApiResponse::ok(project.into()))))
}

fn update_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update project")
        .description("Updates a project. Only provided fields are changed.")
        .response::<200, Json<ApiResponse<Project>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a project together with its events and guests.
#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        project_id = %path_params.project_id,
    )
)]
async fn delete_project(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    authorize!(project: auth_state, &path_params.project_id);
    let project_id = path_params.project_id()?;

    let mut conn = database.connection().await?;
    if !database.call(conn.delete_project(project_id)).await? {
        return Err(project_not_found(project_id));
    }

    tracing::info!(target: TRACING_TARGET, "Project deleted");

    Ok((StatusCode::OK, Json(ApiResponse::empty())))
}

fn delete_project_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete project")
        .description("Deletes a project together with its events and guests.")
        .response::<200, Json<ApiResponse<()>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an [`ApiRouter`] with all project routes.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/project", post_with(create_project, create_project_docs))
        .api_route("/project/list", get_with(list_projects, list_projects_docs))
        .api_route(
            "/project/{project_id}",
            get_with(read_project, read_project_docs)
                .put_with(update_project, update_project_docs)
                .delete_with(delete_project, delete_project_docs),
        )
        .with_path_items(|item| item.tag("Projects"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::extract::{AuthClaims, UserType};
    use crate::handler::test::{TestContext, create_test_server};

    #[tokio::test]
    async fn project_user_cannot_create_projects() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server
            .post("/project")
            .authorization_bearer(token)
            .json(&json!({ "project_name": "Wedding" }))
            .await;

        response.assert_status_forbidden();
        Ok(())
    }

    #[tokio::test]
    async fn project_user_cannot_read_other_projects() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::project_user(7, 3)).await?;

        let response = server.get("/project/8").authorization_bearer(token).await;
        response.assert_status_forbidden();
        response.assert_json(&json!({
            "Error": true,
            "Code": 403,
            "Message": "permission denied",
        }));

        let response = server.delete("/project/8").authorization_bearer(token).await;
        response.assert_status_forbidden();
        Ok(())
    }

    #[tokio::test]
    async fn invalid_project_update_is_rejected_before_storage() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::admin()).await?;

        let response = server
            .put("/project/7")
            .authorization_bearer(token)
            .json(&json!({ "project_name": "<script>" }))
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn unknown_sort_column_is_rejected() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.sign_in(TestContext::admin()).await?;

        let response = server
            .get("/project/list")
            .add_query_param("sort", "password")
            .add_query_param("dir", "asc")
            .authorization_bearer(token)
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn unrecognized_role_cannot_list_projects() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let claims = AuthClaims {
            user_type: UserType::Unrecognized("GUEST".into()),
            ..TestContext::project_user(7, 3)
        };
        let token = context.sign_in(claims).await?;

        let response = server.get("/project/list").authorization_bearer(token).await;
        response.assert_status_forbidden();
        response.assert_json(&json!({
            "Error": true,
            "Code": 403,
            "Message": "permission denied",
        }));
        Ok(())
    }
}
