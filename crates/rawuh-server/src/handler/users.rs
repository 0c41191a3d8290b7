//! User administration handlers.
//!
//! Every route here requires a system administrator. Creating a user also
//! creates its login with the password encrypted by [`PasswordCipher`].

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use rawuh_postgres::query::UserRepository;
use rawuh_postgres::types::{UserFilterColumn, UserSortField};

use crate::extract::{AuthState, Database, Json, ListQuery, Path, ValidateJson, authorize};
use crate::handler::request::{CreateUser, UpdateUser, UserPathParams};
use crate::handler::response::{ApiResponse, ErrorResponse, ListResponse, User};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{PasswordCipher, ServiceLimits, ServiceState};

/// Tracing target for user operations.
const TRACING_TARGET: &str = "rawuh_server::handler::users";

type UserListQuery = ListQuery<UserFilterColumn, UserSortField>;

fn user_not_found(user_id: i64) -> Error<'static> {
    ErrorKind::NotFound
        .with_message("user not found")
        .with_context(format!("user_id: {user_id}"))
        .with_resource("user")
}

/// Creates a user together with its login.
#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn create_user(
    database: Database,
    State(limits): State<ServiceLimits>,
    State(password_cipher): State<PasswordCipher>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<CreateUser>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    authorize!(admin: auth_state);
    request.check_limits(&limits)?;

    let mut conn = database.connection().await?;
    if database.call(conn.username_exists(&request.username)).await? {
        return Err(ErrorKind::Conflict
            .with_message("username already exists")
            .with_resource("username"));
    }

    let (new_user, password) = request.into_model(&auth_state);
    let encrypted = password_cipher.encrypt(&password).map_err(|err| {
        ErrorKind::InternalServerError
            .with_message("password could not be encrypted")
            .with_context(err.to_string())
    })?;

    let user = database
        .call(conn.create_user_with_auth(new_user, encrypted))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        created_user_id = user.user_id,
        user_type = %user.user_type,
        "User created"
    );

    Ok((StatusCode::OK, Json(ApiResponse::ok(user.into()))))
}

fn create_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create user")
        .description("Creates a user and its login. Requires a system administrator.")
        .response::<200, Json<ApiResponse<User>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

#[tracing::instrument(skip_all, fields(user_id = auth_state.user_id))]
async fn list_users(
    database: Database,
    auth_state: AuthState,
    list_query: UserListQuery,
) -> Result<(StatusCode, Json<ListResponse<User>>)> {
    authorize!(admin: auth_state);

    let mut conn = database.connection().await?;
    let page = database
        .call(conn.list_users(list_query.filter, list_query.sort, list_query.pagination))
        .await?;

    tracing::info!(target: TRACING_TARGET, total_rows = page.total_rows, "Users listed");

    Ok((StatusCode::OK, Json(ListResponse::from_page(page, User::from_model))))
}

fn list_users_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List users")
        .description("Lists users with filtering, sorting and paging.")
        .response::<200, Json<ListResponse<User>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
}

#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        target_user_id = %path_params.user_id,
    )
)]
async fn read_user(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<UserPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    authorize!(admin: auth_state);
    let user_id = path_params.user_id()?;

    let mut conn = database.connection().await?;
    let Some(user) = database.call(conn.find_user(user_id)).await? else {
        return Err(user_not_found(user_id));
    };

    tracing::info!(target: TRACING_TARGET, "User read");

    Ok((StatusCode::OK, Json(ApiResponse::ok(user.into()))))
}

fn read_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get user")
        .description("Returns a single user. The password is never included.")
        .response::<200, Json<ApiResponse<User>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        target_user_id = %path_params.user_id,
    )
)]
async fn update_user(
    database: Database,
    State(limits): State<ServiceLimits>,
    auth_state: AuthState,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<UpdateUser>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    authorize!(admin: auth_state);
    request.check_limits(&limits)?;
    let user_id = path_params.user_id()?;

    let mut conn = database.connection().await?;
    let changes = request.into_model(&auth_state);
    let Some(user) = database.call(conn.update_user(user_id, changes)).await? else {
        return Err(user_not_found(user_id));
    };

    tracing::info!(target: TRACING_TARGET, "User updated");

    Ok((StatusCode::OK, Json(ApiResponse::ok(user.into()))))
}

fn update_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update user")
        .description("Updates a user profile. Only provided fields are changed.")
        .response::<200, Json<ApiResponse<User>>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

#[tracing::instrument(
    skip_all,
    fields(
        user_id = auth_state.user_id,
        target_user_id = %path_params.user_id,
    )
)]
async fn delete_user(
    database: Database,
    auth_state: AuthState,
    Path(path_params): Path<UserPathParams>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    authorize!(admin: auth_state);
    let user_id = path_params.user_id()?;

    let mut conn = database.connection().await?;
    if !database.call(conn.delete_user(user_id)).await? {
        return Err(user_not_found(user_id));
    }

    tracing::info!(target: TRACING_TARGET, "User deleted");

    Ok((StatusCode::OK, Json(ApiResponse::empty())))
}

fn delete_user_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete user")
        .description("Deletes a user and its login.")
        .response::<200, Json<ApiResponse<()>>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns an [`ApiRouter`] with all user routes.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/users", post_with(create_user, create_user_docs))
        .api_route("/users/list", get_with(list_users, list_users_docs))
        .api_route(
            "/users/{user_id}",
            get_with(read_user, read_user_docs)
                .put_with(update_user, update_user_docs)
                .delete_with(delete_user, delete_user_docs),
        )
        .with_path_items(|item| item.tag("Users"))
}
