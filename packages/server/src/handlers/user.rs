use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{group, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::shared::{Pagination, page_params};
use crate::models::user::{GroupResponse, UserListQuery, UserListResponse, UserResponse};
use crate::state::AppState;
use crate::utils::user::{groups_by_user, user_groups};

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List accounts",
    description = "Paginated list of accounts with their groups, ordered by ID. Staff only.",
    params(UserListQuery),
    responses(
        (status = 200, description = "Accounts", body = UserListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    auth_user.require_staff()?;
    let (page, per_page) = page_params(query.page, query.per_page);

    let select = user::Entity::find().order_by_asc(user::Column::Id);
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let users = select
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let mut groups = groups_by_user(&state.db, users.iter().map(|u| u.id).collect()).await?;
    let data = users
        .into_iter()
        .map(|u| {
            let user_groups = groups.remove(&u.id).unwrap_or_default();
            UserResponse::new(u, user_groups)
        })
        .collect();

    Ok(Json(UserListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get an account by ID",
    description = "Staff can read any account; other users only their own.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_self_or_staff(id)?;

    let user = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let groups = user_groups(&state.db, id).await?;

    Ok(Json(UserResponse::new(user, groups)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listGroups",
    summary = "List groups",
    responses(
        (status = 200, description = "All groups, ordered by ID", body = Vec<GroupResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_groups(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<GroupResponse>>, AppError> {
    let groups = group::Entity::find()
        .order_by_asc(group::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}
