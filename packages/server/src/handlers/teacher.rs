use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{teacher, teacher_specialty};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{Pagination, blank_to_none, escape_like, page_params};
use crate::models::teacher::*;
use crate::state::AppState;
use crate::utils::teacher::{
    replace_specialties, resolve_specialties, resolve_unit, resolve_user, teacher_response,
    teacher_responses,
};

fn teacher_conflict(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
            "A teacher with this code or user account already exists".into(),
        ),
        _ => AppError::from(e),
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Teachers",
    operation_id = "createTeacher",
    summary = "Create a teacher",
    description = "Creates a teacher profile. Staff only. When `especialidad_ids` is given and non-empty, the teacher's specialties become exactly that set. Unknown user, unit or specialty IDs are reported on their field.",
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = TeacherResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Code or user account already used (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(code = %payload.code))]
pub async fn create_teacher(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeacherRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_staff()?;
    validate_create_teacher(&payload)?;

    let txn = state.db.begin().await?;

    if let Some(user_id) = payload.user_id {
        resolve_user(&txn, user_id).await?;
    }
    if let Some(unit_id) = payload.primary_unit_id {
        resolve_unit(&txn, unit_id).await?;
    }
    let specialties = match payload.specialty_ids {
        Some(Some(ref ids)) => Some(resolve_specialties(&txn, ids).await?),
        _ => None,
    };

    let new_teacher = teacher::ActiveModel {
        user_id: Set(payload.user_id),
        code: Set(payload.code.trim().to_string()),
        first_names: Set(payload.first_names.trim().to_string()),
        last_names: Set(payload.last_names.trim().to_string()),
        national_id: Set(blank_to_none(payload.national_id)),
        email: Set(blank_to_none(payload.email)),
        phone: Set(blank_to_none(payload.phone)),
        contract_type: Set(blank_to_none(payload.contract_type)),
        max_weekly_hours: Set(payload
            .max_weekly_hours
            .unwrap_or(teacher::DEFAULT_MAX_WEEKLY_HOURS)),
        primary_unit_id: Set(payload.primary_unit_id),
        ..Default::default()
    };

    let model = new_teacher.insert(&txn).await.map_err(teacher_conflict)?;

    if let Some(ref ids) = specialties
        && !ids.is_empty()
    {
        replace_specialties(&txn, model.id, ids).await?;
    }

    let response = teacher_response(&txn, model).await?;
    txn.commit().await?;

    tracing::info!(
        teacher_id = response.id,
        specialties = response.specialties.len(),
        user_id = auth_user.user_id,
        "Created teacher"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Teachers",
    operation_id = "listTeachers",
    summary = "List teachers with pagination and search",
    params(TeacherListQuery),
    responses(
        (status = 200, description = "Teachers ordered by ID", body = TeacherListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_teachers(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TeacherListQuery>,
) -> Result<Json<TeacherListResponse>, AppError> {
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = teacher::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            let matches = |col: teacher::Column| {
                Expr::expr(Func::lower(Expr::col(col)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            select = select.filter(
                Condition::any()
                    .add(matches(teacher::Column::Code))
                    .add(matches(teacher::Column::FirstNames))
                    .add(matches(teacher::Column::LastNames)),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let teachers = select
        .order_by_asc(teacher::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = teacher_responses(&state.db, teachers).await?;

    Ok(Json(TeacherListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Teachers",
    operation_id = "getTeacher",
    summary = "Get a teacher by ID",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = TeacherResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_teacher(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeacherResponse>, AppError> {
    let model = teacher::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Teacher not found".into()))?;
    Ok(Json(teacher_response(&state.db, model).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Teachers",
    operation_id = "updateTeacher",
    summary = "Partially update a teacher",
    description = "PATCH semantics. Staff only. Omitting `especialidad_ids` leaves specialties untouched; `[]` clears them; a list replaces them. Nullable fields accept `null` to clear.",
    params(("id" = i32, Path, description = "Teacher ID")),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Code or user account already used (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_teacher(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateTeacherRequest>,
) -> Result<Json<TeacherResponse>, AppError> {
    auth_user.require_staff()?;
    validate_update_teacher(&payload)?;

    let txn = state.db.begin().await?;
    let existing = find_teacher_for_update(&txn, id).await?;

    if let Some(Some(user_id)) = payload.user_id {
        resolve_user(&txn, user_id).await?;
    }
    if let Some(Some(unit_id)) = payload.primary_unit_id {
        resolve_unit(&txn, unit_id).await?;
    }
    let specialties = match payload.specialty_ids {
        Some(Some(ref ids)) => Some(resolve_specialties(&txn, ids).await?),
        _ => None,
    };

    let mut active: teacher::ActiveModel = existing.clone().into();

    if let Some(user_id) = payload.user_id {
        active.user_id = Set(user_id);
    }
    if let Some(Some(ref code)) = payload.code {
        active.code = Set(code.trim().to_string());
    }
    if let Some(Some(ref first_names)) = payload.first_names {
        active.first_names = Set(first_names.trim().to_string());
    }
    if let Some(Some(ref last_names)) = payload.last_names {
        active.last_names = Set(last_names.trim().to_string());
    }
    if let Some(national_id) = payload.national_id {
        active.national_id = Set(blank_to_none(national_id));
    }
    if let Some(email) = payload.email {
        active.email = Set(blank_to_none(email));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(blank_to_none(phone));
    }
    if let Some(contract_type) = payload.contract_type {
        active.contract_type = Set(blank_to_none(contract_type));
    }
    if let Some(Some(hours)) = payload.max_weekly_hours {
        active.max_weekly_hours = Set(hours);
    }
    if let Some(unit_id) = payload.primary_unit_id {
        active.primary_unit_id = Set(unit_id);
    }

    let model = if active.is_changed() {
        active.update(&txn).await.map_err(teacher_conflict)?
    } else {
        existing
    };

    // Absent key: associations untouched. Present, even empty: replaced.
    if let Some(ref ids) = specialties {
        replace_specialties(&txn, model.id, ids).await?;
    }

    let response = teacher_response(&txn, model).await?;
    txn.commit().await?;

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Teachers",
    operation_id = "deleteTeacher",
    summary = "Delete a teacher",
    description = "Deletes the teacher and its specialty associations. The linked user account is kept. Staff only.",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_teacher(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_staff()?;

    let txn = state.db.begin().await?;
    find_teacher_for_update(&txn, id).await?;

    teacher_specialty::Entity::delete_many()
        .filter(teacher_specialty::Column::TeacherId.eq(id))
        .exec(&txn)
        .await?;
    teacher::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_teacher_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<teacher::Model, AppError> {
    use sea_orm::sea_query::LockType;
    teacher::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Teacher not found".into()))
}
