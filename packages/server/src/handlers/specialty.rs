use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::specialty;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::blank_to_none;
use crate::models::specialty::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Specialties",
    operation_id = "listSpecialties",
    summary = "List specialties",
    responses(
        (status = 200, description = "All specialties, ordered by name", body = Vec<SpecialtyResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_specialties(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SpecialtyResponse>>, AppError> {
    let specialties = specialty::Entity::find()
        .order_by_asc(specialty::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(
        specialties.into_iter().map(SpecialtyResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Specialties",
    operation_id = "createSpecialty",
    summary = "Create a specialty",
    description = "Staff only. Specialty names are unique.",
    request_body = CreateSpecialtyRequest,
    responses(
        (status = 201, description = "Specialty created", body = SpecialtyResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name already used (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_specialty(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSpecialtyRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_staff()?;
    validate_create_specialty(&payload)?;

    let model = specialty::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(blank_to_none(payload.description)),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A specialty with this name already exists".into())
        }
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(SpecialtyResponse::from(model))))
}
