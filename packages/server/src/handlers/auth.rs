use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    validate_login_request, validate_register_request,
};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::jwt::{self, TokenType};
use crate::utils::{hash, user as user_utils};

const USERNAME_TAKEN: &str = "a user with that username already exists.";
const EMAIL_TAKEN: &str = "email already in use.";

/// Map a unique violation raised by a concurrent registration to the field
/// whose constraint fired.
fn registration_conflict(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("Registration race: unique constraint caught on insert");
            if detail.contains("email") {
                AppError::field("email", EMAIL_TAKEN)
            } else {
                AppError::field("username", USERNAME_TAKEN)
            }
        }
        _ => AppError::from(e),
    }
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new account",
    description = "Creates an active, non-staff account. `password2` must repeat `password` and the email must not belong to another account. No group is assigned.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR) with `field` set", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_string();

    let txn = state.db.begin().await?;

    let username_taken = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&txn)
        .await?
        .is_some();
    if username_taken {
        return Err(AppError::field("username", USERNAME_TAKEN));
    }

    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&txn)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::field("email", EMAIL_TAKEN));
    }

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        first_name: Set(payload.first_name.trim().to_string()),
        last_name: Set(payload.last_name.trim().to_string()),
        password: Set(hash),
        is_active: Set(true),
        is_staff: Set(false),
        is_superuser: Set(false),
        date_joined: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let user = new_user
        .insert(&txn)
        .await
        .map_err(registration_conflict)?;
    txn.commit().await?;

    tracing::info!(user_id = user.id, "Registered new account");

    Ok((StatusCode::CREATED, Json(UserResponse::new(user, Vec::new()))))
}

#[utoipa::path(
    post,
    path = "/token",
    tag = "Auth",
    operation_id = "obtainToken",
    summary = "Obtain an access/refresh token pair",
    description = "Checks the credentials of an active account and returns a token pair together with the account's attributes and group names. `docente_id` and `codigo_docente` are present only when the account is linked to a teacher profile.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair and account attributes", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials or inactive account (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn obtain_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let username = payload.username.trim();

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid || !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let tokens = jwt::issue_pair(&user, &state.config.auth)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    let groups: Vec<String> = user_utils::user_groups(&state.db, user.id)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect();
    let teacher = user_utils::teacher_claims(&state.db, user.id).await?;

    tracing::info!(
        user_id = user.id,
        groups = groups.len(),
        teacher = teacher.is_some(),
        "Issued token pair"
    );

    Ok(Json(LoginResponse::enrich(tokens, user, groups, teacher)))
}

#[utoipa::path(
    post,
    path = "/token/refresh",
    tag = "Auth",
    operation_id = "refreshToken",
    summary = "Exchange a refresh token for a new access token",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid, expired or non-refresh token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn refresh_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let claims = jwt::verify(
        &payload.refresh,
        &state.config.auth.jwt_secret,
        TokenType::Refresh,
    )
    .map_err(|e| {
        tracing::debug!("Rejected refresh token: {}", e);
        AppError::TokenInvalid
    })?;

    let user = user::Entity::find_by_id(claims.uid)
        .one(&state.db)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::TokenInvalid)?;

    let access = jwt::issue_access(&user, &state.config.auth)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(RefreshResponse { access }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current account",
    responses(
        (status = 200, description = "The authenticated account", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let groups = user_utils::user_groups(&state.db, user.id).await?;

    Ok(Json(UserResponse::new(user, groups)))
}
