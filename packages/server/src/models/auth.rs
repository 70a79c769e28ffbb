use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::entity::user;
use crate::error::AppError;
use crate::utils::jwt::TokenPair;

/// Request body for account registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-150 chars: letters, digits and `@.+-_`).
    #[schema(example = "ana")]
    pub username: String,
    /// Email address, unique across accounts.
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "p1")]
    pub password: String,
    /// Must repeat `password` exactly.
    #[schema(example = "p1")]
    pub password2: String,
    #[serde(default)]
    #[schema(example = "Ana")]
    pub first_name: String,
    #[serde(default)]
    #[schema(example = "Lopez")]
    pub last_name: String,
}

pub const USERNAME_MAX_CHARS: usize = 150;
pub const EMAIL_MAX_CHARS: usize = 254;

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

/// Checks that need no database access. Uniqueness of username and email is
/// checked by the handler afterwards.
pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > USERNAME_MAX_CHARS {
        return Err(AppError::field(
            "username",
            "Username must be 1-150 characters",
        ));
    }
    if !username.chars().all(is_username_char) {
        return Err(AppError::field(
            "username",
            "Username may contain only letters, digits and @/./+/-/_",
        ));
    }
    let email = payload.email.trim();
    if email.chars().count() > EMAIL_MAX_CHARS || !email.validate_email() {
        return Err(AppError::field("email", "Enter a valid email address."));
    }
    if payload.password.is_empty() {
        return Err(AppError::field("password", "Password must not be empty"));
    }
    if payload.password != payload.password2 {
        return Err(AppError::field("password", "passwords do not match."));
    }
    Ok(())
}

/// Credentials for obtaining a token pair.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ana")]
    pub username: String,
    #[schema(example = "p1")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::field("username", "This field may not be blank."));
    }
    if payload.password.is_empty() {
        return Err(AppError::field("password", "This field may not be blank."));
    }
    Ok(())
}

/// Teacher profile attributes added to the login response when the user has one.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct TeacherClaims {
    #[schema(example = 7)]
    pub docente_id: i32,
    #[schema(example = "D007")]
    pub codigo_docente: String,
}

/// Token pair plus denormalized account attributes.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Short-lived bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,
    /// Token accepted by the refresh endpoint.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: String,
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(example = "ana")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "Ana")]
    pub first_name: String,
    #[schema(example = "Lopez")]
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Names of the user's groups.
    #[schema(example = json!(["Admins", "Docentes"]))]
    pub groups: Vec<String>,
    /// Present only for users linked to a teacher profile.
    #[serde(flatten)]
    pub teacher: Option<TeacherClaims>,
}

impl LoginResponse {
    /// Attach account attributes to an issued token pair.
    pub fn enrich(
        tokens: TokenPair,
        user: user::Model,
        groups: Vec<String>,
        teacher: Option<TeacherClaims>,
    ) -> Self {
        Self {
            access: tokens.access,
            refresh: tokens.refresh,
            user_id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            groups,
            teacher,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}
