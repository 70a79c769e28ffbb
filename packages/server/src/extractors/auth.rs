use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{self, TokenType};

/// Authenticated user extracted from the `Authorization: Bearer <access token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Staff checks happen via `require_staff()` in the handler body.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl AuthUser {
    /// Staff and superusers manage teacher records, roles and specialties.
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff || self.is_superuser {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Allows staff, or the user acting on their own account.
    pub fn require_self_or_staff(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id {
            return Ok(());
        }
        self.require_staff()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret, TokenType::Access)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                AppError::TokenInvalid
            })?;

        Ok(AuthUser {
            user_id: claims.uid,
            username: claims.sub,
            is_staff: claims.is_staff,
            is_superuser: claims.is_superuser,
        })
    }
}
