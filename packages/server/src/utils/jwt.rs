use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::entity::user;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: i32,    // User ID
    pub token_type: TokenType,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// A signed access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Sign(jsonwebtoken::errors::Error),
    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("expected a {expected:?} token")]
    WrongType { expected: TokenType },
}

fn sign(
    user: &user::Model,
    token_type: TokenType,
    ttl_secs: i64,
    secret: &str,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: user.username.clone(),
        uid: user.id,
        token_type,
        jti: uuid::Uuid::new_v4().to_string(),
        iat: now,
        exp: now + ttl_secs,
        is_staff: user.is_staff,
        is_superuser: user.is_superuser,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Sign)
}

/// Sign a short-lived access token for a user.
pub fn issue_access(user: &user::Model, auth: &AuthConfig) -> Result<String, TokenError> {
    sign(
        user,
        TokenType::Access,
        auth.access_token_ttl_secs,
        &auth.jwt_secret,
    )
}

/// Sign a fresh access/refresh pair for a user.
pub fn issue_pair(user: &user::Model, auth: &AuthConfig) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access: issue_access(user, auth)?,
        refresh: sign(
            user,
            TokenType::Refresh,
            auth.refresh_token_ttl_secs,
            &auth.jwt_secret,
        )?,
    })
}

/// Verify and decode a JWT token of the expected type.
pub fn verify(token: &str, secret: &str, expected: TokenType) -> Result<Claims, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    if token_data.claims.token_type != expected {
        return Err(TokenError::WrongType { expected });
    }
    Ok(token_data.claims)
}
