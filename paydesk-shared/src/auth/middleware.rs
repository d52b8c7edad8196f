/// Request authentication
///
/// [`authenticate`] turns an `Authorization: Bearer <jwt>` header into an
/// [`AuthContext`]. Besides the signature and expiry checks it rejects
/// tokens revoked by logout and tokens whose HR account no longer exists.
/// The role is read from the database on every request, so a demotion
/// takes effect immediately.
///
/// The API crate wraps this in an axum middleware that stores the context
/// in request extensions; handlers read it with `Extension<AuthContext>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::hr_user::{HrRole, HrUser};
use crate::models::revoked_token::RevokedToken;

/// The authenticated HR user behind a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthContext {
    pub hr_user_id: Uuid,

    /// Current role, reloaded from the database
    pub role: HrRole,

    /// `jti` of the presented token
    pub token_id: Uuid,

    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("Token has been revoked")]
    Revoked,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

/// Extracts the token from an `Authorization` header value
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Authenticates a request from its `Authorization` header
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] without a header
/// - [`AuthError::InvalidFormat`] when the header is not a bearer token
/// - [`AuthError::InvalidToken`] for bad, expired or orphaned tokens
/// - [`AuthError::Revoked`] after logout
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    authorization: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let header = authorization.ok_or(AuthError::MissingCredentials)?;
    let token = bearer_token(header)?;
    let claims = validate_token(token, secret)?;

    if RevokedToken::is_revoked(pool, claims.jti).await? {
        return Err(AuthError::Revoked);
    }

    let hr_user = HrUser::find_by_id(pool, claims.sub)
        .await?
        .ok_or_else(|| AuthError::InvalidToken("Account no longer exists".to_string()))?;

    Ok(AuthContext {
        hr_user_id: hr_user.id,
        role: hr_user.role,
        token_id: claims.jti,
        expires_at: claims.expires_at(),
    })
}
