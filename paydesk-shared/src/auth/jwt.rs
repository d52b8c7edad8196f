/// JWT access tokens for HR users
///
/// Tokens are HS256-signed and carry the HR user's id, role at login time
/// and a unique token id (`jti`). The `jti` is what logout records in
/// `revoked_tokens`, so a token can be invalidated before it expires.
///
/// # Claims
///
/// - `sub`: HR user id
/// - `iss`: always "paydesk"
/// - `iat`, `nbf`, `exp`: Unix timestamps
/// - `jti`: token id, unique per login
/// - `role`: role when the token was issued (the authoritative role is
///   reloaded on every request)
///
/// # Example
///
/// ```
/// use paydesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use paydesk_shared::models::hr_user::HrRole;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// let secret = "an-example-secret-that-is-long-enough";
/// let claims = Claims::new(Uuid::new_v4(), HrRole::Hr, Duration::hours(8));
/// let token = create_token(&claims, secret).unwrap();
///
/// let decoded = validate_token(&token, secret).unwrap();
/// assert_eq!(decoded.jti, claims.jti);
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::hr_user::HrRole;

/// Issuer written into and required from every token
pub const ISSUER: &str = "paydesk";

/// Default access token lifetime
pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token issuer")]
    InvalidIssuer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub jti: Uuid,
    pub role: HrRole,
}

impl Claims {
    /// Claims for a fresh login valid for `ttl`
    pub fn new(hr_user_id: Uuid, role: HrRole, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: hr_user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4(),
            role,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiry as a timestamp, used to prune revoked tokens
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Signs `claims` with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies signature, issuer, `exp` and `nbf`, returning the claims
///
/// Revocation is not checked here; that needs the database.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
