/// HR authentication endpoints
///
/// # Endpoints
///
/// - `POST /hr/login`: Exchange email and password for a bearer token
/// - `POST /hr/logout`: Revoke the presented token
/// - `GET /hr/me`: The authenticated HR account
///
/// Tokens are stateless JWTs. Logout stores the token id in
/// `revoked_tokens`; the auth layer refuses revoked ids until the token
/// would have expired anyway.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::MessageResponse,
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Duration, Utc};
use paydesk_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{hr_user::HrUser, revoked_token::RevokedToken},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "The password field is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: String,
    pub access_token: String,

    /// Always "Bearer"
    pub token_type: String,

    pub expires_at: DateTime<Utc>,
    pub hr: HrUser,
}

/// Login handler
///
/// # Errors
///
/// - `422`: Malformed email or empty password
/// - `401`: Unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let hr = HrUser::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &hr.password_hash)? {
        tracing::info!(hr_user_id = %hr.id, "Rejected login with wrong password");
        return Err(invalid());
    }

    HrUser::update_last_login(&state.db, hr.id).await?;

    let claims = jwt::Claims::new(hr.id, hr.role, Duration::hours(state.config.jwt.ttl_hours));
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(hr_user_id = %hr.id, role = %hr.role, "HR user logged in");

    Ok(Json(LoginResponse {
        status: "success".to_string(),
        access_token,
        token_type: "Bearer".to_string(),
        expires_at: claims.expires_at(),
        hr,
    }))
}

/// Logout handler
///
/// Revokes only the presented token; other sessions stay valid.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MessageResponse>> {
    RevokedToken::revoke(&state.db, auth.token_id, auth.hr_user_id, auth.expires_at).await?;

    // Opportunistic cleanup; a failure here must not fail the logout
    if let Err(e) = RevokedToken::prune_expired(&state.db).await {
        tracing::warn!(error = %e, "Failed to prune expired revoked tokens");
    }

    tracing::info!(hr_user_id = %auth.hr_user_id, "HR user logged out");

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<HrUser>> {
    let hr = HrUser::find_by_id(&state.db, auth.hr_user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("HR user not found".to_string()))?;

    Ok(Json(hr))
}
