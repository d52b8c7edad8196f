/// HR account management
///
/// Any authenticated HR user may list and read accounts. Creating,
/// updating and deleting accounts is limited to super admins, subject to
/// the rules in `paydesk_shared::auth::authorization`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use paydesk_shared::{
    auth::{
        authorization::{authorize_hr_change, require_super_admin, HrChange},
        middleware::AuthContext,
        password,
    },
    models::hr_user::{CreateHrUser, HrRole, HrUser, UpdateHrUser},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHrRequest {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,

    pub password: String,

    /// "hr" or "super admin"
    pub role: HrRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateHrRequest {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "The email must be a valid email address"))]
    pub email: Option<String>,

    pub password: Option<String>,
    pub role: Option<HrRole>,
}

pub async fn list_hrs(State(state): State<AppState>) -> ApiResult<Json<Vec<HrUser>>> {
    Ok(Json(HrUser::list(&state.db).await?))
}

pub async fn get_hr(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<HrUser>> {
    find_hr(&state, id).await.map(Json)
}

/// Creates an HR account (super admin only)
///
/// # Errors
///
/// - `403`: Caller is not a super admin
/// - `422`: Invalid fields or weak password
/// - `400`: Email already in use
pub async fn create_hr(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateHrRequest>,
) -> ApiResult<(StatusCode, Json<HrUser>)> {
    require_super_admin(&auth)?;
    req.validate()?;
    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::invalid("password", message))?;

    let hr = HrUser::create(
        &state.db,
        CreateHrUser {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash: password::hash_password(&req.password)?,
            role: req.role,
        },
    )
    .await?;

    tracing::info!(hr_user_id = %hr.id, role = %hr.role, created_by = %auth.hr_user_id, "HR account created");

    Ok((StatusCode::CREATED, Json(hr)))
}

/// Updates an HR account (super admin only)
///
/// # Errors
///
/// - `403`: Caller is not a super admin, the target is another super
///   admin, or the change would demote the last super admin
/// - `404`: Account does not exist
pub async fn update_hr(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateHrRequest>,
) -> ApiResult<Json<HrUser>> {
    require_super_admin(&auth)?;
    req.validate()?;

    let target = find_hr(&state, id).await?;
    let super_admins = HrUser::count_super_admins(&state.db).await?;
    authorize_hr_change(&auth, &target, HrChange::Update { role: req.role }, super_admins)?;

    let password_hash = match req.password.as_deref() {
        Some(plain) => {
            password::validate_password_strength(plain)
                .map_err(|message| ApiError::invalid("password", message))?;
            Some(password::hash_password(plain)?)
        }
        None => None,
    };

    let hr = HrUser::update(
        &state.db,
        id,
        UpdateHrUser {
            name: req.name.map(|n| n.trim().to_string()),
            email: req.email.map(|e| e.trim().to_string()),
            password_hash,
            role: req.role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("HR user not found".to_string()))?;

    tracing::info!(hr_user_id = %hr.id, updated_by = %auth.hr_user_id, "HR account updated");

    Ok(Json(hr))
}

/// Deletes an HR account (super admin only)
pub async fn delete_hr(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    require_super_admin(&auth)?;

    let target = find_hr(&state, id).await?;
    let super_admins = HrUser::count_super_admins(&state.db).await?;
    authorize_hr_change(&auth, &target, HrChange::Delete, super_admins)?;

    if !HrUser::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("HR user not found".to_string()));
    }

    tracing::info!(hr_user_id = %id, deleted_by = %auth.hr_user_id, "HR account deleted");

    Ok(Json(MessageResponse::new("HR user deleted successfully")))
}

async fn find_hr(state: &AppState, id: Uuid) -> ApiResult<HrUser> {
    HrUser::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("HR user not found".to_string()))
}
