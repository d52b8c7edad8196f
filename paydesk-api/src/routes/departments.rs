/// Department endpoints
///
/// Departments are mostly read: listings carry the number of employers
/// in each. A department that still has employers cannot be deleted.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use paydesk_shared::models::department::{Department, DepartmentWithCount};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct DepartmentRequest {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: String,
}

impl DepartmentRequest {
    fn checked_name(&self) -> ApiResult<&str> {
        self.validate()?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::invalid("name", "The name field is required"));
        }

        Ok(name)
    }
}

pub async fn list_departments(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DepartmentWithCount>>> {
    Ok(Json(Department::list_with_counts(&state.db).await?))
}

pub async fn get_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Department>> {
    Department::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DepartmentRequest>,
) -> ApiResult<(StatusCode, Json<Department>)> {
    let department = Department::create(&state.db, req.checked_name()?).await?;

    tracing::info!(department_id = %department.id, name = %department.name, "Department created");

    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn update_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<DepartmentRequest>,
) -> ApiResult<Json<Department>> {
    Department::rename(&state.db, id, req.checked_name()?)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Deletes an empty department
///
/// # Errors
///
/// - `400`: Employers still belong to the department
/// - `404`: Department does not exist
pub async fn delete_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    match Department::delete(&state.db, id).await {
        Ok(true) => {}
        Ok(false) => return Err(not_found()),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            return Err(ApiError::Conflict(
                "The department still has employers and cannot be deleted".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(department_id = %id, "Department deleted");

    Ok(Json(MessageResponse::new("Department deleted successfully")))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Department not found".to_string())
}
