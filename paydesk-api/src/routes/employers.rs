/// Employer endpoints
///
/// # Endpoints
///
/// - `GET /employers?search=&department_id=`: Listing with department names
/// - `POST /employers`, `GET/PUT/DELETE /employers/:id`
/// - `POST /employers/:id/attend`: Clock in now
/// - `POST /employers/:id/leave`: Clock out now
///
/// Changing the salary or schedule of an employer reprices the current
/// month. Deleting one removes its attendance, adjustments and summaries.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{NaiveDate, NaiveTime};
use paydesk_shared::{
    models::{
        attendance::{Attendance, CreateAttendance},
        department::Department,
        employer::{Employer, EmployerData, EmployerFilter, EmployerWithDepartment},
    },
    payroll::{recalculate_touched, service::recalculate_for, PayPeriod},
    validation::{attendance::validate_attendance, employer::validate_employer},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct EmployerRequest {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(email(message = "The email must be a valid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 50, message = "The phone may not be greater than 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 20, message = "The gender may not be greater than 20 characters"))]
    pub gender: Option<String>,

    #[validate(length(max = 100, message = "The nationality may not be greater than 100 characters"))]
    pub nationality: Option<String>,

    #[validate(length(max = 50, message = "The national id may not be greater than 50 characters"))]
    pub national_id: Option<String>,

    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub department_id: Uuid,

    /// Monthly base salary
    pub salary: Decimal,

    /// Scheduled start, "HH:MM" or "HH:MM:SS"
    pub attendance_time: NaiveTime,

    /// Scheduled end
    pub leave_time: NaiveTime,

    pub contract_date: NaiveDate,
}

impl EmployerRequest {
    /// Runs field validation and the employer rules, then checks that the
    /// department exists
    async fn into_data(self, state: &AppState) -> ApiResult<EmployerData> {
        self.validate()?;

        let data = validate_employer(EmployerData {
            name: self.name,
            email: self.email,
            phone: self.phone,
            gender: self.gender,
            nationality: self.nationality,
            national_id: self.national_id,
            birth_date: self.birth_date,
            address: self.address,
            department_id: self.department_id,
            salary: self.salary,
            attendance_time: self.attendance_time,
            leave_time: self.leave_time,
            contract_date: self.contract_date,
        })?;

        if !Department::exists(&state.db, data.department_id).await? {
            return Err(ApiError::invalid(
                "department_id",
                "The selected department does not exist",
            ));
        }

        Ok(data)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployerListQuery {
    pub search: Option<String>,
    pub department_id: Option<Uuid>,
}

pub async fn list_employers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmployerListQuery>,
) -> ApiResult<Json<Vec<EmployerWithDepartment>>> {
    let filter = EmployerFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        department_id: query.department_id,
    };

    Ok(Json(Employer::list(&state.db, &filter).await?))
}

pub async fn get_employer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<EmployerWithDepartment>> {
    Employer::find_with_department(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create_employer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmployerRequest>,
) -> ApiResult<(StatusCode, Json<Employer>)> {
    let data = req.into_data(&state).await?;
    let employer = Employer::create(&state.db, data).await?;

    tracing::info!(employer_id = %employer.id, department_id = %employer.department_id, "Employer created");

    Ok((StatusCode::CREATED, Json(employer)))
}

/// Updates an employer
///
/// When salary or schedule change, the summary for the current month is
/// recomputed before responding. Earlier months keep the figures they were
/// priced with until they are recalculated explicitly.
pub async fn update_employer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<EmployerRequest>,
) -> ApiResult<Json<Employer>> {
    let existing = Employer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    let data = req.into_data(&state).await?;
    let employer = Employer::update(&state.db, id, data)
        .await?
        .ok_or_else(not_found)?;

    if employer.payroll_inputs_changed(&existing) {
        let period = PayPeriod::containing(state.today())?;
        recalculate_for(&state.db, &employer, period, state.today()).await?;
    }

    tracing::info!(employer_id = %employer.id, "Employer updated");

    Ok(Json(employer))
}

pub async fn delete_employer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Employer::delete(&state.db, id).await? {
        return Err(not_found());
    }

    tracing::info!(employer_id = %id, "Employer deleted");

    Ok(Json(MessageResponse::new("Employer deleted successfully")))
}

/// Records today's arrival at the current local time
///
/// # Errors
///
/// - `404`: Employer does not exist
/// - `400`: Attendance for today is already recorded
pub async fn attend(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<(StatusCode, Json<Attendance>)> {
    let employer = Employer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    let today = state.today();
    if Attendance::exists_for_day(&state.db, employer.id, today, None).await? {
        return Err(ApiError::Conflict(
            "Attendance for today is already recorded".to_string(),
        ));
    }

    let attendance = Attendance::create(
        &state.db,
        CreateAttendance {
            employer_id: employer.id,
            department_id: employer.department_id,
            date: today,
            attendance_time: state.now_time(),
            leave_time: None,
        },
    )
    .await?;

    recalculate_touched(&state.db, [(employer.id, today)], today).await?;

    tracing::info!(
        employer_id = %employer.id,
        attendance_time = %attendance.attendance_time,
        "Employer clocked in"
    );

    Ok((StatusCode::CREATED, Json(attendance)))
}

/// Records today's leave time at the current local time
///
/// # Errors
///
/// - `404`: Employer does not exist or has not attended today
/// - `400`: Leave time for today is already recorded
pub async fn leave(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Attendance>> {
    let employer = Employer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    let today = state.today();
    let attendance = Attendance::find_for_day(&state.db, employer.id, today)
        .await?
        .ok_or_else(|| ApiError::NotFound("No attendance recorded for today".to_string()))?;

    if attendance.leave_time.is_some() {
        return Err(ApiError::Conflict(
            "Leave time for today is already recorded".to_string(),
        ));
    }

    let now = state.now_time();
    validate_attendance(attendance.date, attendance.attendance_time, Some(now), today)?;

    let attendance = Attendance::set_leave_time(&state.db, attendance.id, now)
        .await?
        .ok_or_else(|| ApiError::NotFound("No attendance recorded for today".to_string()))?;

    recalculate_touched(&state.db, [(employer.id, today)], today).await?;

    tracing::info!(employer_id = %employer.id, leave_time = %now, "Employer clocked out");

    Ok(Json(attendance))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Employer not found".to_string())
}
