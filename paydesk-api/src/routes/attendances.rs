/// Attendance endpoints
///
/// One row per employer and day. The department is copied from the
/// employer when the row is written. Each write reprices the affected
/// months.

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
        attendance::{Attendance, AttendanceDetail, AttendanceFilter, CreateAttendance},
        employer::Employer,
    },
    payroll::recalculate_touched,
    validation::attendance::validate_attendance,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    pub employer_id: Uuid,
    pub date: NaiveDate,
    pub attendance_time: NaiveTime,
    pub leave_time: Option<NaiveTime>,
}

impl AttendanceRequest {
    /// Validates the record and rejects a second row for the same day
    ///
    /// `except_id` is the row being updated, which may keep its own day.
    async fn into_data(
        self,
        state: &AppState,
        except_id: Option<Uuid>,
    ) -> ApiResult<CreateAttendance> {
        validate_attendance(self.date, self.attendance_time, self.leave_time, state.today())?;

        let employer = Employer::find_by_id(&state.db, self.employer_id)
            .await?
            .ok_or_else(|| {
                ApiError::invalid("employer_id", "The selected employer does not exist")
            })?;

        if Attendance::exists_for_day(&state.db, employer.id, self.date, except_id).await? {
            return Err(duplicate());
        }

        Ok(CreateAttendance {
            employer_id: employer.id,
            department_id: employer.department_id,
            date: self.date,
            attendance_time: self.attendance_time,
            leave_time: self.leave_time,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceListQuery {
    pub employer_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

pub async fn list_attendances(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AttendanceListQuery>,
) -> ApiResult<Json<Vec<AttendanceDetail>>> {
    let filter = AttendanceFilter {
        employer_id: query.employer_id,
        department_id: query.department_id,
        date: query.date,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    Ok(Json(Attendance::list(&state.db, &filter).await?))
}

pub async fn get_attendance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Attendance>> {
    find_attendance(&state, id).await.map(Json)
}

/// Records attendance for a past or current day
///
/// # Errors
///
/// - `422`: Future date, unknown employer, or leave time equal to arrival
/// - `400`: The employer already has attendance on that date
pub async fn create_attendance(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AttendanceRequest>,
) -> ApiResult<(StatusCode, Json<Attendance>)> {
    let data = req.into_data(&state, None).await?;
    let attendance = Attendance::create(&state.db, data).await?;

    recalculate_touched(
        &state.db,
        [(attendance.employer_id, attendance.date)],
        state.today(),
    )
    .await?;

    tracing::info!(
        attendance_id = %attendance.id,
        employer_id = %attendance.employer_id,
        date = %attendance.date,
        "Attendance recorded"
    );

    Ok((StatusCode::CREATED, Json(attendance)))
}

pub async fn update_attendance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AttendanceRequest>,
) -> ApiResult<Json<Attendance>> {
    let previous = find_attendance(&state, id).await?;

    let data = req.into_data(&state, Some(id)).await?;
    let attendance = Attendance::update(&state.db, id, data)
        .await?
        .ok_or_else(not_found)?;

    recalculate_touched(
        &state.db,
        [
            (previous.employer_id, previous.date),
            (attendance.employer_id, attendance.date),
        ],
        state.today(),
    )
    .await?;

    tracing::info!(attendance_id = %attendance.id, "Attendance updated");

    Ok(Json(attendance))
}

pub async fn delete_attendance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let removed = Attendance::delete(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    recalculate_touched(&state.db, [(removed.employer_id, removed.date)], state.today()).await?;

    tracing::info!(attendance_id = %id, employer_id = %removed.employer_id, "Attendance deleted");

    Ok(Json(MessageResponse::new("Attendance deleted successfully")))
}

async fn find_attendance(state: &AppState, id: Uuid) -> ApiResult<Attendance> {
    Attendance::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)
}

fn not_found() -> ApiError {
    ApiError::NotFound("Attendance not found".to_string())
}

fn duplicate() -> ApiError {
    ApiError::Conflict("Attendance for this employer on this date already exists".to_string())
}
