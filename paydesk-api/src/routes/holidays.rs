/// Holiday calendar endpoints
///
/// At most one holiday exists per date. Official holidays need a name;
/// weekly rest days never keep one. Holiday dates are not counted as
/// working days when salaries are priced.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use paydesk_shared::{
    models::holiday::{Holiday, HolidayData, HolidayType},
    validation::holiday::validate_holiday,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct HolidayRequest {
    /// Weekday label; defaults to the weekday of `date`
    #[validate(length(max = 20, message = "The day may not be greater than 20 characters"))]
    pub day: Option<String>,

    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub holiday_type: HolidayType,

    #[validate(length(max = 255, message = "The name may not be greater than 255 characters"))]
    pub name: Option<String>,
}

impl HolidayRequest {
    async fn into_data(self, state: &AppState, except_id: Option<Uuid>) -> ApiResult<HolidayData> {
        self.validate()?;

        let data = validate_holiday(
            self.date,
            self.holiday_type,
            self.name.as_deref(),
            self.day.as_deref(),
        )?;

        if Holiday::date_taken(&state.db, data.date, except_id).await? {
            return Err(ApiError::Conflict(
                "A holiday already exists on this date".to_string(),
            ));
        }

        Ok(data)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HolidayListQuery {
    pub year: Option<i32>,
}

pub async fn list_holidays(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<HolidayListQuery>,
) -> ApiResult<Json<Vec<Holiday>>> {
    Ok(Json(Holiday::list(&state.db, query.year).await?))
}

pub async fn get_holiday(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Holiday>> {
    Holiday::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Creates a holiday
///
/// # Errors
///
/// - `422`: Official holiday without a name, or invalid date
/// - `400`: Another holiday already uses the date
pub async fn create_holiday(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<HolidayRequest>,
) -> ApiResult<(StatusCode, Json<Holiday>)> {
    let data = req.into_data(&state, None).await?;
    let holiday = Holiday::create(&state.db, data).await?;

    tracing::info!(holiday_id = %holiday.id, date = %holiday.date, "Holiday created");

    Ok((StatusCode::CREATED, Json(holiday)))
}

pub async fn update_holiday(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<HolidayRequest>,
) -> ApiResult<Json<Holiday>> {
    let data = req.into_data(&state, Some(id)).await?;
    let holiday = Holiday::update(&state.db, id, data)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(holiday_id = %holiday.id, date = %holiday.date, "Holiday updated");

    Ok(Json(holiday))
}

pub async fn delete_holiday(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Holiday::delete(&state.db, id).await? {
        return Err(not_found());
    }

    tracing::info!(holiday_id = %id, "Holiday deleted");

    Ok(Json(MessageResponse::new("Holiday deleted successfully")))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Holiday not found".to_string())
}
