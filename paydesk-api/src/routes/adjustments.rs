/// Salary adjustment endpoints
///
/// Additions and deductions are either money or hours. Every write
/// reprices the months it touches; an update that moves an adjustment to
/// another employer or month reprices both the old and the new month.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use paydesk_shared::{
    models::{
        adjustment::{
            Adjustment, AdjustmentData, AdjustmentDetail, AdjustmentFilter, AdjustmentKind,
            ValueType,
        },
        employer::Employer,
    },
    payroll::recalculate_touched,
    validation::adjustment::validate_adjustment,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub employer_id: Uuid,
    pub date: NaiveDate,
    pub value: Decimal,

    /// "money" or "hours"
    pub value_type: ValueType,

    /// "addition" or "deduction"
    pub kind: AdjustmentKind,

    pub reason: String,
}

impl AdjustmentRequest {
    async fn into_data(self, state: &AppState) -> ApiResult<AdjustmentData> {
        let employer = Employer::find_by_id(&state.db, self.employer_id)
            .await?
            .ok_or_else(|| {
                ApiError::invalid("employer_id", "The selected employer does not exist")
            })?;

        let data = validate_adjustment(
            AdjustmentData {
                employer_id: self.employer_id,
                date: self.date,
                value: self.value,
                value_type: self.value_type,
                kind: self.kind,
                reason: self.reason,
            },
            &employer,
        )?;

        Ok(data)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdjustmentListQuery {
    pub employer_id: Option<Uuid>,
    pub kind: Option<AdjustmentKind>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

pub async fn list_adjustments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AdjustmentListQuery>,
) -> ApiResult<Json<Vec<AdjustmentDetail>>> {
    let filter = AdjustmentFilter {
        employer_id: query.employer_id,
        kind: query.kind,
        year: query.year,
        month: query.month,
    };

    Ok(Json(Adjustment::list(&state.db, &filter).await?))
}

pub async fn get_adjustment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Adjustment>> {
    find_adjustment(&state, id).await.map(Json)
}

/// Creates an adjustment and reprices its month
///
/// # Errors
///
/// - `422`: Unknown employer, non-positive value, missing reason, or a
///   deduction larger than one day's pay
pub async fn create_adjustment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AdjustmentRequest>,
) -> ApiResult<(StatusCode, Json<Adjustment>)> {
    let data = req.into_data(&state).await?;
    let adjustment = Adjustment::create(&state.db, data).await?;

    recalculate_touched(
        &state.db,
        [(adjustment.employer_id, adjustment.date)],
        state.today(),
    )
    .await?;

    tracing::info!(
        adjustment_id = %adjustment.id,
        employer_id = %adjustment.employer_id,
        kind = ?adjustment.kind,
        value = %adjustment.value,
        "Adjustment created"
    );

    Ok((StatusCode::CREATED, Json(adjustment)))
}

pub async fn update_adjustment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AdjustmentRequest>,
) -> ApiResult<Json<Adjustment>> {
    let previous = find_adjustment(&state, id).await?;

    let data = req.into_data(&state).await?;
    let adjustment = Adjustment::update(&state.db, id, data)
        .await?
        .ok_or_else(not_found)?;

    recalculate_touched(
        &state.db,
        [
            (previous.employer_id, previous.date),
            (adjustment.employer_id, adjustment.date),
        ],
        state.today(),
    )
    .await?;

    tracing::info!(adjustment_id = %adjustment.id, "Adjustment updated");

    Ok(Json(adjustment))
}

pub async fn delete_adjustment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let removed = Adjustment::delete(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    recalculate_touched(&state.db, [(removed.employer_id, removed.date)], state.today()).await?;

    tracing::info!(adjustment_id = %id, employer_id = %removed.employer_id, "Adjustment deleted");

    Ok(Json(MessageResponse::new("Adjustment deleted successfully")))
}

async fn find_adjustment(state: &AppState, id: Uuid) -> ApiResult<Adjustment> {
    Adjustment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)
}

fn not_found() -> ApiError {
    ApiError::NotFound("Adjustment not found".to_string())
}
