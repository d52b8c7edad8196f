/// Salary endpoints
///
/// # Endpoints
///
/// - `GET /salary`: Paginated summaries with employer and department names
/// - `POST /salary/calculate`: Reprice one employer-month on demand
/// - `GET /salary/summary/:employer_id`: One employer's history
///
/// # Listing parameters
///
/// `search`, `department_id`, `year`, `month`, `sort_by`,
/// `sort_direction`, `page` (default 1) and `per_page` (1-100, default 15).
/// An unrecognised `sort_by` falls back to `created_at`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{extract::State, Json};
use paydesk_shared::{
    models::{
        employer::Employer,
        salary_summary::{SalaryQuery, SalarySort, SalarySummary, SalarySummaryRow, SortDirection},
    },
    payroll::{recalculate, PayPeriod},
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_PER_PAGE: i64 = 15;
const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct SalaryListParams {
    pub search: Option<String>,
    pub department_id: Option<Uuid>,
    pub year: Option<i32>,
    pub month: Option<i32>,

    /// Kept as text so unknown values fall back instead of failing
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,

    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl SalaryListParams {
    fn into_query(self) -> SalaryQuery {
        SalaryQuery {
            search: self.search,
            department_id: self.department_id,
            year: self.year,
            month: self.month,
            sort_by: parse_or_default::<SalarySort>(self.sort_by.as_deref()),
            sort_direction: parse_or_default::<SortDirection>(self.sort_direction.as_deref()),
            page: self.page.unwrap_or(1).max(1),
            per_page: self
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }
}

/// Parses a snake_case enum name, falling back to the default variant
fn parse_or_default<T: DeserializeOwned + Default>(value: Option<&str>) -> T {
    value
        .and_then(|v| serde_json::from_value(serde_json::Value::String(v.trim().to_lowercase())).ok())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct SalaryPage {
    pub data: Vec<SalarySummaryRow>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub last_page: i64,
}

pub async fn list_salaries(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SalaryListParams>,
) -> ApiResult<Json<SalaryPage>> {
    let query = params.into_query();
    let (data, total) = SalarySummary::list(&state.db, &query).await?;

    Ok(Json(SalaryPage {
        data,
        total,
        page: query.page,
        per_page: query.per_page,
        last_page: last_page(total, query.per_page),
    }))
}

fn last_page(total: i64, per_page: i64) -> i64 {
    ((total + per_page - 1) / per_page).max(1)
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub employer_id: Uuid,

    /// Defaults to the current year
    pub year: Option<i32>,

    /// Defaults to the current month
    pub month: Option<u32>,
}

/// Recalculates one employer-month and returns the stored summary
///
/// # Errors
///
/// - `404`: Unknown employer
/// - `422`: Year outside 2000-2100 or month outside 1-12
pub async fn calculate_salary(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CalculateRequest>,
) -> ApiResult<Json<SalarySummary>> {
    let today = state.today();
    let period = PayPeriod::resolve(req.year, req.month, today)?;

    let summary = recalculate(&state.db, req.employer_id, period, today).await?;

    Ok(Json(summary))
}

/// One row of an employer's salary history
#[derive(Debug, Serialize)]
pub struct SalaryHistoryEntry {
    #[serde(flatten)]
    pub summary: SalarySummary,

    /// "YYYY-MM"
    pub period: String,

    pub month_name: String,

    /// final_salary - base_salary
    pub salary_difference: Decimal,

    /// Percentage of attended days over attended plus absent, 2 dp
    pub attendance_rate: Decimal,
}

impl From<SalarySummary> for SalaryHistoryEntry {
    fn from(summary: SalarySummary) -> Self {
        let (period, month_name) = match summary.period() {
            Some(p) => (p.label(), p.month_name().to_string()),
            None => (format!("{}-{:02}", summary.year, summary.month), String::new()),
        };

        Self {
            period,
            month_name,
            salary_difference: summary.final_salary - summary.base_salary,
            attendance_rate: attendance_rate(summary.attendance_days, summary.absent_days),
            summary,
        }
    }
}

fn attendance_rate(attended: i32, absent: i32) -> Decimal {
    let considered = attended + absent;
    if considered <= 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(attended) * Decimal::ONE_HUNDRED / Decimal::from(considered))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub async fn salary_history(
    State(state): State<AppState>,
    ApiPath(employer_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<SalaryHistoryEntry>>> {
    if Employer::find_by_id(&state.db, employer_id).await?.is_none() {
        return Err(ApiError::NotFound("Employer not found".to_string()));
    }

    let history = SalarySummary::history(&state.db, employer_id)
        .await?
        .into_iter()
        .map(SalaryHistoryEntry::from)
        .collect();

    Ok(Json(history))
}
