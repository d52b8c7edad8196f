/// Dashboard endpoints
///
/// Read-only aggregates for the landing page. `GET /dashboard` returns
/// every section at once; the other routes return one section each.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use chrono::{Duration, NaiveDate};
use paydesk_shared::{
    models::{
        attendance::{Attendance, AttendanceDetail, AttendanceFilter},
        department::{Department, DepartmentWithCount},
        employer::{Employer, EmployerWithDepartment},
        holiday::Holiday,
        hr_user::HrUser,
        salary_summary::SalarySummary,
    },
    payroll::PayPeriod,
};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

/// Days ahead counted as "upcoming" in the stats
const UPCOMING_WINDOW_DAYS: i64 = 30;
const UPCOMING_HOLIDAYS_LIMIT: i64 = 10;
const RECENT_EMPLOYERS_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub employers: i64,
    pub departments: i64,
    pub hrs: i64,
    pub attendance_today: i64,
    pub absent_today: i64,
    pub late_today: i64,
    pub upcoming_holidays: i64,

    /// "YYYY-MM" of the payroll total
    pub payroll_period: String,
    pub payroll_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct EmployersOverview {
    pub departments: Vec<DepartmentWithCount>,
    pub recent: Vec<EmployerWithDepartment>,
}

#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    pub employers: EmployersOverview,
    pub attendance_today: Vec<AttendanceDetail>,
    pub upcoming_holidays: Vec<Holiday>,
}

pub async fn overview(State(state): State<AppState>) -> ApiResult<Json<DashboardOverview>> {
    let today = state.today();

    let (stats, employers, attendance_today, upcoming_holidays) = tokio::try_join!(
        load_stats(&state.db, today),
        load_employers(&state.db),
        load_attendance(&state.db, today),
        load_upcoming(&state.db, today),
    )?;

    Ok(Json(DashboardOverview {
        stats,
        employers,
        attendance_today,
        upcoming_holidays,
    }))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(load_stats(&state.db, state.today()).await?))
}

pub async fn employers(State(state): State<AppState>) -> ApiResult<Json<EmployersOverview>> {
    Ok(Json(load_employers(&state.db).await?))
}

pub async fn attendance_today(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AttendanceDetail>>> {
    Ok(Json(load_attendance(&state.db, state.today()).await?))
}

pub async fn upcoming_holidays(State(state): State<AppState>) -> ApiResult<Json<Vec<Holiday>>> {
    Ok(Json(load_upcoming(&state.db, state.today()).await?))
}

async fn load_stats(pool: &PgPool, today: NaiveDate) -> ApiResult<DashboardStats> {
    let period = PayPeriod::containing(today)?;

    let day = Attendance::day_counts(pool, today).await?;
    let upcoming =
        Holiday::count_between(pool, today, today + Duration::days(UPCOMING_WINDOW_DAYS)).await?;

    Ok(DashboardStats {
        employers: Employer::count(pool).await?,
        departments: Department::count(pool).await?,
        hrs: HrUser::count(pool).await?,
        attendance_today: day.present,
        absent_today: day.absent,
        late_today: day.late,
        upcoming_holidays: upcoming,
        payroll_period: period.label(),
        payroll_total: SalarySummary::total_for_period(pool, period).await?,
    })
}

async fn load_employers(pool: &PgPool) -> ApiResult<EmployersOverview> {
    Ok(EmployersOverview {
        departments: Department::list_with_counts(pool).await?,
        recent: Employer::recent(pool, RECENT_EMPLOYERS_LIMIT).await?,
    })
}

async fn load_attendance(pool: &PgPool, today: NaiveDate) -> ApiResult<Vec<AttendanceDetail>> {
    let filter = AttendanceFilter {
        date: Some(today),
        ..Default::default()
    };

    Ok(Attendance::list(pool, &filter).await?)
}

async fn load_upcoming(pool: &PgPool, today: NaiveDate) -> ApiResult<Vec<Holiday>> {
    Ok(Holiday::upcoming(pool, today, UPCOMING_HOLIDAYS_LIMIT).await?)
}
