/// Salary summary model
///
/// A salary summary is the persisted result of pricing one employer-month.
/// It is derived data: every write goes through [`SalarySummary::upsert`],
/// which replaces the row for (employer, year, month) instead of adding a
/// second one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE salary_summaries (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     employer_id UUID NOT NULL REFERENCES employers(id) ON DELETE CASCADE,
///     year INTEGER NOT NULL CHECK (year BETWEEN 2000 AND 2100),
///     month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
///     base_salary NUMERIC(12, 2) NOT NULL,
///     hours_per_day NUMERIC(8, 2) NOT NULL,
///     daily_rate NUMERIC(14, 4) NOT NULL,
///     hourly_rate NUMERIC(14, 4) NOT NULL,
///     attendance_days INTEGER NOT NULL,
///     absent_days INTEGER NOT NULL,
///     late_days INTEGER NOT NULL,
///     addition_hours NUMERIC(8, 2) NOT NULL,
///     addition_money NUMERIC(12, 2) NOT NULL,
///     deduction_hours NUMERIC(8, 2) NOT NULL,
///     deduction_money NUMERIC(12, 2) NOT NULL,
///     total_additions NUMERIC(12, 2) NOT NULL,
///     total_deductions NUMERIC(12, 2) NOT NULL,
///     worked_salary NUMERIC(12, 2) NOT NULL,
///     absent_deduction NUMERIC(12, 2) NOT NULL,
///     final_salary NUMERIC(12, 2) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (employer_id, year, month)
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::payroll::{PayPeriod, SalaryBreakdown};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalarySummary {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub base_salary: Decimal,
    pub hours_per_day: Decimal,
    pub daily_rate: Decimal,
    pub hourly_rate: Decimal,
    pub attendance_days: i32,
    pub absent_days: i32,
    pub late_days: i32,
    pub addition_hours: Decimal,
    pub addition_money: Decimal,
    pub deduction_hours: Decimal,
    pub deduction_money: Decimal,
    pub total_additions: Decimal,
    pub total_deductions: Decimal,
    pub worked_salary: Decimal,
    pub absent_deduction: Decimal,
    pub final_salary: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary joined with employer and department names for listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalarySummaryRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub summary: SalarySummary,
    pub employer_name: String,
    pub department_id: Uuid,
    pub department_name: String,
}

/// Sortable columns of the salary listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalarySort {
    EmployerName,
    FinalSalary,
    Year,
    Month,
    AttendanceDays,
    AbsentDays,
    LateDays,
    #[default]
    CreatedAt,
}

impl SalarySort {
    fn column(self) -> &'static str {
        match self {
            SalarySort::EmployerName => "e.name",
            SalarySort::FinalSalary => "s.final_salary",
            SalarySort::Year => "s.year",
            SalarySort::Month => "s.month",
            SalarySort::AttendanceDays => "s.attendance_days",
            SalarySort::AbsentDays => "s.absent_days",
            SalarySort::LateDays => "s.late_days",
            SalarySort::CreatedAt => "s.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Filters, ordering and paging for [`SalarySummary::list`]
#[derive(Debug, Clone)]
pub struct SalaryQuery {
    /// Case-insensitive match on the employer name
    pub search: Option<String>,
    pub department_id: Option<Uuid>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub sort_by: SalarySort,
    pub sort_direction: SortDirection,

    /// 1-based page number
    pub page: i64,
    pub per_page: i64,
}

impl SalaryQuery {
    /// Rows skipped before the requested page, saturating for huge pages
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.per_page.max(0))
    }
}

impl Default for SalaryQuery {
    fn default() -> Self {
        Self {
            search: None,
            department_id: None,
            year: None,
            month: None,
            sort_by: SalarySort::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            per_page: 15,
        }
    }
}

const SUMMARY_COLUMNS: &str = "s.id, s.employer_id, s.year, s.month, s.base_salary, \
     s.hours_per_day, s.daily_rate, s.hourly_rate, s.attendance_days, s.absent_days, \
     s.late_days, s.addition_hours, s.addition_money, s.deduction_hours, s.deduction_money, \
     s.total_additions, s.total_deductions, s.worked_salary, s.absent_deduction, \
     s.final_salary, s.created_at, s.updated_at";

impl SalarySummary {
    /// Writes the breakdown for one employer-month, replacing any existing row
    ///
    /// The row keeps its id and `created_at` across recalculations.
    pub async fn upsert(
        pool: &PgPool,
        employer_id: Uuid,
        period: PayPeriod,
        breakdown: &SalaryBreakdown,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SalarySummary>(&format!(
            r#"
            INSERT INTO salary_summaries AS s (
                employer_id, year, month, base_salary, hours_per_day, daily_rate, hourly_rate,
                attendance_days, absent_days, late_days, addition_hours, addition_money,
                deduction_hours, deduction_money, total_additions, total_deductions,
                worked_salary, absent_deduction, final_salary
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            ON CONFLICT (employer_id, year, month) DO UPDATE SET
                base_salary = EXCLUDED.base_salary,
                hours_per_day = EXCLUDED.hours_per_day,
                daily_rate = EXCLUDED.daily_rate,
                hourly_rate = EXCLUDED.hourly_rate,
                attendance_days = EXCLUDED.attendance_days,
                absent_days = EXCLUDED.absent_days,
                late_days = EXCLUDED.late_days,
                addition_hours = EXCLUDED.addition_hours,
                addition_money = EXCLUDED.addition_money,
                deduction_hours = EXCLUDED.deduction_hours,
                deduction_money = EXCLUDED.deduction_money,
                total_additions = EXCLUDED.total_additions,
                total_deductions = EXCLUDED.total_deductions,
                worked_salary = EXCLUDED.worked_salary,
                absent_deduction = EXCLUDED.absent_deduction,
                final_salary = EXCLUDED.final_salary,
                updated_at = NOW()
            RETURNING {SUMMARY_COLUMNS}
            "#
        ))
        .bind(employer_id)
        .bind(period.year())
        .bind(period.month() as i32)
        .bind(breakdown.base_salary)
        .bind(breakdown.hours_per_day)
        .bind(breakdown.daily_rate)
        .bind(breakdown.hourly_rate)
        .bind(breakdown.attendance_days)
        .bind(breakdown.absent_days)
        .bind(breakdown.late_days)
        .bind(breakdown.addition_hours)
        .bind(breakdown.addition_money)
        .bind(breakdown.deduction_hours)
        .bind(breakdown.deduction_money)
        .bind(breakdown.total_additions)
        .bind(breakdown.total_deductions)
        .bind(breakdown.worked_salary)
        .bind(breakdown.absent_deduction)
        .bind(breakdown.final_salary)
        .fetch_one(pool)
        .await
    }

    pub async fn find_for_period(
        pool: &PgPool,
        employer_id: Uuid,
        period: PayPeriod,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SalarySummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM salary_summaries s
             WHERE s.employer_id = $1 AND s.year = $2 AND s.month = $3"
        ))
        .bind(employer_id)
        .bind(period.year())
        .bind(period.month() as i32)
        .fetch_optional(pool)
        .await
    }

    /// Every summary of one employer, newest period first
    pub async fn history(pool: &PgPool, employer_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SalarySummary>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM salary_summaries s
             WHERE s.employer_id = $1
             ORDER BY s.year DESC, s.month DESC"
        ))
        .bind(employer_id)
        .fetch_all(pool)
        .await
    }

    /// Filtered, sorted, paginated listing
    ///
    /// Returns the page of rows and the total number of matching rows.
    pub async fn list(
        pool: &PgPool,
        query: &SalaryQuery,
    ) -> Result<(Vec<SalarySummaryRow>, i64), sqlx::Error> {
        let mut count: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM salary_summaries s JOIN employers e ON e.id = s.employer_id",
        );
        push_filters(&mut count, query);

        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        let mut select: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SUMMARY_COLUMNS}, e.name AS employer_name, e.department_id,
                    d.name AS department_name
             FROM salary_summaries s
             JOIN employers e ON e.id = s.employer_id
             JOIN departments d ON d.id = e.department_id"
        ));
        push_filters(&mut select, query);

        // Column and direction come from closed enums, never from input text
        select
            .push(" ORDER BY ")
            .push(query.sort_by.column())
            .push(" ")
            .push(query.sort_direction.keyword())
            .push(", s.id");

        select
            .push(" LIMIT ")
            .push_bind(query.per_page)
            .push(" OFFSET ")
            .push_bind(query.offset());

        let rows = select
            .build_query_as::<SalarySummaryRow>()
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    /// Sum of final salaries for one period
    pub async fn total_for_period(pool: &PgPool, period: PayPeriod) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(final_salary), 0) FROM salary_summaries WHERE year = $1 AND month = $2",
        )
        .bind(period.year())
        .bind(period.month() as i32)
        .fetch_one(pool)
        .await
    }

    /// Period of this summary
    pub fn period(&self) -> Option<PayPeriod> {
        PayPeriod::new(self.year, self.month as u32).ok()
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SalaryQuery) {
    builder.push(" WHERE 1 = 1");

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND e.name ILIKE ")
            .push_bind(format!("%{}%", search.trim()));
    }
    if let Some(department_id) = query.department_id {
        builder.push(" AND e.department_id = ").push_bind(department_id);
    }
    if let Some(year) = query.year {
        builder.push(" AND s.year = ").push_bind(year);
    }
    if let Some(month) = query.month {
        builder.push(" AND s.month = ").push_bind(month);
    }
}
