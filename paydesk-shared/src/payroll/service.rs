//! Database-backed salary recalculation

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::calculation::{calculate, AdjustmentEntry, PayrollInputs};
use super::{PayPeriod, PayrollError};
use crate::models::adjustment::Adjustment;
use crate::models::attendance::Attendance;
use crate::models::employer::Employer;
use crate::models::holiday::Holiday;
use crate::models::salary_summary::SalarySummary;

/// Reprices one employer-month and upserts its summary
///
/// `today` decides how much of the period has elapsed: absences are only
/// counted up to it.
///
/// # Errors
///
/// - [`PayrollError::EmployerNotFound`] when the employer does not exist
/// - [`PayrollError::Database`] on any query failure
pub async fn recalculate(
    pool: &PgPool,
    employer_id: Uuid,
    period: PayPeriod,
    today: NaiveDate,
) -> Result<SalarySummary, PayrollError> {
    let employer = Employer::find_by_id(pool, employer_id)
        .await?
        .ok_or(PayrollError::EmployerNotFound(employer_id))?;

    recalculate_for(pool, &employer, period, today).await
}

/// Same as [`recalculate`] for an employer already loaded
pub async fn recalculate_for(
    pool: &PgPool,
    employer: &Employer,
    period: PayPeriod,
    today: NaiveDate,
) -> Result<SalarySummary, PayrollError> {
    let (from, to) = (period.first_day(), period.last_day());

    let attendance = Attendance::list_for_period(pool, employer.id, from, to).await?;
    let adjustments = Adjustment::list_for_period(pool, employer.id, from, to).await?;
    let holidays = Holiday::dates_between(pool, from, to).await?;

    let inputs = PayrollInputs {
        salary: employer.salary,
        scheduled_start: employer.attendance_time,
        scheduled_end: employer.leave_time,
        working_days: period.working_days(&holidays, today),
        arrivals: attendance.iter().map(|a| a.attendance_time).collect(),
        adjustments: adjustments
            .iter()
            .map(|a| AdjustmentEntry {
                kind: a.kind,
                value_type: a.value_type,
                value: a.value,
            })
            .collect(),
    };

    debug!(
        employer_id = %employer.id,
        period = %period,
        working_days = inputs.working_days,
        attendance_rows = inputs.arrivals.len(),
        adjustments = inputs.adjustments.len(),
        "Pricing payroll period"
    );

    let breakdown = calculate(&inputs);
    let summary = SalarySummary::upsert(pool, employer.id, period, &breakdown).await?;

    info!(
        employer_id = %employer.id,
        period = %period,
        final_salary = %summary.final_salary,
        "Salary summary updated"
    );

    Ok(summary)
}

/// Reprices every distinct (employer, month) bucket touched by a write
///
/// Each `(employer_id, date)` pair names a row that was created, changed or
/// removed. Buckets are deduplicated so an update that moves a row within
/// the same month is priced once. Employers that no longer exist are
/// skipped.
pub async fn recalculate_touched<I>(
    pool: &PgPool,
    touched: I,
    today: NaiveDate,
) -> Result<Vec<SalarySummary>, PayrollError>
where
    I: IntoIterator<Item = (Uuid, NaiveDate)>,
{
    let buckets = touched
        .into_iter()
        .map(|(employer_id, date)| PayPeriod::containing(date).map(|p| (employer_id, p)))
        .collect::<Result<BTreeSet<_>, _>>()?;

    let mut summaries = Vec::with_capacity(buckets.len());
    for (employer_id, period) in buckets {
        match recalculate(pool, employer_id, period, today).await {
            Ok(summary) => summaries.push(summary),
            Err(PayrollError::EmployerNotFound(id)) => {
                debug!(employer_id = %id, "Skipping recalculation for removed employer");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summaries)
}
