//! Adjustment rules

use rust_decimal::Decimal;

use super::{check_amount, check_payroll_year, max_amount, max_hours, FieldErrors};
use crate::models::adjustment::{AdjustmentData, AdjustmentKind, ValueType};
use crate::models::employer::Employer;
use crate::payroll::calculation::{daily_rate, hours_per_day};

/// Longest accepted reason, in characters
pub const MAX_REASON_LENGTH: usize = 255;

/// Checks an adjustment against the employer it applies to
///
/// Values must be positive, with at most two decimals and within the
/// column range. A single deduction may not exceed one day's pay: at most
/// the daily rate for money, at most the scheduled hours per day for
/// hours. The reason is trimmed and must not be blank.
pub fn validate_adjustment(
    mut data: AdjustmentData,
    employer: &Employer,
) -> Result<AdjustmentData, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_payroll_year(&mut errors, "date", data.date);

    if data.value <= Decimal::ZERO {
        errors.add("value", "The value must be greater than 0");
    } else if check_amount(&mut errors, "value", data.value, value_ceiling(data.value_type))
        && data.kind == AdjustmentKind::Deduction
    {
        let (cap, unit) = match data.value_type {
            ValueType::Money => (daily_rate(employer.salary), "the daily salary"),
            ValueType::Hours => (
                hours_per_day(employer.attendance_time, employer.leave_time),
                "the scheduled hours per day",
            ),
        };

        if data.value > cap {
            errors.add(
                "value",
                format!("A deduction cannot exceed {} ({})", unit, cap.round_dp(2)),
            );
        }
    }

    data.reason = data.reason.trim().to_string();
    if data.reason.is_empty() {
        errors.add("reason", "The reason field is required");
    } else if data.reason.chars().count() > MAX_REASON_LENGTH {
        errors.add(
            "reason",
            format!("The reason may not be greater than {MAX_REASON_LENGTH} characters"),
        );
    }

    errors.finish(data)
}

fn value_ceiling(value_type: ValueType) -> Decimal {
    match value_type {
        ValueType::Money => max_amount(),
        ValueType::Hours => max_hours(),
    }
}
