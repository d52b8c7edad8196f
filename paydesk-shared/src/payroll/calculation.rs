//! Pure salary arithmetic.
//!
//! Nothing here touches the database: [`calculate`] takes the employer's
//! schedule, the period's attendance and adjustments, and returns a
//! [`SalaryBreakdown`]. The service layer gathers inputs and persists the
//! result.

use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::adjustment::{AdjustmentKind, ValueType};

/// Days in the reference month used for daily and hourly rates
pub const REFERENCE_DAYS: u32 = 30;

const MINUTES_PER_DAY: i64 = 24 * 60;
const HALF_DAY_MINUTES: i64 = 12 * 60;

/// One adjustment as seen by the calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentEntry {
    pub kind: AdjustmentKind,
    pub value_type: ValueType,
    pub value: Decimal,
}

/// Everything needed to price one employer-month
#[derive(Debug, Clone)]
pub struct PayrollInputs {
    /// Monthly base salary
    pub salary: Decimal,
    pub scheduled_start: NaiveTime,
    pub scheduled_end: NaiveTime,

    /// Working days elapsed in the period after removing holidays
    pub working_days: u32,

    /// Recorded arrival time of every attendance row in the period
    pub arrivals: Vec<NaiveTime>,

    pub adjustments: Vec<AdjustmentEntry>,
}

/// Result of a salary calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryBreakdown {
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
}

/// Length of the scheduled working day in hours
///
/// Schedules crossing midnight (e.g. 22:00 to 06:00) fold back into the
/// shorter arc, so the result is never above 12.
pub fn hours_per_day(start: NaiveTime, end: NaiveTime) -> Decimal {
    let mut minutes = (end - start).num_minutes().abs();
    if minutes > HALF_DAY_MINUTES {
        minutes = MINUTES_PER_DAY - minutes;
    }

    Decimal::from(minutes) / Decimal::from(60)
}

/// `salary / 30`
pub fn daily_rate(salary: Decimal) -> Decimal {
    salary / Decimal::from(REFERENCE_DAYS)
}

/// `salary / (30 × hours_per_day)`, or zero for an empty schedule
pub fn hourly_rate(salary: Decimal, hours_per_day: Decimal) -> Decimal {
    if hours_per_day.is_zero() {
        return Decimal::ZERO;
    }

    salary / (Decimal::from(REFERENCE_DAYS) * hours_per_day)
}

/// Rounds a money amount to cents, midpoint away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate for storage
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Prices one employer-month
pub fn calculate(inputs: &PayrollInputs) -> SalaryBreakdown {
    let hours = hours_per_day(inputs.scheduled_start, inputs.scheduled_end);
    let daily = daily_rate(inputs.salary);
    let hourly = hourly_rate(inputs.salary, hours);

    let attendance_days = inputs.arrivals.len() as u32;
    let absent_days = inputs.working_days.saturating_sub(attendance_days);
    let late_days = inputs
        .arrivals
        .iter()
        .filter(|arrival| **arrival > inputs.scheduled_start)
        .count() as u32;

    let mut addition_hours = Decimal::ZERO;
    let mut addition_money = Decimal::ZERO;
    let mut deduction_hours = Decimal::ZERO;
    let mut deduction_money = Decimal::ZERO;

    for entry in &inputs.adjustments {
        let bucket = match (entry.kind, entry.value_type) {
            (AdjustmentKind::Addition, ValueType::Hours) => &mut addition_hours,
            (AdjustmentKind::Addition, ValueType::Money) => &mut addition_money,
            (AdjustmentKind::Deduction, ValueType::Hours) => &mut deduction_hours,
            (AdjustmentKind::Deduction, ValueType::Money) => &mut deduction_money,
        };
        *bucket += entry.value;
    }

    let total_additions = addition_money + addition_hours * hourly;
    let total_deductions = deduction_money + deduction_hours * hourly;

    let per_day = hours * hourly;
    let worked_salary = Decimal::from(attendance_days) * per_day;
    let absent_deduction = Decimal::from(absent_days) * per_day;

    let final_salary = if attendance_days == 0 {
        Decimal::ZERO
    } else {
        (worked_salary + total_additions - total_deductions - absent_deduction).max(Decimal::ZERO)
    };

    SalaryBreakdown {
        base_salary: round_money(inputs.salary),
        hours_per_day: round_money(hours),
        daily_rate: round_rate(daily),
        hourly_rate: round_rate(hourly),
        attendance_days: attendance_days as i32,
        absent_days: absent_days as i32,
        late_days: late_days as i32,
        addition_hours: round_money(addition_hours),
        addition_money: round_money(addition_money),
        deduction_hours: round_money(deduction_hours),
        deduction_money: round_money(deduction_money),
        total_additions: round_money(total_additions),
        total_deductions: round_money(total_deductions),
        worked_salary: round_money(worked_salary),
        absent_deduction: round_money(absent_deduction),
        final_salary: round_money(final_salary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// 12000/month, 09:00–17:00, 20 attended days, 22 working days
    fn reference_inputs() -> PayrollInputs {
        PayrollInputs {
            salary: dec!(12000),
            scheduled_start: time(9, 0),
            scheduled_end: time(17, 0),
            working_days: 22,
            arrivals: vec![time(9, 0); 20],
            adjustments: Vec::new(),
        }
    }

    #[test]
    fn test_hours_per_day() {
        assert_eq!(hours_per_day(time(9, 0), time(17, 0)), dec!(8));
        assert_eq!(hours_per_day(time(17, 0), time(9, 0)), dec!(8));
        assert_eq!(hours_per_day(time(22, 0), time(6, 0)), dec!(8));
        assert_eq!(hours_per_day(time(8, 30), time(13, 0)), dec!(4.5));
        assert_eq!(hours_per_day(time(9, 0), time(9, 0)), dec!(0));
    }

    #[test]
    fn test_reference_month() {
        let breakdown = calculate(&reference_inputs());

        assert_eq!(breakdown.hours_per_day, dec!(8));
        assert_eq!(breakdown.daily_rate, dec!(400));
        assert_eq!(breakdown.hourly_rate, dec!(50));
        assert_eq!(breakdown.attendance_days, 20);
        assert_eq!(breakdown.absent_days, 2);
        assert_eq!(breakdown.late_days, 0);
        assert_eq!(breakdown.worked_salary, dec!(8000));
        assert_eq!(breakdown.absent_deduction, dec!(800));
        assert_eq!(breakdown.final_salary, dec!(7200));
    }

    #[test]
    fn test_hour_deduction_uses_hourly_rate() {
        let mut inputs = reference_inputs();
        inputs.adjustments.push(AdjustmentEntry {
            kind: AdjustmentKind::Deduction,
            value_type: ValueType::Hours,
            value: dec!(2),
        });

        let breakdown = calculate(&inputs);

        assert_eq!(breakdown.deduction_hours, dec!(2));
        assert_eq!(breakdown.total_deductions, dec!(100));
        assert_eq!(breakdown.final_salary, dec!(7100));
    }

    #[test]
    fn test_additions_and_money_deductions() {
        let mut inputs = reference_inputs();
        inputs.adjustments = vec![
            AdjustmentEntry {
                kind: AdjustmentKind::Addition,
                value_type: ValueType::Hours,
                value: dec!(3),
            },
            AdjustmentEntry {
                kind: AdjustmentKind::Addition,
                value_type: ValueType::Money,
                value: dec!(250),
            },
            AdjustmentEntry {
                kind: AdjustmentKind::Deduction,
                value_type: ValueType::Money,
                value: dec!(75.50),
            },
        ];

        let breakdown = calculate(&inputs);

        assert_eq!(breakdown.addition_hours, dec!(3));
        assert_eq!(breakdown.addition_money, dec!(250));
        assert_eq!(breakdown.total_additions, dec!(400));
        assert_eq!(breakdown.total_deductions, dec!(75.50));
        assert_eq!(breakdown.final_salary, dec!(7524.50));
    }

    #[test]
    fn test_no_attendance_pays_nothing() {
        let mut inputs = reference_inputs();
        inputs.arrivals.clear();
        inputs.adjustments.push(AdjustmentEntry {
            kind: AdjustmentKind::Addition,
            value_type: ValueType::Money,
            value: dec!(1000),
        });

        let breakdown = calculate(&inputs);

        assert_eq!(breakdown.attendance_days, 0);
        assert_eq!(breakdown.absent_days, 22);
        assert_eq!(breakdown.final_salary, dec!(0));
    }

    #[test]
    fn test_final_salary_never_negative() {
        let mut inputs = reference_inputs();
        inputs.arrivals = vec![time(9, 0)];
        inputs.adjustments.push(AdjustmentEntry {
            kind: AdjustmentKind::Deduction,
            value_type: ValueType::Money,
            value: dec!(5000),
        });

        assert_eq!(calculate(&inputs).final_salary, dec!(0));
    }

    #[test]
    fn test_late_days_and_extra_attendance() {
        let mut inputs = reference_inputs();
        inputs.working_days = 3;
        inputs.arrivals = vec![time(9, 0), time(9, 1), time(8, 45), time(10, 30)];

        let breakdown = calculate(&inputs);

        assert_eq!(breakdown.late_days, 2);
        assert_eq!(breakdown.absent_days, 0);
    }

    #[test]
    fn test_empty_schedule_has_zero_rate() {
        let mut inputs = reference_inputs();
        inputs.scheduled_end = inputs.scheduled_start;

        let breakdown = calculate(&inputs);

        assert_eq!(breakdown.hourly_rate, dec!(0));
        assert_eq!(breakdown.final_salary, dec!(0));
    }

    #[test]
    fn test_rates_are_rounded_for_storage() {
        let mut inputs = reference_inputs();
        inputs.salary = dec!(10000);
        inputs.scheduled_end = time(16, 0);

        let breakdown = calculate(&inputs);

        assert_eq!(breakdown.daily_rate, dec!(333.3333));
        assert_eq!(breakdown.hourly_rate, dec!(47.6190));
    }
}
