//! Attendance rules
//!
//! The one-row-per-day rule needs the database and is checked by the
//! handlers, backed by the `attendances_employer_date_key` constraint.

use chrono::{NaiveDate, NaiveTime};

use super::{check_payroll_year, FieldErrors};

/// Checks the date and times of an attendance record
///
/// The date may not lie after `today`, and a recorded leave time must
/// differ from the arrival time.
pub fn validate_attendance(
    date: NaiveDate,
    attendance_time: NaiveTime,
    leave_time: Option<NaiveTime>,
    today: NaiveDate,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    check_payroll_year(&mut errors, "date", date);
    if date > today {
        errors.add("date", "The date cannot be in the future");
    }

    if leave_time == Some(attendance_time) {
        errors.add(
            "leave_time",
            "The leave time must be different from the attendance time",
        );
    }

    errors.finish(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_accepts_open_and_closed_days() {
        assert!(validate_attendance(today(), time(9, 5), None, today()).is_ok());
        assert!(validate_attendance(today(), time(9, 5), Some(time(17, 0)), today()).is_ok());
    }

    #[test]
    fn test_rejects_future_dates() {
        let tomorrow = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let errors = validate_attendance(tomorrow, time(9, 0), None, today())
            .unwrap_err()
            .into_inner();
        assert_eq!(errors[0].field, "date");
    }

    #[test]
    fn test_rejects_equal_times() {
        let errors = validate_attendance(today(), time(9, 0), Some(time(9, 0)), today())
            .unwrap_err()
            .into_inner();
        assert_eq!(errors[0].field, "leave_time");
    }
}
