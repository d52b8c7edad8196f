//! Holiday naming rules

use chrono::NaiveDate;

use super::{check_payroll_year, FieldErrors};
use crate::models::holiday::{HolidayData, HolidayType};

/// Normalizes a submitted holiday
///
/// Official holidays must carry a non-blank name. Weekly holidays never
/// store one, even when it was submitted. A missing `day` defaults to the
/// English weekday name of `date`.
pub fn validate_holiday(
    date: NaiveDate,
    holiday_type: HolidayType,
    name: Option<&str>,
    day: Option<&str>,
) -> Result<HolidayData, FieldErrors> {
    let mut errors = FieldErrors::new();
    check_payroll_year(&mut errors, "date", date);

    let name = match holiday_type {
        HolidayType::Weekly => None,
        HolidayType::Official => {
            let trimmed = name.map(str::trim).filter(|n| !n.is_empty());
            if trimmed.is_none() {
                errors.add("name", "The name field is required for official holidays");
            }
            trimmed.map(str::to_string)
        }
    };

    let day = day
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| weekday_name(date));

    errors.finish(HolidayData {
        day,
        date,
        holiday_type,
        name,
    })
}

/// English weekday name, e.g. "Friday"
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_holiday_drops_name() {
        let data = validate_holiday(
            date(2024, 3, 1),
            HolidayType::Weekly,
            Some("Ignored"),
            None,
        )
        .unwrap();

        assert_eq!(data.name, None);
        assert_eq!(data.day, "Friday");
    }

    #[test]
    fn test_official_holiday_requires_name() {
        let err = validate_holiday(date(2024, 12, 25), HolidayType::Official, Some("  "), None)
            .unwrap_err();
        let errors = err.into_inner();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");

        assert!(validate_holiday(date(2024, 12, 25), HolidayType::Official, None, None).is_err());
    }

    #[test]
    fn test_official_holiday_keeps_trimmed_name() {
        let data = validate_holiday(
            date(2024, 12, 25),
            HolidayType::Official,
            Some(" Christmas "),
            Some("Wednesday"),
        )
        .unwrap();

        assert_eq!(data.name.as_deref(), Some("Christmas"));
        assert_eq!(data.day, "Wednesday");
        assert_eq!(data.holiday_type, HolidayType::Official);
    }

    #[test]
    fn test_rejects_dates_outside_payroll_years() {
        assert!(validate_holiday(date(1999, 1, 1), HolidayType::Weekly, None, None).is_err());
    }
}
