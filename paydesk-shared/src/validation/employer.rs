//! Employer rules

use rust_decimal::Decimal;

use super::{check_amount, max_amount, FieldErrors};
use crate::models::employer::EmployerData;

/// Checks an employer record before it is written
///
/// Text fields are trimmed and blank optional fields become `None`. The
/// salary must be positive and the working window must not be empty.
/// Whether the department exists is left to the caller.
pub fn validate_employer(mut data: EmployerData) -> Result<EmployerData, FieldErrors> {
    let mut errors = FieldErrors::new();

    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        errors.add("name", "The name field is required");
    }

    for field in [
        &mut data.email,
        &mut data.phone,
        &mut data.gender,
        &mut data.nationality,
        &mut data.national_id,
        &mut data.address,
    ] {
        *field = field
            .take()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }
    data.email = data.email.map(|e| e.to_lowercase());

    if data.salary <= Decimal::ZERO {
        errors.add("salary", "The salary must be greater than 0");
    } else {
        check_amount(&mut errors, "salary", data.salary, max_amount());
    }

    if data.attendance_time == data.leave_time {
        errors.add(
            "leave_time",
            "The leave time must be different from the attendance time",
        );
    }

    if let Some(birth_date) = data.birth_date {
        if birth_date >= data.contract_date {
            errors.add("birth_date", "The birth date must be before the contract date");
        }
    }

    errors.finish(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn data() -> EmployerData {
        EmployerData {
            name: "  Omar Hassan ".to_string(),
            email: Some(" Omar@Example.com ".to_string()),
            phone: Some("".to_string()),
            gender: Some("male".to_string()),
            nationality: None,
            national_id: Some("29801011234567".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1998, 1, 1),
            address: None,
            department_id: Uuid::new_v4(),
            salary: dec!(9000),
            attendance_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            leave_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            contract_date: NaiveDate::from_ymd_opt(2022, 9, 1).unwrap(),
        }
    }

    #[test]
    fn test_normalizes_text_fields() {
        let data = validate_employer(data()).unwrap();
        assert_eq!(data.name, "Omar Hassan");
        assert_eq!(data.email.as_deref(), Some("omar@example.com"));
        assert_eq!(data.phone, None);
    }

    #[test]
    fn test_reports_every_problem() {
        let mut input = data();
        input.name = " ".to_string();
        input.salary = dec!(0);
        input.leave_time = input.attendance_time;

        let errors = validate_employer(input).unwrap_err().into_inner();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "salary", "leave_time"]);
    }

    #[test]
    fn test_salary_must_fit_the_column() {
        let mut input = data();
        input.salary = dec!(99999999999999);
        let errors = validate_employer(input).unwrap_err().into_inner();
        assert_eq!(errors[0].field, "salary");

        let mut input = data();
        input.salary = dec!(9000.125);
        assert!(validate_employer(input).is_err());
    }

    #[test]
    fn test_overnight_schedule_is_valid() {
        let mut input = data();
        input.attendance_time = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        input.leave_time = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        assert!(validate_employer(input).is_ok());
    }
}
