//! Business-rule validation
//!
//! Field-level checks (lengths, formats, required fields) are declared on
//! request types with `validator` derives. The rules here span several
//! fields or depend on stored data, such as the employer whose salary caps
//! a deduction. Each check collects every problem it finds instead of
//! stopping at the first.

pub mod adjustment;
pub mod attendance;
pub mod employer;
pub mod holiday;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payroll::period::{MAX_YEAR, MIN_YEAR};

/// One failed rule, reported against a request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates [`FieldError`]s across checks
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(value)` when nothing was recorded
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid", field)),
                })
            })
            .collect();

        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self(fields)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Largest salary or money adjustment, in currency units
///
/// Stored as `NUMERIC(12, 2)`; the lower ceiling keeps derived summary
/// amounts inside the same column type.
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Largest hour-based adjustment
pub fn max_hours() -> Decimal {
    Decimal::new(99_999, 2)
}

/// Records an error when `value` has more than two decimal places or
/// exceeds `max`. Returns `true` when the value fits.
pub(crate) fn check_amount(
    errors: &mut FieldErrors,
    field: &str,
    value: Decimal,
    max: Decimal,
) -> bool {
    if value.normalize().scale() > 2 {
        errors.add(
            field,
            format!("The {field} may not have more than 2 decimal places"),
        );
        return false;
    }

    if value > max {
        errors.add(field, format!("The {field} may not be greater than {max}"));
        return false;
    }

    true
}

/// Records an error when `date` falls outside the payroll year range
pub(crate) fn check_payroll_year(errors: &mut FieldErrors, field: &str, date: NaiveDate) {
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        errors.add(
            field,
            format!("The {field} must be between {MIN_YEAR} and {MAX_YEAR}"),
        );
    }
}
