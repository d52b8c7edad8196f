//! Monthly pay periods.
//!
//! A [`PayPeriod`] is a validated (year, month) pair. It knows its calendar
//! bounds and how many working days have elapsed by a given date once the
//! holiday calendar is taken out.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::PayrollError;

/// Earliest year accepted for payroll periods
pub const MIN_YEAR: i32 = 2000;

/// Latest year accepted for payroll periods
pub const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayPeriod {
    year: i32,
    month: u32,
}

impl PayPeriod {
    /// Builds a period, rejecting years outside 2000–2100 and months outside 1–12
    pub fn new(year: i32, month: u32) -> Result<Self, PayrollError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(PayrollError::InvalidPeriod { year, month });
        }

        Ok(Self { year, month })
    }

    /// Builds a period from optional parts, defaulting each to `today`'s
    pub fn resolve(
        year: Option<i32>,
        month: Option<u32>,
        today: NaiveDate,
    ) -> Result<Self, PayrollError> {
        Self::new(year.unwrap_or(today.year()), month.unwrap_or(today.month()))
    }

    /// The period containing `date`
    pub fn containing(date: NaiveDate) -> Result<Self, PayrollError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };

        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .map(|d| d - Duration::days(1))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Last day that counts towards absences when evaluated on `today`
    ///
    /// Past periods count in full, the current period counts up to today,
    /// and future periods count nothing (`None`).
    pub fn evaluation_cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        if today < self.first_day() {
            None
        } else if today > self.last_day() {
            Some(self.last_day())
        } else {
            Some(today)
        }
    }

    /// Calendar days up to the cutoff, minus holiday dates in that range
    ///
    /// Duplicate or out-of-range holiday dates are ignored.
    pub fn working_days(&self, holidays: &[NaiveDate], today: NaiveDate) -> u32 {
        let Some(cutoff) = self.evaluation_cutoff(today) else {
            return 0;
        };

        let elapsed = cutoff.day();

        let mut excluded: Vec<NaiveDate> = holidays
            .iter()
            .copied()
            .filter(|d| *d >= self.first_day() && *d <= cutoff)
            .collect();
        excluded.sort_unstable();
        excluded.dedup();

        elapsed.saturating_sub(excluded.len() as u32)
    }

    /// "YYYY-MM"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// English month name, e.g. "March"
    pub fn month_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        NAMES[(self.month - 1) as usize]
    }
}

impl std::fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
