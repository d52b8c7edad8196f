//! Monthly payroll
//!
//! - `period`: validated (year, month) pairs and working-day counting
//! - `calculation`: pure salary arithmetic
//! - `service`: loads inputs from the database and upserts summaries
//!
//! Any write that changes attendance, adjustments or an employer's salary
//! terms calls into [`service`] so the affected month is repriced in the
//! same request.

pub mod calculation;
pub mod period;
pub mod service;

pub use calculation::{calculate, PayrollInputs, SalaryBreakdown};
pub use period::PayPeriod;
pub use service::{recalculate, recalculate_touched};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("invalid payroll period {year}-{month}: year must be 2000-2100 and month 1-12")]
    InvalidPeriod { year: i32, month: u32 },

    #[error("employer {0} not found")]
    EmployerNotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
