/// API route handlers, one module per resource
///
/// - `health`: Liveness and database connectivity
/// - `auth`: HR login, logout and current account
/// - `hrs`: HR account management
/// - `employers`: Employee records plus attend/leave shortcuts
/// - `departments`: Departments and head counts
/// - `holidays`: Holiday calendar
/// - `adjustments`: Manual payroll additions and deductions
/// - `attendances`: Attendance records
/// - `salary`: Salary listing, calculation and history
/// - `dashboard`: Read-only aggregates

pub mod adjustments;
pub mod attendances;
pub mod auth;
pub mod dashboard;
pub mod departments;
pub mod employers;
pub mod health;
pub mod holidays;
pub mod hrs;
pub mod salary;

use serde::{Deserialize, Serialize};

/// Body for endpoints that only report success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always "success"
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
