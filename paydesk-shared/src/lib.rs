//! # Paydesk Shared Library
//!
//! Domain types, persistence and payroll logic used by the Paydesk API
//! server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT tokens, authentication and role rules
//! - `db`: Connection pool and migrations
//! - `models`: Database models and their queries
//! - `payroll`: Pay periods, salary calculation and recalculation
//! - `validation`: Business rules checked before writes

pub mod auth;
pub mod db;
pub mod models;
pub mod payroll;
pub mod validation;

/// Current version of the Paydesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
