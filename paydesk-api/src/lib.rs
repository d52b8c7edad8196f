//! # Paydesk API Server Library
//!
//! HR and payroll REST API: employers, departments, attendance, holidays,
//! salary adjustments and monthly salary summaries.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `bootstrap`: First super admin creation
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors that reject with `ApiError`
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
