/// Database models for Paydesk
///
/// Each model is a plain struct with associated async functions that run
/// their own SQL against a `PgPool`.
///
/// # Models
///
/// - `hr_user`: HR accounts that operate the system
/// - `revoked_token`: Logged-out access tokens
/// - `department`: Organisational units
/// - `employer`: Employee records with salary and schedule
/// - `attendance`: Daily arrival and leave times
/// - `holiday`: Official and weekly holidays
/// - `adjustment`: Manual additions and deductions
/// - `salary_summary`: Computed monthly payroll
///
/// # Example
///
/// ```no_run
/// use paydesk_shared::models::department::Department;
/// use paydesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let department = Department::create(&pool, "Finance").await?;
/// println!("created {}", department.id);
/// # Ok(())
/// # }
/// ```

pub mod adjustment;
pub mod attendance;
pub mod department;
pub mod employer;
pub mod holiday;
pub mod hr_user;
pub mod revoked_token;
pub mod salary_summary;
