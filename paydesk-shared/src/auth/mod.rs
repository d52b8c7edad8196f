/// Authentication and authorization for HR users
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the password policy
/// - [`jwt`]: HS256 access tokens with a revocable token id
/// - [`middleware`]: Turns a bearer token into an [`middleware::AuthContext`]
/// - [`authorization`]: Role rules for HR account management
///
/// # Example
///
/// ```no_run
/// use paydesk_shared::auth::password::{hash_password, verify_password};
/// use paydesk_shared::auth::jwt::{create_token, Claims};
/// use paydesk_shared::models::hr_user::HrRole;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Payroll2024")?;
/// assert!(verify_password("Payroll2024", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), HrRole::Hr, Duration::hours(12));
/// let token = create_token(&claims, "a-secret-that-is-at-least-32-bytes")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
