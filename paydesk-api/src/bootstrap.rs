//! First super admin
//!
//! HR accounts can only be created by a super admin, so a fresh database
//! needs one seeded from configuration.

use crate::config::BootstrapAdmin;
use paydesk_shared::{
    auth::password,
    models::hr_user::{CreateHrUser, HrRole, HrUser},
};
use sqlx::PgPool;

const BOOTSTRAP_ADMIN_NAME: &str = "Super Admin";

/// Creates the configured super admin when no HR account exists yet
///
/// Returns the created account, or `None` when HR accounts already exist.
///
/// # Errors
///
/// Fails when the password is too weak or the database write fails.
pub async fn ensure_super_admin(
    pool: &PgPool,
    admin: &BootstrapAdmin,
) -> anyhow::Result<Option<HrUser>> {
    if HrUser::count(pool).await? > 0 {
        tracing::debug!("HR accounts exist, skipping super admin bootstrap");
        return Ok(None);
    }

    password::validate_password_strength(&admin.password)
        .map_err(|e| anyhow::anyhow!("BOOTSTRAP_ADMIN_PASSWORD rejected: {}", e))?;

    let hr = HrUser::create(
        pool,
        CreateHrUser {
            name: BOOTSTRAP_ADMIN_NAME.to_string(),
            email: admin.email.trim().to_string(),
            password_hash: password::hash_password(&admin.password)?,
            role: HrRole::SuperAdmin,
        },
    )
    .await?;

    tracing::info!(hr_user_id = %hr.id, email = %hr.email, "Bootstrapped super admin");

    Ok(Some(hr))
}
