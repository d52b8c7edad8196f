/// Role-based authorization for HR account management
///
/// Every authenticated HR user may use the payroll endpoints and read the
/// HR account list. Managing HR accounts is reserved for super admins,
/// with two extra protections:
///
/// - a super admin may not touch another super admin's account
/// - the last super admin may not demote or delete itself
///
/// The checks are pure functions over the caller, the target account and
/// the current super admin count; handlers load those and call in.

use super::middleware::AuthContext;
use crate::models::hr_user::{HrRole, HrUser};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("Only a super admin can manage HR accounts")]
    SuperAdminRequired,

    #[error("Super admin accounts can only be changed by their owner")]
    ProtectedAccount,

    #[error("The last super admin cannot be demoted or deleted")]
    LastSuperAdmin,
}

/// A change to an existing HR account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrChange {
    /// Update with an optional new role
    Update { role: Option<HrRole> },
    Delete,
}

pub fn require_super_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if !auth.is_super_admin() {
        return Err(AuthzError::SuperAdminRequired);
    }

    Ok(())
}

/// Decides whether `auth` may apply `change` to `target`
///
/// `super_admin_count` is the number of super admins before the change.
pub fn authorize_hr_change(
    auth: &AuthContext,
    target: &HrUser,
    change: HrChange,
    super_admin_count: i64,
) -> Result<(), AuthzError> {
    require_super_admin(auth)?;

    if !target.role.is_super_admin() {
        return Ok(());
    }

    if target.id != auth.hr_user_id {
        return Err(AuthzError::ProtectedAccount);
    }

    let loses_super_admin = match change {
        HrChange::Delete => true,
        HrChange::Update { role } => role.is_some_and(|r| !r.is_super_admin()),
    };

    if loses_super_admin && super_admin_count <= 1 {
        return Err(AuthzError::LastSuperAdmin);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn auth(role: HrRole) -> AuthContext {
        AuthContext {
            hr_user_id: Uuid::new_v4(),
            role,
            token_id: Uuid::new_v4(),
            expires_at: Utc::now(),
        }
    }

    fn account(id: Uuid, role: HrRole) -> HrUser {
        HrUser {
            id,
            name: "Account".to_string(),
            email: "account@example.com".to_string(),
            password_hash: String::new(),
            role,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hr_cannot_manage_accounts() {
        let caller = auth(HrRole::Hr);
        let target = account(Uuid::new_v4(), HrRole::Hr);

        assert_eq!(require_super_admin(&caller), Err(AuthzError::SuperAdminRequired));
        assert_eq!(
            authorize_hr_change(&caller, &target, HrChange::Delete, 1),
            Err(AuthzError::SuperAdminRequired)
        );
    }

    #[test]
    fn test_super_admin_manages_hr_accounts() {
        let caller = auth(HrRole::SuperAdmin);
        let target = account(Uuid::new_v4(), HrRole::Hr);

        assert!(authorize_hr_change(&caller, &target, HrChange::Delete, 1).is_ok());
        assert!(authorize_hr_change(
            &caller,
            &target,
            HrChange::Update {
                role: Some(HrRole::SuperAdmin)
            },
            1
        )
        .is_ok());
    }

    #[test]
    fn test_other_super_admins_are_protected() {
        let caller = auth(HrRole::SuperAdmin);
        let target = account(Uuid::new_v4(), HrRole::SuperAdmin);

        assert_eq!(
            authorize_hr_change(&caller, &target, HrChange::Update { role: None }, 2),
            Err(AuthzError::ProtectedAccount)
        );
        assert_eq!(
            authorize_hr_change(&caller, &target, HrChange::Delete, 2),
            Err(AuthzError::ProtectedAccount)
        );
    }

    #[test]
    fn test_last_super_admin_keeps_role() {
        let caller = auth(HrRole::SuperAdmin);
        let me = account(caller.hr_user_id, HrRole::SuperAdmin);

        assert_eq!(
            authorize_hr_change(&caller, &me, HrChange::Update { role: Some(HrRole::Hr) }, 1),
            Err(AuthzError::LastSuperAdmin)
        );
        assert_eq!(
            authorize_hr_change(&caller, &me, HrChange::Delete, 1),
            Err(AuthzError::LastSuperAdmin)
        );

        assert!(authorize_hr_change(&caller, &me, HrChange::Update { role: None }, 1).is_ok());
        assert!(authorize_hr_change(&caller, &me, HrChange::Update { role: Some(HrRole::Hr) }, 2).is_ok());
    }
}
