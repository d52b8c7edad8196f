/// HR user model and database operations
///
/// HR users are the administrative accounts that operate the system. They
/// are distinct from employer (employee) records.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE hr_role AS ENUM ('super admin', 'hr');
///
/// CREATE TABLE hr_users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role hr_role NOT NULL DEFAULT 'hr',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role of an HR account
///
/// Only `SuperAdmin` may manage other HR accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "hr_role")]
pub enum HrRole {
    /// Full control, including HR account management
    #[sqlx(rename = "super admin")]
    #[serde(rename = "super admin")]
    SuperAdmin,

    /// Day-to-day payroll operations
    #[sqlx(rename = "hr")]
    #[serde(rename = "hr")]
    Hr,
}

impl HrRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HrRole::SuperAdmin => "super admin",
            HrRole::Hr => "hr",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, HrRole::SuperAdmin)
    }
}

impl std::fmt::Display for HrRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HR account row
///
/// `password_hash` is skipped during serialization so the model can be
/// returned from handlers directly.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HrUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// Argon2id hash, never the plaintext password
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: HrRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating an HR account
#[derive(Debug, Clone)]
pub struct CreateHrUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: HrRole,
}

/// Input for updating an HR account
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateHrUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<HrRole>,
}

const HR_USER_COLUMNS: &str =
    "id, name, email, password_hash, role, created_at, updated_at, last_login_at";

impl HrUser {
    /// Inserts a new HR account
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `hr_users_email_key` when the email
    /// is taken.
    pub async fn create(pool: &PgPool, data: CreateHrUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, HrUser>(&format!(
            "INSERT INTO hr_users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {HR_USER_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.email.to_lowercase())
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, HrUser>(&format!(
            "SELECT {HR_USER_COLUMNS} FROM hr_users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Looks up an account by email (stored lowercase)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, HrUser>(&format!(
            "SELECT {HR_USER_COLUMNS} FROM hr_users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await
    }

    /// Lists all HR accounts, super admins first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, HrUser>(&format!(
            "SELECT {HR_USER_COLUMNS} FROM hr_users ORDER BY role, name"
        ))
        .fetch_all(pool)
        .await
    }

    /// Updates an HR account
    ///
    /// Builds the SET clause from the fields that are present. Returns
    /// `None` when the account does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateHrUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE hr_users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {HR_USER_COLUMNS}"));

        let mut q = sqlx::query_as::<_, HrUser>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email.to_lowercase());
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }

        q.fetch_optional(pool).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hr_users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE hr_users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM hr_users")
            .fetch_one(pool)
            .await
    }

    /// Counts accounts holding the super admin role
    ///
    /// Used to stop the last super admin from demoting or deleting itself.
    pub async fn count_super_admins(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM hr_users WHERE role = 'super admin'")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_with_space() {
        let json = serde_json::to_string(&HrRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super admin\"");

        let role: HrRole = serde_json::from_str("\"hr\"").unwrap();
        assert_eq!(role, HrRole::Hr);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = HrUser {
            id: Uuid::new_v4(),
            name: "Mona".to_string(),
            email: "mona@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: HrRole::Hr,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], "hr");
    }

    #[test]
    fn test_update_hr_user_default() {
        let update = UpdateHrUser::default();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.password_hash.is_none());
        assert!(update.role.is_none());
    }
}
