/// Employer (employee) model and database operations
///
/// "Employer" is the historical name for an employee record. Each employer
/// belongs to one department and carries the monthly base salary and the
/// scheduled working window used by the salary calculation.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255),
///     phone VARCHAR(50),
///     gender VARCHAR(20),
///     nationality VARCHAR(100),
///     national_id VARCHAR(50) UNIQUE,
///     birth_date DATE,
///     address TEXT,
///     department_id UUID NOT NULL REFERENCES departments(id) ON DELETE RESTRICT,
///     salary NUMERIC(12, 2) NOT NULL CHECK (salary > 0),
///     attendance_time TIME NOT NULL,
///     leave_time TIME NOT NULL,
///     contract_date DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Deleting an employer cascades to its attendances, adjustments and
/// salary summaries.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub department_id: Uuid,

    /// Monthly base salary
    pub salary: Decimal,

    /// Scheduled start of the working day
    pub attendance_time: NaiveTime,

    /// Scheduled end of the working day (may be before `attendance_time`
    /// for overnight shifts)
    pub leave_time: NaiveTime,

    pub contract_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Employer joined with its department name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployerWithDepartment {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub employer: Employer,
    pub department_name: String,
}

/// Fields shared by create and full update
#[derive(Debug, Clone)]
pub struct EmployerData {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub department_id: Uuid,
    pub salary: Decimal,
    pub attendance_time: NaiveTime,
    pub leave_time: NaiveTime,
    pub contract_date: NaiveDate,
}

/// Filters for the employer listing
#[derive(Debug, Clone, Default)]
pub struct EmployerFilter {
    /// Case-insensitive match on name, email or phone
    pub search: Option<String>,
    pub department_id: Option<Uuid>,
}

const EMPLOYER_COLUMNS: &str = "e.id, e.name, e.email, e.phone, e.gender, e.nationality, \
     e.national_id, e.birth_date, e.address, e.department_id, e.salary, e.attendance_time, \
     e.leave_time, e.contract_date, e.created_at, e.updated_at";

impl Employer {
    pub async fn create(pool: &PgPool, data: EmployerData) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Employer>(&format!(
            "INSERT INTO employers AS e (name, email, phone, gender, nationality, national_id,
                 birth_date, address, department_id, salary, attendance_time, leave_time,
                 contract_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {EMPLOYER_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.gender)
        .bind(data.nationality)
        .bind(data.national_id)
        .bind(data.birth_date)
        .bind(data.address)
        .bind(data.department_id)
        .bind(data.salary)
        .bind(data.attendance_time)
        .bind(data.leave_time)
        .bind(data.contract_date)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employer>(&format!(
            "SELECT {EMPLOYER_COLUMNS} FROM employers e WHERE e.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_with_department(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<EmployerWithDepartment>, sqlx::Error> {
        sqlx::query_as::<_, EmployerWithDepartment>(&format!(
            "SELECT {EMPLOYER_COLUMNS}, d.name AS department_name
             FROM employers e
             JOIN departments d ON d.id = e.department_id
             WHERE e.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists employers matching `filter`, ordered by name
    pub async fn list(
        pool: &PgPool,
        filter: &EmployerFilter,
    ) -> Result<Vec<EmployerWithDepartment>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {EMPLOYER_COLUMNS}, d.name AS department_name
             FROM employers e
             JOIN departments d ON d.id = e.department_id
             WHERE 1 = 1"
        ));

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            builder
                .push(" AND (e.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR e.email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR e.phone ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(department_id) = filter.department_id {
            builder.push(" AND e.department_id = ").push_bind(department_id);
        }

        builder.push(" ORDER BY e.name");

        builder
            .build_query_as::<EmployerWithDepartment>()
            .fetch_all(pool)
            .await
    }

    /// Replaces every editable field of an employer
    ///
    /// A department change is copied onto the employer's attendance rows in
    /// the same transaction.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: EmployerData,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Employer>(&format!(
            "UPDATE employers AS e
             SET name = $2, email = $3, phone = $4, gender = $5, nationality = $6,
                 national_id = $7, birth_date = $8, address = $9, department_id = $10,
                 salary = $11, attendance_time = $12, leave_time = $13, contract_date = $14,
                 updated_at = NOW()
             WHERE e.id = $1
             RETURNING {EMPLOYER_COLUMNS}"
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.gender)
        .bind(data.nationality)
        .bind(data.national_id)
        .bind(data.birth_date)
        .bind(data.address)
        .bind(data.department_id)
        .bind(data.salary)
        .bind(data.attendance_time)
        .bind(data.leave_time)
        .bind(data.contract_date)
        .fetch_optional(&mut *tx)
        .await?;

        // Attendance rows carry the department for filtering; they follow the employer
        if let Some(employer) = &updated {
            sqlx::query(
                "UPDATE attendances SET department_id = $2, updated_at = NOW()
                 WHERE employer_id = $1 AND department_id <> $2",
            )
            .bind(employer.id)
            .bind(employer.department_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Deletes an employer and, through FK cascades, its attendance,
    /// adjustments and salary summaries
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM employers")
            .fetch_one(pool)
            .await
    }

    /// Most recently contracted employers, newest first
    pub async fn recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<EmployerWithDepartment>, sqlx::Error> {
        sqlx::query_as::<_, EmployerWithDepartment>(&format!(
            "SELECT {EMPLOYER_COLUMNS}, d.name AS department_name
             FROM employers e
             JOIN departments d ON d.id = e.department_id
             ORDER BY e.contract_date DESC, e.created_at DESC
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// True when salary or schedule differ, meaning payroll must be recomputed
    pub fn payroll_inputs_changed(&self, other: &Employer) -> bool {
        self.salary != other.salary
            || self.attendance_time != other.attendance_time
            || self.leave_time != other.leave_time
    }
}
