/// Attendance model and database operations
///
/// One row per employer per worked day. The department is copied from the
/// employer when the row is written so listings can filter without a join.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE attendances (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     employer_id UUID NOT NULL REFERENCES employers(id) ON DELETE CASCADE,
///     department_id UUID NOT NULL REFERENCES departments(id) ON DELETE RESTRICT,
///     date DATE NOT NULL,
///     attendance_time TIME NOT NULL,
///     leave_time TIME,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (employer_id, date)
/// );
/// ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Name of the uniqueness constraint on (employer_id, date)
pub const ATTENDANCE_UNIQUE_CONSTRAINT: &str = "attendances_employer_date_key";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub department_id: Uuid,
    pub date: NaiveDate,
    pub attendance_time: NaiveTime,
    pub leave_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendance joined with employer and department names
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attendance: Attendance,
    pub employer_name: String,
    pub department_name: String,

    /// Arrived after the employer's scheduled attendance time
    pub is_late: bool,
}

#[derive(Debug, Clone)]
pub struct CreateAttendance {
    pub employer_id: Uuid,
    pub department_id: Uuid,
    pub date: NaiveDate,
    pub attendance_time: NaiveTime,
    pub leave_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub employer_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Head counts for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DayCounts {
    /// Employers with an attendance row for the day
    pub present: i64,

    /// Employers without one
    pub absent: i64,

    /// Present employers who arrived after their scheduled time
    pub late: i64,
}

const ATTENDANCE_COLUMNS: &str = "a.id, a.employer_id, a.department_id, a.date, \
     a.attendance_time, a.leave_time, a.created_at, a.updated_at";

impl Attendance {
    /// Inserts an attendance row
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on [`ATTENDANCE_UNIQUE_CONSTRAINT`]
    /// when the employer already has a row for `date`.
    pub async fn create(pool: &PgPool, data: CreateAttendance) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(&format!(
            "INSERT INTO attendances AS a (employer_id, department_id, date, attendance_time, leave_time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ATTENDANCE_COLUMNS}"
        ))
        .bind(data.employer_id)
        .bind(data.department_id)
        .bind(data.date)
        .bind(data.attendance_time)
        .bind(data.leave_time)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances a WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_for_day(
        pool: &PgPool,
        employer_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances a
             WHERE a.employer_id = $1 AND a.date = $2"
        ))
        .bind(employer_id)
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    /// Checks for an existing row for (employer, date), optionally ignoring
    /// one row (the row being updated)
    pub async fn exists_for_day(
        pool: &PgPool,
        employer_id: Uuid,
        date: NaiveDate,
        except_id: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM attendances
                WHERE employer_id = $1 AND date = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(employer_id)
        .bind(date)
        .bind(except_id)
        .fetch_one(pool)
        .await
    }

    /// All rows for one employer within `[from, to]`, oldest first
    pub async fn list_for_period(
        pool: &PgPool,
        employer_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances a
             WHERE a.employer_id = $1 AND a.date BETWEEN $2 AND $3
             ORDER BY a.date"
        ))
        .bind(employer_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Lists attendance with names and a late flag, newest first
    pub async fn list(
        pool: &PgPool,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceDetail>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {ATTENDANCE_COLUMNS}, e.name AS employer_name, d.name AS department_name,
                    (a.attendance_time > e.attendance_time) AS is_late
             FROM attendances a
             JOIN employers e ON e.id = a.employer_id
             JOIN departments d ON d.id = a.department_id
             WHERE 1 = 1"
        ));

        if let Some(employer_id) = filter.employer_id {
            builder.push(" AND a.employer_id = ").push_bind(employer_id);
        }
        if let Some(department_id) = filter.department_id {
            builder.push(" AND a.department_id = ").push_bind(department_id);
        }
        if let Some(date) = filter.date {
            builder.push(" AND a.date = ").push_bind(date);
        }
        if let Some(from) = filter.date_from {
            builder.push(" AND a.date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            builder.push(" AND a.date <= ").push_bind(to);
        }

        builder.push(" ORDER BY a.date DESC, a.attendance_time DESC");

        builder
            .build_query_as::<AttendanceDetail>()
            .fetch_all(pool)
            .await
    }

    /// Rewrites the day and times of an attendance row
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: CreateAttendance,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(&format!(
            "UPDATE attendances AS a
             SET employer_id = $2, department_id = $3, date = $4, attendance_time = $5,
                 leave_time = $6, updated_at = NOW()
             WHERE a.id = $1
             RETURNING {ATTENDANCE_COLUMNS}"
        ))
        .bind(id)
        .bind(data.employer_id)
        .bind(data.department_id)
        .bind(data.date)
        .bind(data.attendance_time)
        .bind(data.leave_time)
        .fetch_optional(pool)
        .await
    }

    /// Records the leave time on an existing row
    pub async fn set_leave_time(
        pool: &PgPool,
        id: Uuid,
        leave_time: NaiveTime,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(&format!(
            "UPDATE attendances AS a
             SET leave_time = $2, updated_at = NOW()
             WHERE a.id = $1
             RETURNING {ATTENDANCE_COLUMNS}"
        ))
        .bind(id)
        .bind(leave_time)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a row, returning it so callers can recalculate its month
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(&format!(
            "DELETE FROM attendances a WHERE a.id = $1 RETURNING {ATTENDANCE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Present, absent and late counts across all employers for `date`
    pub async fn day_counts(pool: &PgPool, date: NaiveDate) -> Result<DayCounts, sqlx::Error> {
        sqlx::query_as::<_, DayCounts>(
            r#"
            SELECT
                COUNT(a.id) AS present,
                COUNT(*) FILTER (WHERE a.id IS NULL) AS absent,
                COUNT(a.id) FILTER (WHERE a.attendance_time > e.attendance_time) AS late
            FROM employers e
            LEFT JOIN attendances a ON a.employer_id = e.id AND a.date = $1
            "#,
        )
        .bind(date)
        .fetch_one(pool)
        .await
    }

    pub async fn count_for_employer(pool: &PgPool, employer_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM attendances WHERE employer_id = $1")
            .bind(employer_id)
            .fetch_one(pool)
            .await
    }
}
