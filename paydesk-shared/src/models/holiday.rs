/// Holiday calendar model
///
/// Every holiday occupies exactly one date. Official holidays carry a name;
/// weekly rest days never do. Holiday dates are excluded from the working
/// days used to count absences.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE holiday_type AS ENUM ('official', 'weekly');
///
/// CREATE TABLE holidays (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     day VARCHAR(20) NOT NULL,
///     date DATE NOT NULL UNIQUE,
///     type holiday_type NOT NULL,
///     name VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Name of the uniqueness constraint on `date`
pub const HOLIDAY_DATE_CONSTRAINT: &str = "holidays_date_key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "holiday_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HolidayType {
    /// Public holiday, requires a name
    Official,

    /// Recurring rest day, never named
    Weekly,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holiday {
    pub id: Uuid,

    /// Weekday name, e.g. "Friday"
    pub day: String,

    pub date: NaiveDate,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub holiday_type: HolidayType,

    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized holiday fields ready to be written
///
/// Build with [`crate::validation::holiday::validate_holiday`], which
/// enforces the name rules.
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayData {
    pub day: String,
    pub date: NaiveDate,
    pub holiday_type: HolidayType,
    pub name: Option<String>,
}

const HOLIDAY_COLUMNS: &str = "id, day, date, type, name, created_at, updated_at";

impl Holiday {
    pub async fn create(pool: &PgPool, data: HolidayData) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Holiday>(&format!(
            "INSERT INTO holidays (day, date, type, name)
             VALUES ($1, $2, $3, $4)
             RETURNING {HOLIDAY_COLUMNS}"
        ))
        .bind(data.day)
        .bind(data.date)
        .bind(data.holiday_type)
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Holiday>(&format!(
            "SELECT {HOLIDAY_COLUMNS} FROM holidays WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Checks whether another holiday already occupies `date`
    pub async fn date_taken(
        pool: &PgPool,
        date: NaiveDate,
        except_id: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM holidays WHERE date = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(date)
        .bind(except_id)
        .fetch_one(pool)
        .await
    }

    /// Lists holidays, optionally restricted to one year, in date order
    pub async fn list(pool: &PgPool, year: Option<i32>) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Holiday>(&format!(
            "SELECT {HOLIDAY_COLUMNS} FROM holidays
             WHERE ($1::int IS NULL OR EXTRACT(YEAR FROM date)::int = $1)
             ORDER BY date"
        ))
        .bind(year)
        .fetch_all(pool)
        .await
    }

    /// Holiday dates within `[from, to]`
    pub async fn dates_between(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar("SELECT date FROM holidays WHERE date BETWEEN $1 AND $2 ORDER BY date")
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Holidays on or after `from`, soonest first
    pub async fn upcoming(
        pool: &PgPool,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Holiday>(&format!(
            "SELECT {HOLIDAY_COLUMNS} FROM holidays WHERE date >= $1 ORDER BY date LIMIT $2"
        ))
        .bind(from)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn count_between(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM holidays WHERE date BETWEEN $1 AND $2")
            .bind(from)
            .bind(to)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: HolidayData,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Holiday>(&format!(
            "UPDATE holidays
             SET day = $2, date = $3, type = $4, name = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {HOLIDAY_COLUMNS}"
        ))
        .bind(id)
        .bind(data.day)
        .bind(data.date)
        .bind(data.holiday_type)
        .bind(data.name)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
