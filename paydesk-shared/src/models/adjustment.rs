/// Payroll adjustment model
///
/// An adjustment is a manual addition or deduction attached to a date.
/// Values are always stored positive; `kind` decides the sign and
/// `value_type` decides whether the value is money or hours converted at
/// the employer's hourly rate.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE adjustment_kind AS ENUM ('addition', 'deduction');
/// CREATE TYPE adjustment_value_type AS ENUM ('money', 'hours');
///
/// CREATE TABLE adjustments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     employer_id UUID NOT NULL REFERENCES employers(id) ON DELETE CASCADE,
///     date DATE NOT NULL,
///     value NUMERIC(12, 2) NOT NULL CHECK (value > 0),
///     value_type adjustment_value_type NOT NULL,
///     kind adjustment_kind NOT NULL,
///     reason VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "adjustment_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Addition,
    Deduction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "adjustment_value_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Money,
    Hours,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Adjustment {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub date: NaiveDate,
    pub value: Decimal,
    pub value_type: ValueType,
    pub kind: AdjustmentKind,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Adjustment joined with the employer name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdjustmentDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub adjustment: Adjustment,
    pub employer_name: String,
}

/// Validated adjustment fields
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentData {
    pub employer_id: Uuid,
    pub date: NaiveDate,
    pub value: Decimal,
    pub value_type: ValueType,
    pub kind: AdjustmentKind,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct AdjustmentFilter {
    pub employer_id: Option<Uuid>,
    pub kind: Option<AdjustmentKind>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

const ADJUSTMENT_COLUMNS: &str = "a.id, a.employer_id, a.date, a.value, a.value_type, a.kind, \
     a.reason, a.created_at, a.updated_at";

impl Adjustment {
    pub async fn create(pool: &PgPool, data: AdjustmentData) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Adjustment>(&format!(
            "INSERT INTO adjustments AS a (employer_id, date, value, value_type, kind, reason)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ADJUSTMENT_COLUMNS}"
        ))
        .bind(data.employer_id)
        .bind(data.date)
        .bind(data.value)
        .bind(data.value_type)
        .bind(data.kind)
        .bind(data.reason)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Adjustment>(&format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM adjustments a WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All adjustments of one employer dated within `[from, to]`
    pub async fn list_for_period(
        pool: &PgPool,
        employer_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Adjustment>(&format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM adjustments a
             WHERE a.employer_id = $1 AND a.date BETWEEN $2 AND $3
             ORDER BY a.date"
        ))
        .bind(employer_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Lists adjustments with employer names, newest first
    pub async fn list(
        pool: &PgPool,
        filter: &AdjustmentFilter,
    ) -> Result<Vec<AdjustmentDetail>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {ADJUSTMENT_COLUMNS}, e.name AS employer_name
             FROM adjustments a
             JOIN employers e ON e.id = a.employer_id
             WHERE 1 = 1"
        ));

        if let Some(employer_id) = filter.employer_id {
            builder.push(" AND a.employer_id = ").push_bind(employer_id);
        }
        if let Some(kind) = filter.kind {
            builder.push(" AND a.kind = ").push_bind(kind);
        }
        if let Some(year) = filter.year {
            builder
                .push(" AND EXTRACT(YEAR FROM a.date)::int = ")
                .push_bind(year);
        }
        if let Some(month) = filter.month {
            builder
                .push(" AND EXTRACT(MONTH FROM a.date)::int = ")
                .push_bind(month as i32);
        }

        builder.push(" ORDER BY a.date DESC, a.created_at DESC");

        builder
            .build_query_as::<AdjustmentDetail>()
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: AdjustmentData,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Adjustment>(&format!(
            "UPDATE adjustments AS a
             SET employer_id = $2, date = $3, value = $4, value_type = $5, kind = $6,
                 reason = $7, updated_at = NOW()
             WHERE a.id = $1
             RETURNING {ADJUSTMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(data.employer_id)
        .bind(data.date)
        .bind(data.value)
        .bind(data.value_type)
        .bind(data.kind)
        .bind(data.reason)
        .fetch_optional(pool)
        .await
    }

    /// Deletes an adjustment, returning it so callers can recalculate its month
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Adjustment>(&format!(
            "DELETE FROM adjustments a WHERE a.id = $1 RETURNING {ADJUSTMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count_for_employer(pool: &PgPool, employer_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM adjustments WHERE employer_id = $1")
            .bind(employer_id)
            .fetch_one(pool)
            .await
    }
}
