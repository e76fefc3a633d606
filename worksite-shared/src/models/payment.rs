//! Payment model and database operations
//!
//! Payments recorded against a project. Amounts are positive; the check
//! lives in the validation layer, the model just persists.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE payments (
//!     id BIGSERIAL PRIMARY KEY,
//!     amount DOUBLE PRECISION NOT NULL,
//!     method VARCHAR(255) NOT NULL,
//!     date TIMESTAMPTZ,
//!     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE RESTRICT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::project::Project;

/// Payment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Surrogate key
    pub id: i64,

    /// Positive amount in currency units
    pub amount: f64,

    /// Free-text payment method ("bank transfer", "cash", ...)
    pub method: String,

    pub date: Option<DateTime<Utc>>,

    /// Parent project
    pub project_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment together with its parent project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithProject {
    #[serde(flatten)]
    pub payment: Payment,

    pub project: Project,
}

/// Input for creating a new payment
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub amount: f64,
    pub method: String,
    pub date: Option<DateTime<Utc>>,
    pub project_id: i64,
}

/// Input for updating an existing payment
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdatePayment {
    pub amount: Option<f64>,
    pub method: Option<String>,
}

impl Payment {
    /// Creates a new payment
    pub async fn create(pool: &PgPool, data: CreatePayment) -> Result<Self, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (amount, method, date, project_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, amount, method, date, project_id, created_at, updated_at
            "#,
        )
        .bind(data.amount)
        .bind(data.method)
        .bind(data.date)
        .bind(data.project_id)
        .fetch_one(pool)
        .await?;

        Ok(payment)
    }

    /// Finds a payment by ID, without relations
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, amount, method, date, project_id, created_at, updated_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(payment)
    }

    /// Finds a payment by ID joined with its parent project
    pub async fn find_by_id_with_project(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<PaymentWithProject>, sqlx::Error> {
        let Some(payment) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let project = Project::find_by_id(pool, payment.project_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        Ok(Some(PaymentWithProject { payment, project }))
    }

    /// Lists all payments joined with their parent project
    pub async fn list_with_project(pool: &PgPool) -> Result<Vec<PaymentWithProject>, sqlx::Error> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, amount, method, date, project_id, created_at, updated_at
            FROM payments
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        let mut result = Vec::with_capacity(payments.len());
        for payment in payments {
            let project = Project::find_by_id(pool, payment.project_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            result.push(PaymentWithProject { payment, project });
        }

        Ok(result)
    }

    /// Lists the payments belonging to any of the given projects
    pub async fn list_by_project_ids(
        pool: &PgPool,
        project_ids: &[i64],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, amount, method, date, project_id, created_at, updated_at
            FROM payments
            WHERE project_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await?;

        Ok(payments)
    }

    /// Updates an existing payment
    ///
    /// Returns None if the payment does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdatePayment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE payments SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.amount.is_some() {
            bind_count += 1;
            query.push_str(&format!(", amount = ${}", bind_count));
        }
        if data.method.is_some() {
            bind_count += 1;
            query.push_str(&format!(", method = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, amount, method, date, project_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Payment>(&query).bind(id);

        if let Some(amount) = data.amount {
            q = q.bind(amount);
        }
        if let Some(method) = data.method {
            q = q.bind(method);
        }

        let payment = q.fetch_optional(pool).await?;

        Ok(payment)
    }

    /// Deletes a payment by ID
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
