//! Payment repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use homeplate_core::{OrderId, PaymentId, PaymentStatus};

use super::RepositoryError;
use crate::models::Payment;

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    order_id: i64,
    gateway_order_id: String,
    gateway_payment_id: Option<String>,
    amount_paise: i64,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: PaymentId::new(row.id),
            order_id: OrderId::new(row.order_id),
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            amount_paise: row.amount_paise,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for payment database operations.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a payment record for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order already has a payment.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        order_id: OrderId,
        gateway_order_id: &str,
        amount_paise: i64,
    ) -> Result<Payment, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r"
            INSERT INTO payment (order_id, gateway_order_id, amount_paise, status)
            VALUES ($1, $2, $3, 'created')
            RETURNING id, order_id, gateway_order_id, gateway_payment_id,
                      amount_paise, status, created_at, updated_at
            ",
        )
        .bind(order_id)
        .bind(gateway_order_id)
        .bind(amount_paise)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order already has a payment".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Look up a payment by the gateway's order id.
    ///
    /// This is how callback and webhook handlers find their payment row -
    /// the gateway never learns our internal ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Payment>, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r"
            SELECT id, order_id, gateway_order_id, gateway_payment_id,
                   amount_paise, status, created_at, updated_at
            FROM payment
            WHERE gateway_order_id = $1
            ",
        )
        .bind(gateway_order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the payment for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Payment>, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r"
            SELECT id, order_id, gateway_order_id, gateway_payment_id,
                   amount_paise, status, created_at, updated_at
            FROM payment
            WHERE order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Mark a payment as settled (`Captured` or `Failed`).
    ///
    /// Only unsettled payments are touched: the status predicate in the
    /// WHERE clause makes a second capture, or a late failure after a
    /// capture, a no-op. Returns `true` if a row was updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn settle(
        &self,
        id: PaymentId,
        gateway_payment_id: &str,
        status: PaymentStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE payment
            SET status = $1, gateway_payment_id = $2, updated_at = NOW()
            WHERE id = $3 AND status IN ('created', 'failed')
            ",
        )
        .bind(status)
        .bind(gateway_payment_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
