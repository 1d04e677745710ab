//! Order repository.
//!
//! Orders and their line items are always written together; a bare order
//! row with no items is unrepresentable through this module.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use homeplate_core::{CookId, DishId, OrderId, OrderItemId, OrderStatus, Price, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    cook_id: i64,
    status: OrderStatus,
    total: Decimal,
    delivery_address: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            cook_id: CookId::new(self.cook_id),
            status: self.status,
            total: Price::new(self.total),
            delivery_address: self.delivery_address,
            note: self.note,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    dish_id: i64,
    dish_name: String,
    unit_price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            dish_id: DishId::new(row.dish_id),
            dish_name: row.dish_name,
            unit_price: Price::new(row.unit_price),
            quantity: row.quantity,
        }
    }
}

/// A line to be written when creating an order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub dish_id: DishId,
    pub dish_name: String,
    pub unit_price: Price,
    pub quantity: i32,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its items in one transaction.
    ///
    /// The order starts in `PendingPayment`; it only becomes visible to the
    /// cook once payment capture moves it to `Placed`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any write fails.
    pub async fn create(
        &self,
        user_id: UserId,
        cook_id: CookId,
        total: Price,
        delivery_address: &str,
        note: Option<&str>,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO app_order (user_id, cook_id, status, total, delivery_address, note)
            VALUES ($1, $2, 'pending_payment', $3, $4, $5)
            RETURNING id, user_id, cook_id, status, total, delivery_address, note,
                      created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(cook_id)
        .bind(total.amount())
        .bind(delivery_address)
        .bind(note)
        .fetch_one(&mut *tx)
        .await?;

        let order_id = OrderId::new(row.id);
        let mut written_items = Vec::with_capacity(items.len());

        for item in items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                r"
                INSERT INTO order_item (order_id, dish_id, dish_name, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, dish_id, dish_name, unit_price, quantity
                ",
            )
            .bind(order_id)
            .bind(item.dish_id)
            .bind(&item.dish_name)
            .bind(item.unit_price.amount())
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;

            written_items.push(item_row.into());
        }

        tx.commit().await?;

        Ok(row.into_order(written_items))
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, cook_id, status, total, delivery_address, note,
                   created_at, updated_at
            FROM app_order
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.items_for(id).await?;
        Ok(Some(row.into_order(items)))
    }

    /// List a student's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, cook_id, status, total, delivery_address, note,
                   created_at, updated_at
            FROM app_order
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// List a cook's incoming orders, newest first.
    ///
    /// Orders still pending payment are excluded - the cook only sees
    /// orders with captured money behind them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_cook(&self, cook_id: CookId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, cook_id, status, total, delivery_address, note,
                   created_at, updated_at
            FROM app_order
            WHERE cook_id = $1 AND status <> 'pending_payment'
            ORDER BY created_at DESC
            ",
        )
        .bind(cook_id)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// List all orders, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, cook_id, status, total, delivery_address, note,
                   created_at, updated_at
            FROM app_order
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Move an order from `expected` to `next`, atomically.
    ///
    /// The expected status is part of the WHERE clause, so a concurrent
    /// transition loses cleanly (zero rows affected) instead of stomping.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist or is
    /// no longer in `expected`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn transition_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE app_order
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            ",
        )
        .bind(next)
        .bind(id)
        .bind(expected)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count orders and sum delivered revenue (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<(i64, Price), RepositoryError> {
        let row: (i64, Decimal) = sqlx::query_as(
            r"
            SELECT COUNT(*),
                   COALESCE(SUM(total) FILTER (WHERE status = 'delivered'), 0)
            FROM app_order
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok((row.0, Price::new(row.1)))
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, dish_id, dish_name, unit_price, quantity
            FROM order_item
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(OrderId::new(row.id)).await?;
            orders.push(row.into_order(items));
        }
        Ok(orders)
    }
}
