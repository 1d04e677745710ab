//! Dish repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use homeplate_core::{CookId, DishId, Price};

use super::RepositoryError;
use crate::models::Dish;

#[derive(Debug, sqlx::FromRow)]
struct DishRow {
    id: i64,
    cook_id: i64,
    name: String,
    description: String,
    price: Decimal,
    serves: i32,
    is_veg: bool,
    available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Self {
            id: DishId::new(row.id),
            cook_id: CookId::new(row.cook_id),
            name: row.name,
            description: row.description,
            price: Price::new(row.price),
            serves: row.serves,
            is_veg: row.is_veg,
            available: row.available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// New or updated dish fields, as accepted from the cook's form.
#[derive(Debug, Clone)]
pub struct DishInput {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub serves: i32,
    pub is_veg: bool,
    pub available: bool,
}

/// Repository for dish database operations.
pub struct DishRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DishRepository<'a> {
    /// Create a new dish repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List available dishes from approved cooks, newest first.
    ///
    /// This is the public browse query - anything pending, suspended, or
    /// marked unavailable never reaches it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available(&self) -> Result<Vec<Dish>, RepositoryError> {
        let rows = sqlx::query_as::<_, DishRow>(
            r"
            SELECT d.id, d.cook_id, d.name, d.description, d.price, d.serves,
                   d.is_veg, d.available, d.created_at, d.updated_at
            FROM dish d
            JOIN cook_profile c ON c.id = d.cook_id
            WHERE d.available AND c.status = 'approved'
            ORDER BY d.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a dish by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: DishId) -> Result<Option<Dish>, RepositoryError> {
        let row = sqlx::query_as::<_, DishRow>(
            r"
            SELECT id, cook_id, name, description, price, serves,
                   is_veg, available, created_at, updated_at
            FROM dish
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List a cook's own dishes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_cook(&self, cook_id: CookId) -> Result<Vec<Dish>, RepositoryError> {
        let rows = sqlx::query_as::<_, DishRow>(
            r"
            SELECT id, cook_id, name, description, price, serves,
                   is_veg, available, created_at, updated_at
            FROM dish
            WHERE cook_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(cook_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a dish for a cook.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        cook_id: CookId,
        input: &DishInput,
    ) -> Result<Dish, RepositoryError> {
        let row = sqlx::query_as::<_, DishRow>(
            r"
            INSERT INTO dish (cook_id, name, description, price, serves, is_veg, available)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, cook_id, name, description, price, serves,
                      is_veg, available, created_at, updated_at
            ",
        )
        .bind(cook_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.amount())
        .bind(input.serves)
        .bind(input.is_veg)
        .bind(input.available)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a dish, scoped to its owning cook.
    ///
    /// The `cook_id` in the WHERE clause is the ownership check; a cook can
    /// never update another cook's dish through this path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the dish doesn't exist or
    /// belongs to a different cook.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: DishId,
        cook_id: CookId,
        input: &DishInput,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE dish
            SET name = $1, description = $2, price = $3, serves = $4,
                is_veg = $5, available = $6, updated_at = NOW()
            WHERE id = $7 AND cook_id = $8
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.amount())
        .bind(input.serves)
        .bind(input.is_veg)
        .bind(input.available)
        .bind(id)
        .bind(cook_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a dish, scoped to its owning cook.
    ///
    /// # Returns
    ///
    /// Returns `true` if the dish was deleted, `false` if it didn't exist
    /// (or belonged to a different cook).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: DishId, cook_id: CookId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM dish WHERE id = $1 AND cook_id = $2")
            .bind(id)
            .bind(cook_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
