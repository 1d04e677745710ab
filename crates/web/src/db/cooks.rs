//! Cook-profile repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use homeplate_core::{CookId, CookStatus, UserId};

use super::RepositoryError;
use crate::models::CookProfile;

#[derive(Debug, sqlx::FromRow)]
struct CookProfileRow {
    id: i64,
    user_id: i64,
    kitchen_name: String,
    bio: String,
    campus_area: String,
    status: CookStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CookProfileRow> for CookProfile {
    fn from(row: CookProfileRow) -> Self {
        Self {
            id: CookId::new(row.id),
            user_id: UserId::new(row.user_id),
            kitchen_name: row.kitchen_name,
            bio: row.bio,
            campus_area: row.campus_area,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cook-profile database operations.
pub struct CookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CookRepository<'a> {
    /// Create a new cook repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The cook-existence predicate used by role resolution.
    ///
    /// Status is deliberately ignored here: a pending or suspended cook
    /// still resolves to the cook role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_for_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cook_profile WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;
        Ok(row.0)
    }

    /// Get a cook profile by the owning user's id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<CookProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, CookProfileRow>(
            r"
            SELECT id, user_id, kitchen_name, bio, campus_area, status,
                   created_at, updated_at
            FROM cook_profile
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a cook profile by its own id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CookId) -> Result<Option<CookProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, CookProfileRow>(
            r"
            SELECT id, user_id, kitchen_name, bio, campus_area, status,
                   created_at, updated_at
            FROM cook_profile
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a pending cook profile for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a profile.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        kitchen_name: &str,
        bio: &str,
        campus_area: &str,
    ) -> Result<CookProfile, RepositoryError> {
        let row = sqlx::query_as::<_, CookProfileRow>(
            r"
            INSERT INTO cook_profile (user_id, kitchen_name, bio, campus_area, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id, user_id, kitchen_name, bio, campus_area, status,
                      created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(kitchen_name)
        .bind(bio)
        .bind(campus_area)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("user already has a cook profile".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Set a cook profile's status (admin approval/suspension).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(&self, id: CookId, status: CookStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cook_profile
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            ",
        )
        .bind(status)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List all cook profiles, newest first (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<CookProfile>, RepositoryError> {
        let rows = sqlx::query_as::<_, CookProfileRow>(
            r"
            SELECT id, user_id, kitchen_name, bio, campus_area, status,
                   created_at, updated_at
            FROM cook_profile
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count cook profiles (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cook_profile")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
